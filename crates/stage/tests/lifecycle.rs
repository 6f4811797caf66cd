use counsel_render::{BackendCall, HeadlessBackend, RenderBackend, ResourceKind};
use counsel_scene::{NodeId, SceneConfig};
use counsel_stage::{HeadlessHost, MountOutcome, SceneRenderer};
use glam::Vec3;
use std::f32::consts::PI;

const FRAME: f64 = 1.0 / 60.0;

fn renderer() -> SceneRenderer<HeadlessBackend> {
    let config = SceneConfig {
        seed: Some(7),
        ..SceneConfig::default()
    };
    SceneRenderer::with_config(HeadlessBackend::new(), config)
}

#[test]
fn hero_scene_end_to_end() {
    let mut host = HeadlessHost::new(800, 600);
    let mut scene = renderer();
    assert!(matches!(scene.mount(&mut host), Ok(MountOutcome::Mounted(_))));
    assert_eq!(scene.camera().unwrap().aspect, 800.0 / 600.0);

    // Top-right corner of the window.
    assert!(host.pointer_move(&mut scene, 800.0, 0.0));
    let pointer = scene.pointer().unwrap();
    assert_eq!((pointer.x(), pointer.y()), (1.0, 1.0));

    let mut last_ring = 0.0;
    let mut last_stars = 0.0;
    for _ in 0..400 {
        assert_eq!(host.advance(&mut scene, FRAME), 1);
        let graph = scene.graph().unwrap();
        let ring = graph.node(NodeId::Ring).transform.rotation.y;
        let stars = graph.node(NodeId::Stars).transform.rotation.y;
        assert!(ring > last_ring);
        assert!(stars < last_stars);
        last_ring = ring;
        last_stars = stars;
    }

    let camera = scene.camera().unwrap();
    assert!((camera.position.x - 0.2).abs() < 1e-6);
    assert!((camera.position.y - 0.2).abs() < 1e-6);
    assert_eq!(camera.position.z, 5.0);
    assert_eq!(camera.target, Vec3::ZERO);

    let group = scene.graph().unwrap().group.rotation;
    assert!((group.x + PI / 20.0).abs() < 1e-6);
    assert!((group.y - PI / 20.0).abs() < 1e-6);

    let summary = scene.backend().last_frame().unwrap();
    assert_eq!(summary.draw_count, 3);
    assert_eq!(summary.light_count, 3);
    assert_eq!(scene.frames_rendered(), 400);

    assert!(host.resize(&mut scene, 400, 300));
    assert_eq!(scene.camera().unwrap().aspect, 4.0 / 3.0);
    let surface = scene.surface().unwrap();
    let state = scene.backend().surface(surface).unwrap();
    assert_eq!((state.viewport.width, state.viewport.height), (400, 300));

    assert!(scene.unmount(&mut host));
    let ledger = scene.backend().ledger();
    assert!(ledger.is_balanced());
    for kind in ResourceKind::ALL {
        assert_eq!(ledger.allocated(kind), ledger.disposed(kind));
    }
    assert_eq!(ledger.allocated(ResourceKind::Surface), 1);
    assert_eq!(ledger.allocated(ResourceKind::Geometry), 3);
    assert_eq!(ledger.allocated(ResourceKind::Material), 3);
    assert!(host.children().is_empty());
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.pending_frames().count(), 0);
}

#[test]
fn nothing_is_disposed_while_mounted() {
    let mut host = HeadlessHost::new(320, 240);
    let mut scene = renderer();
    scene.mount(&mut host).unwrap();
    host.pointer_move(&mut scene, 10.0, 200.0);
    host.run_frames(&mut scene, 30, FRAME);
    host.resize(&mut scene, 640, 480);
    host.run_frames(&mut scene, 30, FRAME);

    assert!(!scene.backend().calls().iter().any(BackendCall::is_dispose));
    assert_eq!(scene.backend().ledger().live_count(), 7);
}

#[test]
fn repeated_cycles_stay_balanced() {
    let mut host = HeadlessHost::new(640, 360);
    let mut scene = renderer();
    let mut ids = Vec::new();
    for _ in 0..5 {
        match scene.mount(&mut host) {
            Ok(MountOutcome::Mounted(id)) => ids.push(id),
            other => panic!("unexpected mount result: {other:?}"),
        }
        host.run_frames(&mut scene, 5, FRAME);
        assert!(scene.unmount(&mut host));
        assert!(scene.backend().ledger().is_balanced());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert_eq!(scene.backend().ledger().allocated(ResourceKind::Surface), 5);
    assert_eq!(host.mutations(), 10);
}

#[test]
fn frames_left_in_flight_after_unmount_do_nothing() {
    let mut host = HeadlessHost::new(100, 100);
    let mut scene = renderer();
    scene.mount(&mut host).unwrap();
    let token = scene.pending_frame().unwrap();
    scene.unmount(&mut host);

    assert!(!scene.on_frame(&mut host, token));
    assert_eq!(host.pending_frames().count(), 0);
    assert_eq!(scene.backend().frames_rendered(), 0);
}

#[test]
fn mount_after_container_attaches() {
    let mut host = HeadlessHost::detached(200, 100);
    let mut scene = renderer();
    assert_eq!(scene.mount(&mut host).unwrap(), MountOutcome::Detached);
    host.attach();
    assert!(matches!(scene.mount(&mut host), Ok(MountOutcome::Mounted(_))));
    assert_eq!(scene.camera().unwrap().aspect, 2.0);
}

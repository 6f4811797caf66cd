use crate::camera::PerspectiveCamera;
use crate::config::{ParallaxConfig, SceneConfig};
use crate::graph::{NodeId, SceneGraph};
use counsel_input::PointerState;
use glam::Vec3;

/// Move `current` toward `target` by `factor` of the remaining distance.
pub fn ease(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Per-frame scene update: self-rotation of every node, camera parallax and
/// group tilt toward the pointer.
///
/// Pure with respect to its inputs; it never schedules, renders, or reads a clock.
#[derive(Debug, Clone)]
pub struct Animator {
    parallax: ParallaxConfig,
    ring_spin: Vec3,
    core_spin: Vec3,
    stars_spin: Vec3,
}

impl Animator {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            parallax: config.parallax.clone(),
            ring_spin: config.ring.spin,
            core_spin: config.core.spin,
            stars_spin: config.stars.spin,
        }
    }

    /// Camera position the parallax eases toward for this pointer.
    pub fn camera_target(&self, pointer: PointerState) -> (f32, f32) {
        (
            pointer.x() * self.parallax.camera_gain,
            pointer.y() * self.parallax.camera_gain,
        )
    }

    /// Group rotation (x, y) the tilt eases toward for this pointer.
    pub fn tilt_target(&self, pointer: PointerState) -> (f32, f32) {
        (
            -pointer.y() * self.parallax.tilt_gain,
            pointer.x() * self.parallax.tilt_gain,
        )
    }

    pub fn step(
        &self,
        graph: &mut SceneGraph,
        camera: &mut PerspectiveCamera,
        pointer: PointerState,
        delta: f32,
    ) {
        graph.node_mut(NodeId::Ring).transform.rotation += self.ring_spin * delta;
        graph.node_mut(NodeId::Core).transform.rotation += self.core_spin * delta;
        graph.node_mut(NodeId::Stars).transform.rotation += self.stars_spin * delta;

        let easing = self.parallax.easing;
        let (cx, cy) = self.camera_target(pointer);
        camera.position.x = ease(camera.position.x, cx, easing);
        camera.position.y = ease(camera.position.y, cy, easing);
        camera.look_at(Vec3::ZERO);

        let (tx, ty) = self.tilt_target(pointer);
        graph.group.rotation.x = ease(graph.group.rotation.x, tx, easing);
        graph.group.rotation.y = ease(graph.group.rotation.y, ty, easing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn setup() -> (Animator, SceneGraph, PerspectiveCamera) {
        let config = SceneConfig {
            seed: Some(5),
            ..SceneConfig::default()
        };
        let graph = SceneGraph::build(&config);
        let camera = PerspectiveCamera::new(&config.camera, 800.0 / 600.0);
        (Animator::new(&config), graph, camera)
    }

    #[test]
    fn ease_covers_fraction_of_gap() {
        assert_eq!(ease(0.0, 1.0, 0.05), 0.05);
        assert_eq!(ease(2.0, 2.0, 0.05), 2.0);
        assert_eq!(ease(1.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn one_second_of_spin() {
        let (animator, mut graph, mut camera) = setup();
        animator.step(&mut graph, &mut camera, PointerState::default(), 1.0);

        let ring = graph.node(NodeId::Ring).transform.rotation;
        assert!((ring.x - 0.05).abs() < 1e-6);
        assert!((ring.y - 0.1).abs() < 1e-6);

        let core = graph.node(NodeId::Core).transform.rotation;
        assert!((core.x - 0.1).abs() < 1e-6);
        assert!((core.y - 0.1).abs() < 1e-6);

        let stars = graph.node(NodeId::Stars).transform.rotation;
        assert!((stars.x + 1.0 / 10.0).abs() < 1e-6);
        assert!((stars.y + 1.0 / 15.0).abs() < 1e-6);
    }

    #[test]
    fn rotations_are_monotonic() {
        let (animator, mut graph, mut camera) = setup();
        let pointer = PointerState::new(0.3, -0.7);
        let mut prev = NodeId::ALL.map(|id| graph.node(id).transform.rotation);
        for _ in 0..120 {
            animator.step(&mut graph, &mut camera, pointer, 1.0 / 60.0);
            let now = NodeId::ALL.map(|id| graph.node(id).transform.rotation);
            for i in 0..2 {
                assert!(now[i].x > prev[i].x);
                assert!(now[i].y > prev[i].y);
            }
            assert!(now[2].x < prev[2].x);
            assert!(now[2].y < prev[2].y);
            prev = now;
        }
    }

    #[test]
    fn camera_converges_geometrically() {
        let (animator, mut graph, mut camera) = setup();
        let pointer = PointerState::new(1.0, 1.0);
        let mut prev_gap = 0.2_f32;
        for _ in 0..50 {
            animator.step(&mut graph, &mut camera, pointer, 1.0 / 60.0);
            let gap = 0.2 - camera.position.x;
            assert!((gap - prev_gap * 0.95).abs() < 1e-6);
            assert_eq!(camera.position.x, camera.position.y);
            prev_gap = gap;
        }
        for _ in 0..350 {
            animator.step(&mut graph, &mut camera, pointer, 1.0 / 60.0);
        }
        assert!((camera.position.x - 0.2).abs() < 1e-6);
        assert!((camera.position.y - 0.2).abs() < 1e-6);
        assert_eq!(camera.position.z, 5.0);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn group_tilts_toward_pointer() {
        let (animator, mut graph, mut camera) = setup();
        let pointer = PointerState::new(1.0, 1.0);
        animator.step(&mut graph, &mut camera, pointer, 0.0);
        assert!((graph.group.rotation.x - (-PI / 20.0) * 0.05).abs() < 1e-7);
        assert!((graph.group.rotation.y - (PI / 20.0) * 0.05).abs() < 1e-7);

        for _ in 0..400 {
            animator.step(&mut graph, &mut camera, pointer, 0.0);
        }
        assert!((graph.group.rotation.x + PI / 20.0).abs() < 1e-5);
        assert!((graph.group.rotation.y - PI / 20.0).abs() < 1e-5);
    }
}

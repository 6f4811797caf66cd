use counsel_common::InstanceId;
use counsel_render::RenderBackend;
use counsel_scene::{NodeId, SceneGraph};
use counsel_stage::SceneRenderer;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a renderer for logging, the CLI and the
/// desktop title bar.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the renderer state.
    pub fn summary<B: RenderBackend>(renderer: &SceneRenderer<B>) -> SceneSummary {
        let ledger = renderer.backend().ledger();
        SceneSummary {
            backend: renderer.backend().name(),
            instance: renderer.instance_id(),
            frames: renderer.frames_rendered(),
            elapsed: renderer.elapsed(),
            camera: renderer.camera().map(|c| c.position.to_array()),
            tilt: renderer
                .graph()
                .map(|g| [g.group.rotation.x, g.group.rotation.y]),
            pointer: renderer.pointer().map(|p| [p.x(), p.y()]),
            live_resources: ledger.live_count(),
            balanced: ledger.is_balanced(),
        }
    }

    /// Transform and geometry stats of one node.
    pub fn inspect_node(graph: &SceneGraph, node: NodeId) -> NodeInfo {
        let mesh = graph.node(node);
        let t = &mesh.transform;
        NodeInfo {
            node,
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            vertices: mesh.geometry.vertex_count(),
            indices: mesh.geometry.index_count(),
            radius: mesh.geometry.bounding_radius(),
        }
    }

    /// All nodes, in scene order.
    pub fn list_nodes(graph: &SceneGraph) -> Vec<NodeInfo> {
        NodeId::ALL
            .iter()
            .map(|n| Self::inspect_node(graph, *n))
            .collect()
    }
}

/// Summary of renderer state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub backend: &'static str,
    pub instance: Option<InstanceId>,
    pub frames: u64,
    pub elapsed: f64,
    pub camera: Option<[f32; 3]>,
    pub tilt: Option<[f32; 2]>,
    pub pointer: Option<[f32; 2]>,
    pub live_resources: usize,
    pub balanced: bool,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.instance {
            Some(id) => write!(
                f,
                "Scene [{id}] backend={} frames={} elapsed={:.2}s live={}",
                self.backend, self.frames, self.elapsed, self.live_resources
            )?,
            None => write!(
                f,
                "Scene [unmounted] backend={} live={} balanced={}",
                self.backend, self.live_resources, self.balanced
            )?,
        }
        if let Some([x, y, z]) = self.camera {
            write!(f, " camera=({x:.3}, {y:.3}, {z:.3})")?;
        }
        if let Some([x, y]) = self.tilt {
            write!(f, " tilt=({x:.3}, {y:.3})")?;
        }
        Ok(())
    }
}

/// Detailed info about a single scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub node: NodeId,
    pub position: [f32; 3],
    /// Euler angles in radians.
    pub rotation: [f32; 3],
    pub vertices: usize,
    pub indices: usize,
    pub radius: f32,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<6} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3}) verts={} idx={} r={:.2}",
            self.node.name(),
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
            self.vertices,
            self.indices,
            self.radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_render::HeadlessBackend;
    use counsel_scene::SceneConfig;
    use counsel_stage::HeadlessHost;

    fn config() -> SceneConfig {
        SceneConfig {
            seed: Some(3),
            ..SceneConfig::default()
        }
    }

    #[test]
    fn summary_unmounted() {
        let renderer = SceneRenderer::new(HeadlessBackend::new());
        let summary = SceneInspector::summary(&renderer);
        assert!(summary.instance.is_none());
        assert_eq!(summary.frames, 0);
        assert!(summary.balanced);
        assert!(summary.to_string().contains("unmounted"));
    }

    #[test]
    fn summary_mounted() {
        let mut host = HeadlessHost::new(800, 600);
        let mut renderer = SceneRenderer::with_config(HeadlessBackend::new(), config());
        renderer.mount(&mut host).unwrap();
        host.run_frames(&mut renderer, 2, 0.5);

        let summary = SceneInspector::summary(&renderer);
        assert_eq!(summary.instance, renderer.instance_id());
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.live_resources, 7);
        assert!(!summary.balanced);
        assert_eq!(summary.camera, Some([0.0, 0.0, 5.0]));
        let text = summary.to_string();
        assert!(text.contains("frames=2"));
        assert!(text.contains("camera=(0.000, 0.000, 5.000)"));
    }

    #[test]
    fn nodes_listed_in_scene_order() {
        let graph = SceneGraph::build(&config());
        let nodes = SceneInspector::list_nodes(&graph);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].node, NodeId::Ring);
        assert_eq!(nodes[2].node, NodeId::Stars);
        assert_eq!(nodes[2].vertices, 5000);
        assert_eq!(nodes[2].indices, 0);
        assert!(nodes[0].radius > 1.5);
    }

    #[test]
    fn node_display() {
        let graph = SceneGraph::build(&config());
        let info = SceneInspector::inspect_node(&graph, NodeId::Core);
        assert!(info.to_string().starts_with("core"));
    }
}

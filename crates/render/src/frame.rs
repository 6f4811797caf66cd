use crate::resource::{GeometryHandle, MaterialHandle};
use counsel_common::Rgb;
use counsel_scene::{Light, NodeId, PerspectiveCamera, SceneGraph};
use glam::{Mat4, Vec3};

/// GPU resources backing one scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBinding {
    pub node: NodeId,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
}

/// One draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub model: Mat4,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub color: Rgb,
    pub alpha: f32,
}

/// Everything a backend needs to draw one frame. Backends read it and never
/// write back into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub lights: Vec<Light>,
    pub items: Vec<DrawItem>,
    pub clear: ClearColor,
}

impl Frame {
    pub fn compose(
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        bindings: &[NodeBinding],
        clear: ClearColor,
    ) -> Self {
        let items = bindings
            .iter()
            .map(|b| DrawItem {
                node: b.node,
                geometry: b.geometry,
                material: b.material,
                model: graph.world_matrix(b.node),
            })
            .collect();

        Self {
            view_proj: camera.view_projection(),
            camera_position: camera.position,
            lights: graph.lights.clone(),
            items,
            clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_scene::SceneConfig;

    #[test]
    fn compose_uses_world_matrices() {
        let config = SceneConfig {
            seed: Some(1),
            ..SceneConfig::default()
        };
        let mut graph = SceneGraph::build(&config);
        graph.group.rotation.y = 0.5;
        let camera = PerspectiveCamera::new(&config.camera, 1.5);
        let bindings = [
            NodeBinding {
                node: NodeId::Ring,
                geometry: GeometryHandle(1),
                material: MaterialHandle(2),
            },
            NodeBinding {
                node: NodeId::Stars,
                geometry: GeometryHandle(3),
                material: MaterialHandle(4),
            },
        ];
        let clear = ClearColor {
            color: Rgb(0),
            alpha: 0.0,
        };

        let frame = Frame::compose(&graph, &camera, &bindings, clear);
        assert_eq!(frame.items.len(), 2);
        assert_eq!(frame.items[0].model, graph.world_matrix(NodeId::Ring));
        assert_eq!(frame.items[1].model, graph.world_matrix(NodeId::Stars));
        assert_eq!(frame.lights.len(), 3);
        assert_eq!(frame.view_proj, camera.view_projection());
    }
}

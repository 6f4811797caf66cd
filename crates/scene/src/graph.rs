use crate::config::SceneConfig;
use crate::geometry::{self, Geometry};
use crate::material::{Light, Material};
use counsel_common::Transform;
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The three drawables of the hero scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Ring,
    Core,
    Stars,
}

impl NodeId {
    pub const ALL: [NodeId; 3] = [NodeId::Ring, NodeId::Core, NodeId::Stars];

    /// Ring and core hang off the tilting group; the star field sits at the root.
    pub fn in_group(self) -> bool {
        matches!(self, NodeId::Ring | NodeId::Core)
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeId::Ring => "ring",
            NodeId::Core => "core",
            NodeId::Stars => "stars",
        }
    }
}

/// One drawable: local transform plus the data its GPU resources are built from.
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub transform: Transform,
    pub geometry: Geometry,
    pub material: Material,
}

/// The fixed hero scene graph.
///
/// ```text
/// root
/// ├── lights (ambient, directional, point)
/// ├── group ── ring
/// │        └── core
/// └── stars
/// ```
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub lights: Vec<Light>,
    pub group: Transform,
    ring: MeshNode,
    core: MeshNode,
    stars: MeshNode,
}

impl SceneGraph {
    /// Build from config, seeding the star field from `config.seed` or OS entropy.
    pub fn build(config: &SceneConfig) -> Self {
        match config.seed {
            Some(seed) => Self::build_with_rng(config, &mut StdRng::seed_from_u64(seed)),
            None => Self::build_with_rng(config, &mut StdRng::from_entropy()),
        }
    }

    pub fn build_with_rng<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let l = &config.lights;
        let lights = vec![
            Light::Ambient {
                color: l.ambient_color,
                intensity: l.ambient_intensity,
            },
            Light::Directional {
                color: l.key_color,
                intensity: l.key_intensity,
                position: l.key_position,
            },
            Light::Point {
                color: l.glow_color,
                intensity: l.glow_intensity,
                range: l.glow_range,
                position: l.glow_position,
            },
        ];

        let r = &config.ring;
        let ring = MeshNode {
            transform: Transform::from_position(Vec3::new(0.0, r.offset_y, 0.0)),
            geometry: geometry::torus(r.radius, r.tube, r.radial_segments, r.tubular_segments),
            material: Material::standard(r.color, r.metalness, r.roughness),
        };

        let c = &config.core;
        let core = MeshNode {
            transform: Transform::from_position(Vec3::new(0.0, c.offset_y, 0.0)),
            geometry: geometry::uv_sphere(c.radius, c.width_segments, c.height_segments),
            material: Material::standard(c.color, 0.0, 1.0)
                .with_emissive(c.emissive, c.emissive_intensity),
        };

        let s = &config.stars;
        let stars = MeshNode {
            transform: Transform::default(),
            geometry: geometry::star_field(rng, s.count, s.extent),
            material: Material::Points {
                color: s.color,
                size: s.size,
            },
        };

        tracing::debug!(
            ring_vertices = ring.geometry.vertex_count(),
            core_vertices = core.geometry.vertex_count(),
            stars = stars.geometry.vertex_count(),
            "built scene graph"
        );

        Self {
            lights,
            group: Transform::default(),
            ring,
            core,
            stars,
        }
    }

    pub fn node(&self, id: NodeId) -> &MeshNode {
        match id {
            NodeId::Ring => &self.ring,
            NodeId::Core => &self.core,
            NodeId::Stars => &self.stars,
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut MeshNode {
        match id {
            NodeId::Ring => &mut self.ring,
            NodeId::Core => &mut self.core,
            NodeId::Stars => &mut self.stars,
        }
    }

    /// Model matrix of a node including its parent group.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let local = self.node(id).transform.matrix();
        if id.in_group() {
            self.group.matrix() * local
        } else {
            local
        }
    }
}

use crate::shaders;
use bytemuck::{Pod, Zeroable};
use counsel_common::Rgb;
use counsel_scene::{Geometry, Light, Material, Topology};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// Upper bound on draws per frame. The hero scene issues three.
pub const MAX_DRAWS: usize = 16;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Summed ambient color times intensity.
    pub ambient: [f32; 4],
    /// Direction toward the key light.
    pub key_dir: [f32; 4],
    pub key_color: [f32; 4],
    /// xyz position, w range (0 = unlimited).
    pub glow_pos: [f32; 4],
    pub glow_color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    /// x metalness, y roughness.
    pub params: [f32; 4],
}

fn scaled(color: Rgb, intensity: f32) -> [f32; 4] {
    let [r, g, b] = color.to_array();
    [r * intensity, g * intensity, b * intensity, 1.0]
}

/// Fold the scene's lights into the fixed uniform slots: all ambient lights
/// are summed, the first directional light is the key, the first point light
/// is the glow. Missing lights contribute nothing.
pub fn pack_globals(view_proj: Mat4, camera_position: Vec3, lights: &[Light]) -> Globals {
    let mut globals = Globals {
        view_proj: view_proj.to_cols_array_2d(),
        camera_pos: camera_position.extend(1.0).to_array(),
        ambient: [0.0, 0.0, 0.0, 1.0],
        key_dir: [0.0, 1.0, 0.0, 0.0],
        key_color: [0.0; 4],
        glow_pos: [0.0; 4],
        glow_color: [0.0; 4],
    };
    let mut have_key = false;
    let mut have_glow = false;
    for light in lights {
        match *light {
            Light::Ambient { color, intensity } => {
                let c = scaled(color, intensity);
                for i in 0..3 {
                    globals.ambient[i] += c[i];
                }
            }
            Light::Directional {
                color,
                intensity,
                position,
            } if !have_key => {
                have_key = true;
                globals.key_dir = position.normalize_or(Vec3::Y).extend(0.0).to_array();
                globals.key_color = scaled(color, intensity);
            }
            Light::Point {
                color,
                intensity,
                range,
                position,
            } if !have_glow => {
                have_glow = true;
                globals.glow_pos = position.extend(range).to_array();
                globals.glow_color = scaled(color, intensity);
            }
            _ => tracing::trace!(?light, "extra light ignored"),
        }
    }
    globals
}

pub fn pack_instance(model: Mat4, material: &Material) -> InstanceData {
    let cols = model.to_cols_array_2d();
    let (color, emissive, params) = match *material {
        Material::Standard {
            color,
            metalness,
            roughness,
            emissive,
            emissive_intensity,
        } => (
            scaled(color, 1.0),
            scaled(emissive, emissive_intensity),
            [metalness, roughness, 0.0, 0.0],
        ),
        Material::Points { color, size } => {
            (scaled(color, 1.0), [0.0, 0.0, 0.0, 1.0], [0.0, 1.0, size, 0.0])
        }
    };
    InstanceData {
        model_0: cols[0],
        model_1: cols[1],
        model_2: cols[2],
        model_3: cols[3],
        color,
        emissive,
        params,
    }
}

/// Interleave positions and normals. Point clouds get zero normals.
pub fn interleave(geometry: &Geometry) -> Vec<Vertex> {
    geometry
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: *p,
            normal: geometry.normals.get(i).copied().unwrap_or([0.0; 3]),
        })
        .collect()
}

/// Clear color for a surface in premultiplied-alpha space.
pub fn clear_color(color: Rgb, alpha: f32) -> wgpu::Color {
    let [r, g, b] = color.to_array();
    let a = alpha.clamp(0.0, 1.0) as f64;
    wgpu::Color {
        r: r as f64 * a,
        g: g as f64 * a,
        b: b as f64 * a,
        a,
    }
}

/// Prefer an alpha mode that lets the page behind show through when the
/// surface is transparent.
pub fn pick_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    use wgpu::CompositeAlphaMode as M;
    let preferred: &[M] = if transparent {
        &[M::PreMultiplied, M::PostMultiplied, M::Inherit]
    } else {
        &[M::Opaque]
    };
    preferred
        .iter()
        .find(|m| modes.contains(m))
        .or_else(|| modes.first())
        .copied()
        .unwrap_or(M::Auto)
}

/// Uploaded vertex data for one geometry.
pub struct GpuGeometry {
    pub label: &'static str,
    pub topology: Topology,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GpuGeometry {
    pub fn upload(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = interleave(geometry);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(geometry.label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = (!geometry.indices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(geometry.label),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            label: geometry.label,
            topology: geometry.topology,
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: geometry.indices.len() as u32,
        }
    }

    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        if let Some(index) = &self.index_buffer {
            index.destroy();
        }
    }
}

/// Pipelines and per-frame buffers shared by every draw.
pub struct ScenePipelines {
    pub mesh: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
    pub globals_buffer: wgpu::Buffer,
    pub globals_bind_group: wgpu::BindGroup,
    pub instance_buffer: wgpu::Buffer,
}

impl ScenePipelines {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&pack_globals(Mat4::IDENTITY, Vec3::ZERO, &[])),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });
        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::POINTS_SHADER.into()),
        });

        let mesh = create_pipeline(
            device,
            &layout,
            &mesh_shader,
            ("vs_main", "fs_main"),
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        );
        let points = create_pipeline(
            device,
            &layout,
            &points_shader,
            ("vs_points", "fs_points"),
            surface_format,
            wgpu::PrimitiveTopology::PointList,
            wgpu::BlendState::ALPHA_BLENDING,
        );

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (MAX_DRAWS * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            mesh,
            points,
            globals_buffer,
            globals_bind_group,
            instance_buffer,
        }
    }

    pub fn pipeline_for(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::Triangles => &self.mesh,
            Topology::Points => &self.points,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs, fs): (&str, &str),
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(vs),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                    ],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        2 => Float32x4,
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                        7 => Float32x4,
                        8 => Float32x4,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        // The ring is thin enough that both faces show.
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

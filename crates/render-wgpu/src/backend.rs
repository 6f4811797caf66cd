use crate::gpu::{self, GpuGeometry, InstanceData, MAX_DRAWS, ScenePipelines};
use counsel_common::Viewport;
use counsel_render::{
    Frame, GeometryHandle, MaterialHandle, RenderBackend, RenderError, ResourceKind,
    ResourceLedger, SurfaceHandle,
};
use counsel_scene::{Geometry, Material};
use std::collections::BTreeMap;

/// Device, queue and the window's presentation surface.
struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: ScenePipelines,
    adapter_name: String,
}

/// The acquired scene surface: the configured window surface plus its depth buffer.
struct ActiveSurface {
    handle: SurfaceHandle,
    viewport: Viewport,
    depth: wgpu::TextureView,
}

/// wgpu backend drawing into one window surface.
///
/// The window can host a single scene surface at a time. When no adapter or
/// device could be obtained the backend still exists, but every surface
/// request fails with [`RenderError::Unavailable`].
pub struct WgpuBackend {
    gpu: Option<GpuContext>,
    unavailable_reason: String,
    active: Option<ActiveSurface>,
    geometries: BTreeMap<GeometryHandle, GpuGeometry>,
    materials: BTreeMap<MaterialHandle, Material>,
    ledger: ResourceLedger,
}

impl WgpuBackend {
    /// Request an adapter and device compatible with `surface`. The surface
    /// is configured later, when the scene acquires it.
    pub fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        transparent: bool,
    ) -> Result<Self, RenderError> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| RenderError::Unavailable("no compatible graphics adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("counsel_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Unavailable("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: 1,
            height: 1,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: gpu::pick_alpha_mode(&caps.alpha_modes, transparent),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let pipelines = ScenePipelines::new(&device, format);
        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = info.backend.to_str(),
            ?format,
            alpha = ?config.alpha_mode,
            "GPU initialized"
        );

        Ok(Self::with_context(Some(GpuContext {
            surface,
            device,
            queue,
            config,
            pipelines,
            adapter_name: info.name,
        })))
    }

    /// A backend with no graphics capability. Mounting against it leaves
    /// the container blank.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let mut backend = Self::with_context(None);
        backend.unavailable_reason = reason.into();
        backend
    }

    fn with_context(gpu: Option<GpuContext>) -> Self {
        Self {
            gpu,
            unavailable_reason: String::new(),
            active: None,
            geometries: BTreeMap::new(),
            materials: BTreeMap::new(),
            ledger: ResourceLedger::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn adapter_name(&self) -> Option<&str> {
        self.gpu.as_ref().map(|g| g.adapter_name.as_str())
    }

    fn context(&self) -> Result<&GpuContext, RenderError> {
        self.gpu
            .as_ref()
            .ok_or_else(|| RenderError::Unavailable(self.unavailable_reason.clone()))
    }

    fn check_surface(&self, surface: SurfaceHandle) -> Result<(), RenderError> {
        match &self.active {
            Some(active) if active.handle == surface => Ok(()),
            _ => Err(RenderError::WrongSurface(surface)),
        }
    }

    /// Configure the window surface for `viewport` and return a matching depth buffer.
    fn configure(&mut self, viewport: Viewport) -> Result<wgpu::TextureView, RenderError> {
        let gpu = self
            .gpu
            .as_mut()
            .ok_or_else(|| RenderError::Unavailable(self.unavailable_reason.clone()))?;
        let (width, height) = viewport.physical_size();
        gpu.config.width = width;
        gpu.config.height = height;
        gpu.surface.configure(&gpu.device, &gpu.config);
        Ok(gpu::create_depth_texture(&gpu.device, width, height))
    }
}

impl RenderBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn create_surface(&mut self, viewport: Viewport) -> Result<SurfaceHandle, RenderError> {
        self.context()?;
        if let Some(active) = &self.active {
            return Err(RenderError::Backend(format!(
                "window surface already held by #{}",
                active.handle.0
            )));
        }
        let depth = self.configure(viewport)?;
        let handle = SurfaceHandle(self.ledger.allocate(ResourceKind::Surface));
        self.active = Some(ActiveSurface {
            handle,
            viewport,
            depth,
        });
        tracing::debug!(surface = handle.0, ?viewport, "surface configured");
        Ok(handle)
    }

    fn resize_surface(
        &mut self,
        surface: SurfaceHandle,
        viewport: Viewport,
    ) -> Result<(), RenderError> {
        self.check_surface(surface)?;
        let depth = self.configure(viewport)?;
        if let Some(active) = &mut self.active {
            active.viewport = viewport;
            active.depth = depth;
        }
        Ok(())
    }

    fn create_geometry(&mut self, geometry: &Geometry) -> Result<GeometryHandle, RenderError> {
        let uploaded = GpuGeometry::upload(&self.context()?.device, geometry);
        let handle = GeometryHandle(self.ledger.allocate(ResourceKind::Geometry));
        self.geometries.insert(handle, uploaded);
        Ok(handle)
    }

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle, RenderError> {
        self.context()?;
        let handle = MaterialHandle(self.ledger.allocate(ResourceKind::Material));
        self.materials.insert(handle, *material);
        Ok(handle)
    }

    fn render(&mut self, surface: SurfaceHandle, frame: &Frame) -> Result<(), RenderError> {
        self.check_surface(surface)?;
        let gpu = self.context()?;
        let Some(active) = &self.active else {
            return Err(RenderError::WrongSurface(surface));
        };

        let items = &frame.items[..frame.items.len().min(MAX_DRAWS)];
        let mut instances: Vec<InstanceData> = Vec::with_capacity(items.len());
        let mut draws = Vec::with_capacity(items.len());
        for item in items {
            let geometry =
                self.geometries
                    .get(&item.geometry)
                    .ok_or(RenderError::UnknownResource {
                        kind: ResourceKind::Geometry,
                        raw: item.geometry.0,
                    })?;
            let material =
                self.materials
                    .get(&item.material)
                    .ok_or(RenderError::UnknownResource {
                        kind: ResourceKind::Material,
                        raw: item.material.0,
                    })?;
            instances.push(gpu::pack_instance(item.model, material));
            draws.push(geometry);
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Err(RenderError::FrameSkipped("surface reconfigured".into()));
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return Err(RenderError::FrameSkipped("surface timeout".into()));
            }
            Err(e) => return Err(RenderError::Backend(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let globals = gpu::pack_globals(frame.view_proj, frame.camera_position, &frame.lights);
        gpu.queue.write_buffer(
            &gpu.pipelines.globals_buffer,
            0,
            bytemuck::bytes_of(&globals),
        );
        if !instances.is_empty() {
            gpu.queue.write_buffer(
                &gpu.pipelines.instance_buffer,
                0,
                bytemuck::cast_slice(&instances),
            );
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(gpu::clear_color(
                            frame.clear.color,
                            frame.clear.alpha,
                        )),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &active.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &gpu.pipelines.globals_bind_group, &[]);
            pass.set_vertex_buffer(1, gpu.pipelines.instance_buffer.slice(..));
            for (i, geometry) in draws.iter().enumerate() {
                let instance = i as u32..i as u32 + 1;
                pass.set_pipeline(gpu.pipelines.pipeline_for(geometry.topology));
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                match &geometry.index_buffer {
                    Some(index) => {
                        pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..geometry.index_count, 0, instance);
                    }
                    None => pass.draw(0..geometry.vertex_count, instance),
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn dispose_geometry(&mut self, handle: GeometryHandle) -> Result<(), RenderError> {
        self.ledger.release(ResourceKind::Geometry, handle.0)?;
        if let Some(geometry) = self.geometries.remove(&handle) {
            tracing::trace!(label = geometry.label, "geometry buffers destroyed");
            geometry.destroy();
        }
        Ok(())
    }

    fn dispose_material(&mut self, handle: MaterialHandle) -> Result<(), RenderError> {
        self.ledger.release(ResourceKind::Material, handle.0)?;
        self.materials.remove(&handle);
        Ok(())
    }

    fn dispose_surface(&mut self, surface: SurfaceHandle) -> Result<(), RenderError> {
        self.check_surface(surface)?;
        self.ledger.release(ResourceKind::Surface, surface.0)?;
        self.active = None;
        Ok(())
    }

    fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_common::Rgb;
    use counsel_scene::geometry;

    #[test]
    fn unavailable_backend_refuses_everything() {
        let mut backend = WgpuBackend::unavailable("no adapter");
        assert!(!backend.is_available());
        assert!(backend.adapter_name().is_none());
        match backend.create_surface(Viewport::new(800, 600)) {
            Err(RenderError::Unavailable(reason)) => assert_eq!(reason, "no adapter"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(
            backend
                .create_geometry(&geometry::uv_sphere(1.0, 3, 2))
                .is_err()
        );
        assert!(
            backend
                .create_material(&Material::standard(Rgb::WHITE, 0.0, 1.0))
                .is_err()
        );
        assert_eq!(backend.ledger().live_count(), 0);
    }

    #[test]
    fn unknown_surface_is_rejected() {
        let mut backend = WgpuBackend::unavailable("none");
        assert!(matches!(
            backend.dispose_surface(SurfaceHandle(3)),
            Err(RenderError::WrongSurface(SurfaceHandle(3)))
        ));
        assert!(backend.dispose_geometry(GeometryHandle(1)).is_err());
    }
}

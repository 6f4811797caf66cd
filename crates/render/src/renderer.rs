use crate::frame::Frame;
use crate::resource::{
    GeometryHandle, MaterialHandle, RenderError, ResourceKind, ResourceLedger, SurfaceHandle,
};
use counsel_common::Viewport;
use counsel_scene::{Geometry, Material};
use std::collections::BTreeMap;

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A backend hands out handles for surfaces, geometries and materials and
/// must account for each of them in its [`ResourceLedger`]. It reads frames
/// and never mutates the scene.
pub trait RenderBackend {
    fn name(&self) -> &'static str;

    /// Acquire a rendering surface sized to `viewport`.
    fn create_surface(&mut self, viewport: Viewport) -> Result<SurfaceHandle, RenderError>;

    /// Resize an existing surface. `viewport` carries logical size and pixel ratio.
    fn resize_surface(
        &mut self,
        surface: SurfaceHandle,
        viewport: Viewport,
    ) -> Result<(), RenderError>;

    fn create_geometry(&mut self, geometry: &Geometry) -> Result<GeometryHandle, RenderError>;

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle, RenderError>;

    /// Draw one frame to `surface`.
    fn render(&mut self, surface: SurfaceHandle, frame: &Frame) -> Result<(), RenderError>;

    fn dispose_geometry(&mut self, handle: GeometryHandle) -> Result<(), RenderError>;

    fn dispose_material(&mut self, handle: MaterialHandle) -> Result<(), RenderError>;

    fn dispose_surface(&mut self, surface: SurfaceHandle) -> Result<(), RenderError>;

    fn ledger(&self) -> &ResourceLedger;
}

/// A call made against a [`HeadlessBackend`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCall {
    CreateSurface(SurfaceHandle),
    ResizeSurface(SurfaceHandle),
    CreateGeometry(GeometryHandle),
    CreateMaterial(MaterialHandle),
    Render(SurfaceHandle),
    DisposeGeometry(GeometryHandle),
    DisposeMaterial(MaterialHandle),
    DisposeSurface(SurfaceHandle),
}

impl BackendCall {
    pub fn is_dispose(&self) -> bool {
        matches!(
            self,
            BackendCall::DisposeGeometry(_)
                | BackendCall::DisposeMaterial(_)
                | BackendCall::DisposeSurface(_)
        )
    }
}

/// Current state of a headless surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub viewport: Viewport,
    pub frames: u64,
}

/// Compact description of the most recent frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub draw_count: usize,
    pub light_count: usize,
    pub camera: [f32; 3],
}

/// Headless recording backend, used in tests and the CLI.
///
/// Keeps no pixels. It validates every handle, records every call in order,
/// and can be told to fail a specific creation call to exercise partial
/// allocation paths.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    ledger: ResourceLedger,
    surfaces: BTreeMap<SurfaceHandle, SurfaceState>,
    geometry_vertices: BTreeMap<GeometryHandle, usize>,
    calls: Vec<BackendCall>,
    creations: usize,
    fail_creation_at: Option<usize>,
    unavailable: bool,
    last_frame: Option<FrameSummary>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose surface creation always fails, as on a host without
    /// graphics capability.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Fail the `index`-th creation call (0-based, counting surfaces,
    /// geometries and materials together).
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_creation_at: Some(index),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn surface(&self, handle: SurfaceHandle) -> Option<&SurfaceState> {
        self.surfaces.get(&handle)
    }

    pub fn last_frame(&self) -> Option<&FrameSummary> {
        self.last_frame.as_ref()
    }

    pub fn frames_rendered(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Render(_)))
            .count()
    }

    /// Human-readable state dump.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Headless backend (calls={}, frames={}) ===\n",
            self.calls.len(),
            self.frames_rendered()
        ));
        for (handle, state) in &self.surfaces {
            out.push_str(&format!(
                "  surface #{} {}x{} @{}x frames={}\n",
                handle.0,
                state.viewport.width,
                state.viewport.height,
                state.viewport.device_pixel_ratio,
                state.frames
            ));
        }
        for (handle, vertices) in &self.geometry_vertices {
            out.push_str(&format!("  geometry #{} vertices={}\n", handle.0, vertices));
        }
        if let Some(frame) = &self.last_frame {
            out.push_str(&format!(
                "Last frame: draws={} lights={} camera=({:.4}, {:.4}, {:.4})\n",
                frame.draw_count,
                frame.light_count,
                frame.camera[0],
                frame.camera[1],
                frame.camera[2]
            ));
        }
        out.push_str(&self.ledger.summary());
        out.push('\n');
        out
    }

    fn check_creation(&mut self) -> Result<(), RenderError> {
        let index = self.creations;
        self.creations += 1;
        if self.fail_creation_at == Some(index) {
            tracing::debug!(index, "injecting creation failure");
            return Err(RenderError::Backend(format!(
                "injected failure at creation #{index}"
            )));
        }
        Ok(())
    }
}

impl RenderBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn create_surface(&mut self, viewport: Viewport) -> Result<SurfaceHandle, RenderError> {
        if self.unavailable {
            return Err(RenderError::Unavailable("headless backend disabled".into()));
        }
        self.check_creation()?;
        let handle = SurfaceHandle(self.ledger.allocate(ResourceKind::Surface));
        self.surfaces
            .insert(handle, SurfaceState { viewport, frames: 0 });
        self.calls.push(BackendCall::CreateSurface(handle));
        Ok(handle)
    }

    fn resize_surface(
        &mut self,
        surface: SurfaceHandle,
        viewport: Viewport,
    ) -> Result<(), RenderError> {
        let state = self
            .surfaces
            .get_mut(&surface)
            .ok_or(RenderError::WrongSurface(surface))?;
        state.viewport = viewport;
        self.calls.push(BackendCall::ResizeSurface(surface));
        Ok(())
    }

    fn create_geometry(&mut self, geometry: &Geometry) -> Result<GeometryHandle, RenderError> {
        self.check_creation()?;
        let handle = GeometryHandle(self.ledger.allocate(ResourceKind::Geometry));
        self.geometry_vertices
            .insert(handle, geometry.vertex_count());
        self.calls.push(BackendCall::CreateGeometry(handle));
        Ok(handle)
    }

    fn create_material(&mut self, _material: &Material) -> Result<MaterialHandle, RenderError> {
        self.check_creation()?;
        let handle = MaterialHandle(self.ledger.allocate(ResourceKind::Material));
        self.calls.push(BackendCall::CreateMaterial(handle));
        Ok(handle)
    }

    fn render(&mut self, surface: SurfaceHandle, frame: &Frame) -> Result<(), RenderError> {
        for item in &frame.items {
            if !self.ledger.is_live(ResourceKind::Geometry, item.geometry.0) {
                return Err(RenderError::UnknownResource {
                    kind: ResourceKind::Geometry,
                    raw: item.geometry.0,
                });
            }
            if !self.ledger.is_live(ResourceKind::Material, item.material.0) {
                return Err(RenderError::UnknownResource {
                    kind: ResourceKind::Material,
                    raw: item.material.0,
                });
            }
        }
        let state = self
            .surfaces
            .get_mut(&surface)
            .ok_or(RenderError::WrongSurface(surface))?;
        state.frames += 1;
        self.last_frame = Some(FrameSummary {
            draw_count: frame.items.len(),
            light_count: frame.lights.len(),
            camera: frame.camera_position.to_array(),
        });
        self.calls.push(BackendCall::Render(surface));
        Ok(())
    }

    fn dispose_geometry(&mut self, handle: GeometryHandle) -> Result<(), RenderError> {
        self.ledger.release(ResourceKind::Geometry, handle.0)?;
        self.geometry_vertices.remove(&handle);
        self.calls.push(BackendCall::DisposeGeometry(handle));
        Ok(())
    }

    fn dispose_material(&mut self, handle: MaterialHandle) -> Result<(), RenderError> {
        self.ledger.release(ResourceKind::Material, handle.0)?;
        self.calls.push(BackendCall::DisposeMaterial(handle));
        Ok(())
    }

    fn dispose_surface(&mut self, surface: SurfaceHandle) -> Result<(), RenderError> {
        self.ledger.release(ResourceKind::Surface, surface.0)?;
        self.surfaces.remove(&surface);
        self.calls.push(BackendCall::DisposeSurface(surface));
        Ok(())
    }

    fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{ClearColor, DrawItem};
    use counsel_common::Rgb;
    use counsel_scene::geometry;
    use counsel_scene::NodeId;
    use glam::{Mat4, Vec3};

    fn empty_frame(items: Vec<DrawItem>) -> Frame {
        Frame {
            view_proj: Mat4::IDENTITY,
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            lights: Vec::new(),
            items,
            clear: ClearColor {
                color: Rgb(0),
                alpha: 0.0,
            },
        }
    }

    #[test]
    fn headless_records_lifecycle() {
        let mut backend = HeadlessBackend::new();
        let surface = backend.create_surface(Viewport::new(800, 600)).unwrap();
        let geo = backend
            .create_geometry(&geometry::uv_sphere(0.3, 8, 8))
            .unwrap();
        let mat = backend
            .create_material(&Material::standard(Rgb(0xffffff), 0.0, 1.0))
            .unwrap();

        let item = DrawItem {
            node: NodeId::Core,
            geometry: geo,
            material: mat,
            model: Mat4::IDENTITY,
        };
        backend.render(surface, &empty_frame(vec![item])).unwrap();
        assert_eq!(backend.frames_rendered(), 1);
        assert_eq!(backend.last_frame().unwrap().draw_count, 1);

        backend.dispose_geometry(geo).unwrap();
        backend.dispose_material(mat).unwrap();
        backend.dispose_surface(surface).unwrap();
        assert!(backend.ledger().is_balanced());
        assert_eq!(backend.calls().len(), 7);
        assert!(backend.calls()[4..].iter().all(BackendCall::is_dispose));
    }

    #[test]
    fn render_rejects_disposed_geometry() {
        let mut backend = HeadlessBackend::new();
        let surface = backend.create_surface(Viewport::new(10, 10)).unwrap();
        let geo = backend
            .create_geometry(&geometry::torus(1.0, 0.1, 4, 4))
            .unwrap();
        let mat = backend
            .create_material(&Material::Points {
                color: Rgb::WHITE,
                size: 1.0,
            })
            .unwrap();
        backend.dispose_geometry(geo).unwrap();

        let item = DrawItem {
            node: NodeId::Ring,
            geometry: geo,
            material: mat,
            model: Mat4::IDENTITY,
        };
        assert!(matches!(
            backend.render(surface, &empty_frame(vec![item])),
            Err(RenderError::UnknownResource {
                kind: ResourceKind::Geometry,
                ..
            })
        ));
    }

    #[test]
    fn resize_updates_surface_state() {
        let mut backend = HeadlessBackend::new();
        let surface = backend.create_surface(Viewport::new(800, 600)).unwrap();
        backend
            .resize_surface(surface, Viewport::new(400, 300).with_pixel_ratio(2.0))
            .unwrap();
        let state = backend.surface(surface).unwrap();
        assert_eq!((state.viewport.width, state.viewport.height), (400, 300));
        assert_eq!(state.viewport.physical_size(), (800, 600));
        assert!(
            backend
                .resize_surface(SurfaceHandle(999), Viewport::new(1, 1))
                .is_err()
        );
    }

    #[test]
    fn injected_failures() {
        let mut backend = HeadlessBackend::unavailable();
        assert!(matches!(
            backend.create_surface(Viewport::new(1, 1)),
            Err(RenderError::Unavailable(_))
        ));
        assert_eq!(backend.ledger().live_count(), 0);

        let mut backend = HeadlessBackend::failing_at(1);
        assert!(backend.create_surface(Viewport::new(1, 1)).is_ok());
        assert!(
            backend
                .create_geometry(&geometry::uv_sphere(1.0, 3, 2))
                .is_err()
        );
        assert_eq!(backend.ledger().live_count(), 1);
    }

    #[test]
    fn describe_mentions_surfaces_and_ledger() {
        let mut backend = HeadlessBackend::new();
        backend.create_surface(Viewport::new(640, 480)).unwrap();
        let text = backend.describe();
        assert!(text.contains("640x480"));
        assert!(text.contains("surface: allocated=1"));
    }
}

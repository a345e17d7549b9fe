//! Cached reference-grid geometry.
//!
//! A [`Grid`] owns exactly one backend line buffer at a time. Every spec
//! mutation re-uploads geometry before returning, so a render can never
//! observe stale lines for a changed spec. Visibility toggles never touch
//! geometry.

use serde::{Deserialize, Serialize};

use crate::backend::{GeometryBackend, LineBuffer};
use crate::lines::{grid_lines, LineList};

/// Coordinate plane the grid lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridPlane {
    Xy,
    Yz,
    #[default]
    Zx,
}

/// Grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Plane the grid lies in
    pub plane: GridPlane,
    /// Extent: the grid spans [-size/2, size/2] along both in-plane axes
    pub size: f32,
    /// Number of grid cells per axis
    pub subdivisions: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            plane: GridPlane::Zx,
            size: 20.0,
            subdivisions: 10,
        }
    }
}

/// Reference grid with backend-cached line geometry and a visibility gate.
#[derive(Debug)]
pub struct Grid {
    spec: GridSpec,
    visible: bool,
    buffer: Option<LineBuffer>,
}

impl Grid {
    /// Build a grid and upload its geometry immediately.
    ///
    /// On buffer-allocation failure the grid stays alive but renders as a
    /// no-op until a later mutation manages to re-acquire.
    pub fn new<B: GeometryBackend>(spec: GridSpec, backend: &mut B) -> Self {
        let mut grid = Self {
            spec,
            visible: true,
            buffer: None,
        };
        grid.rebuild(backend);
        grid
    }

    /// Build with default parameters (ZX plane, size 20, 10 subdivisions).
    pub fn with_defaults<B: GeometryBackend>(backend: &mut B) -> Self {
        Self::new(GridSpec::default(), backend)
    }

    // ── Parameter setters (rebuild in place) ──────────────────

    pub fn set_plane<B: GeometryBackend>(&mut self, plane: GridPlane, backend: &mut B) {
        self.spec.plane = plane;
        self.rebuild(backend);
    }

    pub fn set_size<B: GeometryBackend>(&mut self, size: f32, backend: &mut B) {
        self.spec.size = size;
        self.rebuild(backend);
    }

    pub fn set_subdivisions<B: GeometryBackend>(&mut self, subdivisions: u32, backend: &mut B) {
        self.spec.subdivisions = subdivisions;
        self.rebuild(backend);
    }

    pub fn set_all<B: GeometryBackend>(&mut self, spec: GridSpec, backend: &mut B) {
        self.spec = spec;
        self.rebuild(backend);
    }

    // ── Visibility ────────────────────────────────────────────

    pub fn turn_on(&mut self) {
        self.visible = true;
    }

    pub fn turn_off(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    // ── Geometry lifecycle ────────────────────────────────────

    /// Release the current buffer, acquire a fresh one and rebuild.
    ///
    /// Call once after the render context is fully set up; buffer
    /// compilation may depend on the context being ready.
    pub fn generate<B: GeometryBackend>(&mut self, backend: &mut B) {
        if let Some(buffer) = self.buffer.take() {
            backend.release(buffer);
        }
        self.rebuild(backend);
    }

    /// Replay the cached geometry if visible. O(1), no allocation.
    pub fn render<B: GeometryBackend>(&self, backend: &mut B) {
        if !self.visible {
            return;
        }
        if let Some(buffer) = self.buffer {
            backend.replay(buffer);
        }
    }

    /// Copy this grid: same spec and visibility, its own fresh buffer.
    pub fn duplicate<B: GeometryBackend>(&self, backend: &mut B) -> Self {
        let mut copy = Self {
            spec: self.spec,
            visible: self.visible,
            buffer: None,
        };
        copy.rebuild(backend);
        copy
    }

    /// Release the backend buffer. The grid renders as a no-op afterwards.
    pub fn destroy<B: GeometryBackend>(&mut self, backend: &mut B) {
        if let Some(buffer) = self.buffer.take() {
            backend.release(buffer);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn plane(&self) -> GridPlane {
        self.spec.plane
    }

    pub fn size(&self) -> f32 {
        self.spec.size
    }

    pub fn subdivisions(&self) -> u32 {
        self.spec.subdivisions
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn buffer(&self) -> Option<LineBuffer> {
        self.buffer
    }

    /// Current line geometry for the spec.
    pub fn lines(&self) -> LineList {
        grid_lines(self.spec.plane, self.spec.size, self.spec.subdivisions)
    }

    /// Upload current geometry, acquiring a buffer if none is live.
    fn rebuild<B: GeometryBackend>(&mut self, backend: &mut B) {
        let buffer = match self.buffer {
            Some(buffer) => buffer,
            None => match backend.acquire() {
                Ok(buffer) => {
                    self.buffer = Some(buffer);
                    buffer
                }
                Err(e) => {
                    tracing::error!("grid buffer allocation failed: {e}");
                    return;
                }
            },
        };
        if let Err(e) = backend.upload(buffer, &self.lines()) {
            tracing::error!("grid upload failed: {e}");
            backend.release(buffer);
            self.buffer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::capture::{BackendEvent, CaptureBackend};

    #[test]
    fn test_defaults() {
        let spec = GridSpec::default();
        assert_eq!(spec.plane, GridPlane::Zx);
        assert_eq!(spec.size, 20.0);
        assert_eq!(spec.subdivisions, 10);
    }

    #[test]
    fn test_construction_uploads_immediately() {
        let mut backend = CaptureBackend::new();
        let grid = Grid::with_defaults(&mut backend);

        let buffer = grid.buffer().unwrap();
        let contents = backend.contents(buffer).unwrap();
        assert_eq!(contents.vertex_count(), 4 * 11);
        assert!(grid.is_visible());
    }

    #[test]
    fn test_setters_keep_handle_and_replace_contents() {
        let mut backend = CaptureBackend::new();
        let mut grid = Grid::with_defaults(&mut backend);
        let buffer = grid.buffer().unwrap();

        grid.set_subdivisions(4, &mut backend);
        assert_eq!(grid.buffer(), Some(buffer));
        assert_eq!(backend.contents(buffer).unwrap().vertex_count(), 4 * 5);

        grid.set_plane(GridPlane::Xy, &mut backend);
        assert_eq!(grid.buffer(), Some(buffer));
        for v in &backend.contents(buffer).unwrap().vertices {
            assert_eq!(v.z, 0.0);
        }

        grid.set_size(8.0, &mut backend);
        assert_eq!(grid.buffer(), Some(buffer));
        let max_x = backend
            .contents(buffer)
            .unwrap()
            .vertices
            .iter()
            .map(|v| v.x)
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((max_x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_generate_swaps_handle_release_first() {
        let mut backend = CaptureBackend::new();
        let mut grid = Grid::with_defaults(&mut backend);
        let old = grid.buffer().unwrap();

        backend.clear_events();
        grid.generate(&mut backend);
        let new = grid.buffer().unwrap();

        assert_ne!(old, new);
        assert_eq!(backend.live_buffer_count(), 1);
        assert_eq!(
            backend.events(),
            &[
                BackendEvent::Released(old),
                BackendEvent::Acquired(new),
                BackendEvent::Uploaded(new),
            ]
        );
    }

    #[test]
    fn test_visibility_gates_render() {
        let mut backend = CaptureBackend::new();
        let mut grid = Grid::with_defaults(&mut backend);

        grid.render(&mut backend);
        assert_eq!(backend.replay_count(), 1);

        grid.turn_off();
        grid.render(&mut backend);
        assert_eq!(backend.replay_count(), 1);

        grid.toggle();
        assert!(grid.is_visible());
        grid.toggle();
        grid.toggle();
        assert!(grid.is_visible());
        grid.render(&mut backend);
        assert_eq!(backend.replay_count(), 2);
    }

    #[test]
    fn test_toggle_never_touches_geometry() {
        let mut backend = CaptureBackend::new();
        let mut grid = Grid::with_defaults(&mut backend);
        backend.clear_events();

        grid.turn_off();
        grid.turn_on();
        grid.toggle();
        assert!(backend.events().is_empty());
    }

    #[test]
    fn test_duplicate_gets_own_handle() {
        let mut backend = CaptureBackend::new();
        let mut grid = Grid::new(
            GridSpec {
                plane: GridPlane::Yz,
                size: 6.0,
                subdivisions: 3,
            },
            &mut backend,
        );
        grid.turn_off();

        let copy = grid.duplicate(&mut backend);
        assert_ne!(copy.buffer(), grid.buffer());
        assert_eq!(copy.spec(), grid.spec());
        assert!(!copy.is_visible());
        assert_eq!(backend.live_buffer_count(), 2);

        // Destroying one leaves the other's buffer live.
        grid.destroy(&mut backend);
        assert_eq!(backend.live_buffer_count(), 1);
        assert!(backend.contents(copy.buffer().unwrap()).is_some());
    }

    #[test]
    fn test_failed_acquire_renders_as_noop() {
        let mut backend = CaptureBackend::new();
        backend.fail_next_acquire();
        let grid = Grid::with_defaults(&mut backend);

        assert!(grid.buffer().is_none());
        grid.render(&mut backend);
        assert_eq!(backend.replay_count(), 0);
    }

    #[test]
    fn test_setter_recovers_after_failed_acquire() {
        let mut backend = CaptureBackend::new();
        backend.fail_next_acquire();
        let mut grid = Grid::with_defaults(&mut backend);
        assert!(grid.buffer().is_none());

        grid.set_size(10.0, &mut backend);
        assert!(grid.buffer().is_some());
        grid.render(&mut backend);
        assert_eq!(backend.replay_count(), 1);
    }
}

//! Drag-session zoom control.
//!
//! Horizontal mouse travel in normalised device coordinates maps to a
//! uniform scale: one unit of travel doubles (or halves) the scale, so
//! small drags make fine adjustments while larger drags grow
//! multiplicatively. During a drag the scale is always recomputed from the
//! baseline captured at the previous drag's end, never compounded per
//! tick; successive drag sessions compose multiplicatively.

use glam::{Mat4, Vec3};

/// Mouse-driven uniform-scale controller.
///
/// Feed [`mouse`](ZoomControl::mouse) samples, bracket drags with
/// [`begin_drag`](ZoomControl::begin_drag) /
/// [`end_drag`](ZoomControl::end_drag), and call
/// [`update`](ZoomControl::update) once per frame.
#[derive(Debug, Clone)]
pub struct ZoomControl {
    /// Current transform; diagonal tracks `scale`
    matrix: Mat4,
    dragging: bool,
    /// Most recent horizontal mouse sample
    last_x: f32,
    /// Horizontal sample recorded at drag start
    anchor_x: f32,
    /// Current uniform scale
    scale: Vec3,
    /// Baseline committed at the end of the previous drag
    drag_base: Vec3,
}

impl Default for ZoomControl {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            dragging: false,
            last_x: 0.0,
            anchor_x: 0.0,
            scale: Vec3::ONE,
            drag_base: Vec3::ONE,
        }
    }
}

impl ZoomControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to unit scale and an identity matrix.
    pub fn reset(&mut self) {
        self.scale = Vec3::ONE;
        self.drag_base = Vec3::ONE;
        self.matrix = Mat4::IDENTITY;
    }

    /// Record the horizontal mouse coordinate. Never changes the scale.
    pub fn mouse(&mut self, x: f32) {
        self.last_x = x;
    }

    /// Record a full mouse position; only the horizontal component drives zoom.
    pub fn mouse_position(&mut self, pos: Vec3) {
        self.last_x = pos.x;
    }

    /// Start a drag session anchored at the last mouse sample.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.anchor_x = self.last_x;
    }

    /// End the drag and commit the reached scale as the next baseline.
    /// Harmless when no drag is active.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.drag_base = self.scale;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Per-frame tick. No-op unless a drag is active.
    ///
    /// A mouse movement of 1.0 changes the scale by a factor of 2, in
    /// transformed mouse coordinates (-1 to 1). All three scale components
    /// change together so later rotations see a uniform view scale.
    pub fn update(&mut self) {
        if !self.dragging {
            return;
        }

        self.scale = self.drag_base;

        let diff = self.last_x - self.anchor_x;
        let factor = 1.0 + diff.abs();
        if diff < 0.0 {
            self.scale /= factor;
        } else {
            self.scale *= factor;
        }

        // Diagonal only; the matrix stays otherwise untouched, so callers
        // wanting a clean transform reset() first.
        self.matrix.x_axis.x = self.scale.x;
        self.matrix.y_axis.y = self.scale.y;
        self.matrix.z_axis.z = self.scale.z;
    }

    /// Current transform matrix.
    pub fn value(&self) -> Mat4 {
        self.matrix
    }

    /// Current scale vector.
    pub fn zoom_value(&self) -> Vec3 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_uniform(zoom: &ZoomControl, expected: f32) {
        let s = zoom.zoom_value();
        assert!((s.x - expected).abs() < 1e-6, "x: {} vs {expected}", s.x);
        assert_eq!(s.x, s.y);
        assert_eq!(s.y, s.z);
        let m = zoom.value();
        assert_eq!(m.x_axis.x, s.x);
        assert_eq!(m.y_axis.y, s.y);
        assert_eq!(m.z_axis.z, s.z);
    }

    #[test]
    fn test_reset_and_idle_update() {
        let mut zoom = ZoomControl::new();
        zoom.reset();
        zoom.update();
        assert!(!zoom.is_dragging());
        assert_eq!(zoom.zoom_value(), Vec3::ONE);
        assert_eq!(zoom.value(), Mat4::IDENTITY);
    }

    #[test]
    fn test_drag_scales_relative_to_anchor() {
        let mut zoom = ZoomControl::new();
        zoom.mouse(0.0);
        zoom.begin_drag();
        assert!(zoom.is_dragging());

        zoom.mouse(0.5);
        zoom.update();
        assert_uniform(&zoom, 1.5);

        // Moving back re-derives from the drag baseline, not from 1.5.
        zoom.mouse(0.2);
        zoom.update();
        assert_uniform(&zoom, 1.2);
    }

    #[test]
    fn test_negative_drag_zooms_out() {
        let mut zoom = ZoomControl::new();
        zoom.mouse(0.0);
        zoom.begin_drag();
        zoom.mouse(-0.3);
        zoom.update();
        assert_uniform(&zoom, 1.0 / 1.3);
    }

    #[test]
    fn test_mouse_alone_changes_nothing() {
        let mut zoom = ZoomControl::new();
        zoom.mouse(0.7);
        zoom.mouse_position(Vec3::new(-0.4, 9.0, 9.0));
        assert_eq!(zoom.zoom_value(), Vec3::ONE);
        assert_eq!(zoom.value(), Mat4::IDENTITY);
    }

    #[test]
    fn test_mouse_position_uses_x_only() {
        let mut zoom = ZoomControl::new();
        zoom.mouse_position(Vec3::new(0.0, 5.0, -5.0));
        zoom.begin_drag();
        zoom.mouse_position(Vec3::new(0.25, -3.0, 8.0));
        zoom.update();
        assert_uniform(&zoom, 1.25);
    }

    #[test]
    fn test_sessions_compose_multiplicatively() {
        let mut zoom = ZoomControl::new();

        // Two full drags of +1.0 each: 2 * 2 = 4, not 2.
        for _ in 0..2 {
            zoom.mouse(0.0);
            zoom.begin_drag();
            zoom.mouse(1.0);
            zoom.update();
            zoom.end_drag();
        }
        assert!(!zoom.is_dragging());
        assert_uniform(&zoom, 4.0);
    }

    #[test]
    fn test_end_drag_without_begin_is_harmless() {
        let mut zoom = ZoomControl::new();
        zoom.end_drag();
        assert!(!zoom.is_dragging());
        assert_eq!(zoom.zoom_value(), Vec3::ONE);

        // Baseline stays committed at whatever scale was current.
        zoom.update();
        assert_eq!(zoom.zoom_value(), Vec3::ONE);
    }

    #[test]
    fn test_update_ticks_are_idempotent_within_a_drag() {
        let mut zoom = ZoomControl::new();
        zoom.mouse(0.0);
        zoom.begin_drag();
        zoom.mouse(0.5);
        zoom.update();
        zoom.update();
        zoom.update();
        assert_uniform(&zoom, 1.5);
    }
}

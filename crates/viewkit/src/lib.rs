//! Reference-grid overlay and drag-zoom control for interactive 3D viewports.
//!
//! Two independent components, both driven from an ordinary render loop:
//!
//! - [`grid::Grid`] — cached line geometry for an axis-aligned reference
//!   grid, regenerated whenever its [`grid::GridSpec`] changes and replayed
//!   cheaply on every frame.
//! - [`zoom::ZoomControl`] — a drag-session zoom controller that turns
//!   horizontal mouse travel into a uniform scale matrix.
//!
//! Geometry compilation and replay go through the [`backend::GeometryBackend`]
//! seam; [`backend::gl`] is the glow implementation for real viewports and
//! [`backend::capture`] a headless double for tests.

pub mod backend;
pub mod grid;
pub mod lines;
pub mod zoom;

pub use backend::{BackendError, GeometryBackend, LineBuffer};
pub use grid::{Grid, GridPlane, GridSpec};
pub use zoom::ZoomControl;

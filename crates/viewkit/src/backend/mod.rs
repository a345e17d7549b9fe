//! Geometry backend seam.
//!
//! A backend owns compiled line buffers: `upload` replaces a buffer's
//! contents wholesale, `replay` draws it. The grid never replays a buffer
//! it did not successfully upload, and releases a handle before acquiring
//! its replacement.

pub mod capture;
pub mod gl;

use crate::lines::LineList;

/// Opaque handle to one backend-compiled line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineBuffer(pub(crate) u64);

impl LineBuffer {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Resource exhaustion while creating GPU objects.
    #[error("failed to allocate line buffer: {0}")]
    Allocation(String),
    /// Handle was never acquired or already released.
    #[error("unknown line buffer {0:?}")]
    UnknownBuffer(LineBuffer),
}

/// Compile-once / replay-many storage for line geometry.
pub trait GeometryBackend {
    /// Allocate an empty line buffer.
    fn acquire(&mut self) -> Result<LineBuffer, BackendError>;

    /// Free a buffer. Releasing an unknown handle is a no-op.
    fn release(&mut self, buffer: LineBuffer);

    /// Replace the buffer's contents with `lines`.
    fn upload(&mut self, buffer: LineBuffer, lines: &LineList) -> Result<(), BackendError>;

    /// Draw the buffer. Unknown handles are logged and skipped, never a panic.
    fn replay(&mut self, buffer: LineBuffer);
}

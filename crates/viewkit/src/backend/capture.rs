//! Headless backend double for tests and programmatic drivers.
//!
//! Stores uploaded line lists in memory and records every handle event so
//! tests can assert the exact acquire/upload/replay/release lifecycle.

use std::collections::HashMap;

use crate::lines::LineList;

use super::{BackendError, GeometryBackend, LineBuffer};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    Acquired(LineBuffer),
    Released(LineBuffer),
    Uploaded(LineBuffer),
    Replayed(LineBuffer),
}

/// In-memory recording backend.
#[derive(Debug, Default)]
pub struct CaptureBackend {
    next_id: u64,
    buffers: HashMap<LineBuffer, LineList>,
    events: Vec<BackendEvent>,
    fail_next_acquire: bool,
}

impl CaptureBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `acquire` fail, simulating resource exhaustion.
    pub fn fail_next_acquire(&mut self) {
        self.fail_next_acquire = true;
    }

    /// Contents last uploaded into `buffer`, if it is live.
    pub fn contents(&self, buffer: LineBuffer) -> Option<&LineList> {
        self.buffers.get(&buffer)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn events(&self) -> &[BackendEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of replay events recorded so far.
    pub fn replay_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BackendEvent::Replayed(_)))
            .count()
    }
}

impl GeometryBackend for CaptureBackend {
    fn acquire(&mut self) -> Result<LineBuffer, BackendError> {
        if self.fail_next_acquire {
            self.fail_next_acquire = false;
            return Err(BackendError::Allocation("simulated exhaustion".into()));
        }
        self.next_id += 1;
        let buffer = LineBuffer(self.next_id);
        self.buffers.insert(buffer, LineList::new());
        self.events.push(BackendEvent::Acquired(buffer));
        Ok(buffer)
    }

    fn release(&mut self, buffer: LineBuffer) {
        if self.buffers.remove(&buffer).is_some() {
            self.events.push(BackendEvent::Released(buffer));
        }
    }

    fn upload(&mut self, buffer: LineBuffer, lines: &LineList) -> Result<(), BackendError> {
        match self.buffers.get_mut(&buffer) {
            Some(slot) => {
                *slot = lines.clone();
                self.events.push(BackendEvent::Uploaded(buffer));
                Ok(())
            }
            None => Err(BackendError::UnknownBuffer(buffer)),
        }
    }

    fn replay(&mut self, buffer: LineBuffer) {
        if self.buffers.contains_key(&buffer) {
            self.events.push(BackendEvent::Replayed(buffer));
        } else {
            tracing::warn!("replay of unknown buffer {buffer:?} skipped");
        }
    }
}

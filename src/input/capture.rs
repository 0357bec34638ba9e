//! Pointer capture bookkeeping.
//!
//! A gesture that starts on pointer-down keeps receiving moves and the final
//! pointer-up even when the pointer leaves the canvas. Each active gesture
//! holds one [`PointerCapture`]; dropping it (gesture end, cancel, or session
//! teardown) deregisters it. The tracker lets hosts and tests verify that
//! nothing outlives its gesture.

use super::state::GestureKind;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Counts live captures for one editor session.
#[derive(Debug, Clone, Default)]
pub struct CaptureTracker {
    active: Rc<Cell<usize>>,
}

impl CaptureTracker {
    pub fn acquire(&self, kind: GestureKind) -> PointerCapture {
        self.active.set(self.active.get() + 1);
        trace!(?kind, active = self.active.get(), "Pointer captured");
        PointerCapture {
            active: Rc::clone(&self.active),
            kind,
        }
    }

    /// Number of captures currently alive.
    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// Scoped registration of a gesture's move/up listeners.
#[derive(Debug)]
pub struct PointerCapture {
    active: Rc<Cell<usize>>,
    kind: GestureKind,
}

impl PointerCapture {
    pub fn kind(&self) -> GestureKind {
        self.kind
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        trace!(kind = ?self.kind, active = self.active.get(), "Pointer released");
    }
}

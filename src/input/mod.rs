//! Pointer and keyboard input handling for the designer canvas.
//!
//! This module implements the interaction engine of an [`EditorSession`]:
//! selection, element dragging, corner resizing, viewport panning and zoom.
//!
//! ## Architecture
//!
//! The engine is an explicit state machine ([`InputState`]). A gesture can
//! only begin from `Idle`, so drag, resize and pan never overlap. While a
//! gesture runs, pointer moves are queued into a coalesce-to-latest
//! [`FrameQueue`](crate::frame::FrameQueue) and applied once per frame tick
//! to a [`GhostOverride`] (or the live pan offset). The template model is
//! written exactly once, on pointer-up.
//!
//! Pointer positions are screen coordinates relative to the canvas
//! container's top-left corner.
//!
//! ## Modules
//!
//! - `state` - Input state machine enum, tool mode, ghost override
//! - `capture` - Scoped pointer-capture registrations
//! - `mouse_down` - Pointer-down (selection, gesture start)
//! - `drag` - Pointer-move queueing, frame ticks, hover cursor
//! - `mouse_up` - Pointer-up commit and gesture cancellation
//! - `transform` - Zoom, fit-to-view, container sizing
//! - `keyboard` - Tool and delete shortcuts
//!
//! [`EditorSession`]: crate::editor::EditorSession

mod capture;
mod drag;
mod keyboard;
mod mouse_down;
mod mouse_up;
mod state;
mod transform;

pub use capture::{CaptureTracker, PointerCapture};
pub use state::{GestureKind, GhostOverride, InputState, ToolMode};

use crate::geometry::ResizeHandle;

/// Pointer buttons the canvas distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Dedicated pan button, honored in every tool mode
    Middle,
    Secondary,
}

/// What a pointer-down, pointer-up or cancel did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Started(GestureKind),
    Committed(GestureKind),
    Cancelled(GestureKind),
    SelectionCleared,
    /// A gesture is already active
    Rejected,
    Ignored,
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Escape,
    Other,
}

/// Cursor affordance for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Move,
    Grab,
    Grabbing,
    Resize(ResizeHandle),
}

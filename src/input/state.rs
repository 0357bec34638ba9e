//! Input state machine - one explicit state for every pointer interaction.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Dragging     (pointer down on an element, select tool)
//! Idle -> Resizing     (pointer down on a handle of the selected element, any tool)
//! Idle -> Panning      (pointer down with the pan tool, or the pan button in any tool)
//!
//! Dragging | Resizing | Panning -> Idle   (pointer up commits, cancel discards)
//! ```
//!
//! Gestures only start from `Idle`; the non-idle states carry the
//! [`PointerCapture`] that keeps the gesture's listeners alive, so leaving
//! the state releases them.

use super::capture::PointerCapture;
use crate::geometry::{Point, Rect, ResizeHandle};
use crate::types::ElementId;

/// Global tool mode, independent of the gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Select,
    Pan,
}

/// Which gesture a non-idle state represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
    Pan,
}

#[derive(Debug, Default)]
pub enum InputState {
    /// No active gesture
    #[default]
    Idle,

    /// Moving one element
    Dragging {
        element_id: ElementId,
        /// Element position at gesture start (canvas space)
        start_position: Point,
        /// Pointer position at gesture start (screen space)
        anchor: Point,
        capture: PointerCapture,
    },

    /// Resizing the selected element through one corner
    Resizing {
        element_id: ElementId,
        handle: ResizeHandle,
        /// Element bounds at gesture start (canvas space)
        start_bounds: Rect,
        /// Pointer position at gesture start (screen space)
        anchor: Point,
        capture: PointerCapture,
    },

    /// Moving the viewport
    Panning {
        /// Pan offset at gesture start
        start_pan: Point,
        /// Pointer position at gesture start (screen space)
        anchor: Point,
        capture: PointerCapture,
    },
}

impl InputState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle => None,
            Self::Dragging { .. } => Some(GestureKind::Drag),
            Self::Resizing { .. } => Some(GestureKind::Resize),
            Self::Panning { .. } => Some(GestureKind::Pan),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    /// Element being dragged or resized, if any.
    pub fn active_element(&self) -> Option<&ElementId> {
        match self {
            Self::Dragging { element_id, .. } | Self::Resizing { element_id, .. } => {
                Some(element_id)
            }
            _ => None,
        }
    }

    pub fn resize_handle(&self) -> Option<ResizeHandle> {
        match self {
            Self::Resizing { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    /// Leave the current state, releasing its capture.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

/// Interaction-local position/size override for the element under a drag or
/// resize. The renderer paints it instead of the model's bounds until the
/// gesture commits.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostOverride {
    pub element_id: ElementId,
    pub bounds: Rect,
}

//! Pointer-up handling - commit the active gesture.
//!
//! The final pointer position is applied synchronously (no waiting for the
//! next frame tick) and the resulting ghost bounds or pan offset is written
//! back exactly once. Cancellation (capture loss, window blur, Escape)
//! discards the ghost instead, leaving the model at its last committed state.

use super::{GestureKind, InputState, PointerOutcome};
use crate::editor::EditorSession;
use crate::geometry::Point;
use crate::profile_scope;
use crate::types::ElementPatch;
use tracing::{debug, info};

impl EditorSession {
    pub fn pointer_up(&mut self, position: Point) -> PointerOutcome {
        profile_scope!("pointer_up");

        let Some(kind) = self.input_state.kind() else {
            return PointerOutcome::Ignored;
        };

        self.pending_move.push(position);
        if let Some(latest) = self.pending_move.flush() {
            self.apply_pointer(latest);
        }

        let ghost = self.ghost.take();
        let display_pan = self.display_pan.take();
        // Leaving the state drops the pointer capture.
        match std::mem::take(&mut self.input_state) {
            InputState::Dragging { element_id, .. } => {
                if let Some(ghost) = ghost.filter(|g| g.element_id == element_id) {
                    let moved =
                        self.model
                            .move_element(&element_id, ghost.bounds.x, ghost.bounds.y);
                    debug!(element_id = %element_id, x = ghost.bounds.x, y = ghost.bounds.y, moved, "Drag committed");
                }
            }
            InputState::Resizing { element_id, .. } => {
                if let Some(ghost) = ghost.filter(|g| g.element_id == element_id) {
                    let resized = self
                        .model
                        .update_element(&element_id, &ElementPatch::bounds(ghost.bounds));
                    debug!(element_id = %element_id, w = ghost.bounds.width, h = ghost.bounds.height, resized, "Resize committed");
                }
            }
            InputState::Panning { .. } => {
                if let Some(pan) = display_pan {
                    self.view.pan = pan;
                    debug!(x = pan.x, y = pan.y, "Pan committed");
                }
            }
            InputState::Idle => {}
        }

        PointerOutcome::Committed(kind)
    }

    /// Abandon the active gesture without committing it. Used for capture
    /// loss, window blur and Escape.
    pub fn cancel_gesture(&mut self) -> PointerOutcome {
        let Some(kind) = self.input_state.kind() else {
            return PointerOutcome::Ignored;
        };
        self.pending_move.clear();
        self.ghost = None;
        self.display_pan = None;
        self.input_state.reset();
        info!(?kind, "Gesture cancelled");
        PointerOutcome::Cancelled(kind)
    }

    /// The window lost focus or the pointer capture was taken away.
    pub fn blur(&mut self) -> PointerOutcome {
        self.text_focus = false;
        self.cancel_gesture()
    }
}

//! Pointer-move handling - drag, resize and pan feedback.
//!
//! ## Performance Notes
//!
//! Pointer moves can arrive far more often than the display refreshes.
//! `pointer_move` only queues the position; `frame_tick` applies the latest
//! one to the ghost override (or the live pan offset). Nothing here touches
//! the template model, so the model revision and the spatial index stay put
//! for the whole gesture.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use super::{Cursor, GhostOverride, InputState, ToolMode};
use crate::editor::EditorSession;
use crate::geometry::{Point, Rect, compute_resize, delta_to_canvas};
use crate::profile_scope;
use tracing::trace;

/// Result of applying one pointer position to the active gesture.
enum Feedback {
    Ghost(Rect),
    Pan(Point),
}

impl EditorSession {
    /// Queue a pointer move. Returns false when no gesture is active.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        if self.input_state.is_idle() {
            return false;
        }
        self.pending_move.push(position);
        true
    }

    /// Apply the latest queued pointer move. Call once per display refresh.
    /// Returns true when the displayed frame changed.
    pub fn frame_tick(&mut self) -> bool {
        profile_scope!("frame_tick", crate::perf::TARGET_FRAME_MS);

        match self.pending_move.flush() {
            Some(position) => self.apply_pointer(position),
            None => false,
        }
    }

    pub(crate) fn apply_pointer(&mut self, position: Point) -> bool {
        let zoom = self.view.zoom;
        let feedback = match &self.input_state {
            InputState::Idle => return false,
            InputState::Dragging {
                start_position,
                anchor,
                ..
            } => {
                let Some(ghost) = self.ghost.as_ref() else {
                    return false;
                };
                let delta = delta_to_canvas(position - *anchor, zoom);
                let origin = (*start_position + delta).clamp_non_negative();
                Feedback::Ghost(Rect::new(
                    origin.x,
                    origin.y,
                    ghost.bounds.width,
                    ghost.bounds.height,
                ))
            }
            InputState::Resizing {
                handle,
                start_bounds,
                anchor,
                ..
            } => {
                let delta = delta_to_canvas(position - *anchor, zoom);
                Feedback::Ghost(compute_resize(*handle, delta.x, delta.y, *start_bounds))
            }
            InputState::Panning {
                start_pan, anchor, ..
            } => Feedback::Pan(*start_pan + (position - *anchor)),
        };

        match feedback {
            Feedback::Ghost(bounds) => match self.ghost.as_mut() {
                Some(GhostOverride { bounds: current, .. }) if *current != bounds => {
                    trace!(x = bounds.x, y = bounds.y, w = bounds.width, h = bounds.height, "Ghost moved");
                    *current = bounds;
                    true
                }
                _ => false,
            },
            Feedback::Pan(pan) => {
                let changed = self.display_pan != Some(pan);
                self.display_pan = Some(pan);
                changed
            }
        }
    }

    /// Cursor affordance for a pointer position.
    pub fn hover(&mut self, position: Point) -> Cursor {
        match &self.input_state {
            InputState::Dragging { .. } | InputState::Panning { .. } => return Cursor::Grabbing,
            InputState::Resizing { handle, .. } => return Cursor::Resize(*handle),
            InputState::Idle => {}
        }

        if let Some(handle) = self.handle_at(position) {
            return Cursor::Resize(handle);
        }
        if self.tool_mode == ToolMode::Pan {
            return Cursor::Grab;
        }
        self.sync_spatial();
        let canvas_point = self.view.to_canvas(position);
        if self.spatial.topmost_at(canvas_point).is_some() {
            Cursor::Move
        } else {
            Cursor::Default
        }
    }
}

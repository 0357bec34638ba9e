//! Pointer-down handling - selection and gesture start.
//!
//! Hit testing goes through the R-tree spatial index, which is resynced
//! lazily from the template revision.

use super::{GestureKind, GhostOverride, InputState, PointerButton, PointerOutcome, ToolMode};
use crate::constants::HANDLE_SIZE;
use crate::editor::EditorSession;
use crate::geometry::{Point, ResizeHandle};
use crate::profile_scope;
use crate::types::ElementId;
use tracing::debug;

impl EditorSession {
    pub fn pointer_down(&mut self, position: Point, button: PointerButton) -> PointerOutcome {
        profile_scope!("pointer_down");

        if !self.input_state.is_idle() {
            debug!(
                active = ?self.input_state.kind(),
                "Pointer down rejected, gesture already active"
            );
            return PointerOutcome::Rejected;
        }

        match button {
            PointerButton::Secondary => return PointerOutcome::Ignored,
            PointerButton::Middle => return self.start_pan(position),
            PointerButton::Primary => {}
        }

        // Handles of the selected element win over everything, in any tool.
        if let Some(handle) = self.handle_at(position) {
            return self.start_resize(position, handle);
        }

        if self.tool_mode == ToolMode::Pan {
            return self.start_pan(position);
        }

        let canvas_point = self.view.to_canvas(position);
        self.sync_spatial();
        match self.spatial.topmost_at(canvas_point) {
            Some(element_id) => {
                self.model.select(Some(&element_id));
                self.start_drag(position, element_id)
            }
            None => {
                if self.model.selected_id().is_some() {
                    debug!("Selection cleared");
                }
                self.model.clear_selection();
                PointerOutcome::SelectionCleared
            }
        }
    }

    /// The handle of the selected element under a screen position.
    pub fn handle_at(&self, position: Point) -> Option<ResizeHandle> {
        let element = self.model.selected_element()?;
        let screen = self.viewport().rect_to_screen(&element.bounds());
        let reach = HANDLE_SIZE / 2.0;
        ResizeHandle::ALL.into_iter().find(|handle| {
            let corner = handle.anchor_on(&screen);
            (position.x - corner.x).abs() <= reach && (position.y - corner.y).abs() <= reach
        })
    }

    fn start_drag(&mut self, position: Point, element_id: ElementId) -> PointerOutcome {
        let Some(element) = self.model.template().element(&element_id) else {
            return PointerOutcome::Ignored;
        };
        let start_position = element.position();
        debug!(element_id = %element_id, x = start_position.x, y = start_position.y, "Drag started");

        self.ghost = Some(GhostOverride {
            element_id: element_id.clone(),
            bounds: element.bounds(),
        });
        self.input_state = InputState::Dragging {
            element_id,
            start_position,
            anchor: position,
            capture: self.captures.acquire(GestureKind::Drag),
        };
        PointerOutcome::Started(GestureKind::Drag)
    }

    fn start_resize(&mut self, position: Point, handle: ResizeHandle) -> PointerOutcome {
        let Some(element) = self.model.selected_element() else {
            return PointerOutcome::Ignored;
        };
        let element_id = element.id.clone();
        let start_bounds = element.bounds();
        debug!(element_id = %element_id, ?handle, "Resize started");

        self.ghost = Some(GhostOverride {
            element_id: element_id.clone(),
            bounds: start_bounds,
        });
        self.input_state = InputState::Resizing {
            element_id,
            handle,
            start_bounds,
            anchor: position,
            capture: self.captures.acquire(GestureKind::Resize),
        };
        PointerOutcome::Started(GestureKind::Resize)
    }

    fn start_pan(&mut self, position: Point) -> PointerOutcome {
        let start_pan = self.view.pan;
        debug!(x = start_pan.x, y = start_pan.y, "Pan started");

        self.display_pan = Some(start_pan);
        self.input_state = InputState::Panning {
            start_pan,
            anchor: position,
            capture: self.captures.acquire(GestureKind::Pan),
        };
        PointerOutcome::Started(GestureKind::Pan)
    }
}

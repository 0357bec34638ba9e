//! Keyboard shortcuts: `V` select tool, `H` pan tool, `Delete`/`Backspace`
//! delete the selected element, `Escape` cancels a gesture or clears the
//! selection. Everything is suppressed while a text field has focus.

use super::{Key, ToolMode};
use crate::editor::EditorSession;
use tracing::debug;

impl EditorSession {
    /// Returns true when the key was handled.
    pub fn key_down(&mut self, key: Key) -> bool {
        if self.text_focus {
            return false;
        }

        match key {
            Key::Char('v' | 'V') => {
                self.set_tool_mode(ToolMode::Select);
                true
            }
            Key::Char('h' | 'H') => {
                self.set_tool_mode(ToolMode::Pan);
                true
            }
            Key::Delete | Key::Backspace => {
                let deleted = self.delete_selected();
                if deleted {
                    debug!("Deleted selection from keyboard");
                }
                deleted
            }
            Key::Escape => {
                if !self.input_state.is_idle() {
                    self.cancel_gesture();
                    true
                } else if self.model.selected_id().is_some() {
                    self.model.clear_selection();
                    true
                } else {
                    false
                }
            }
            Key::Char(_) | Key::Other => false,
        }
    }
}

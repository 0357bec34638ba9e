//! Editor session - everything one open designer canvas owns.
//!
//! The template model, the view (zoom/pan), the tool mode and the input
//! state machine all live here rather than in process-wide state, so several
//! sessions can coexist. Dropping a session tears down any active gesture
//! and releases its pointer capture.

use crate::frame::FrameQueue;
use crate::geometry::{Point, Size, Viewport};
use crate::input::{CaptureTracker, GhostOverride, InputState, ToolMode};
use crate::render::{RenderOptions, Scene, render_scene};
use crate::spatial_index::SpatialIndex;
use crate::template::TemplateModel;
use crate::types::{CertificateTemplate, ElementId, ElementPatch, ElementType, ImageRef};
use tracing::{debug, info};

pub struct EditorSession {
    pub(crate) model: TemplateModel,
    /// Committed view state
    pub(crate) view: Viewport,
    /// Live pan offset while a pan gesture runs
    pub(crate) display_pan: Option<Point>,
    pub(crate) tool_mode: ToolMode,
    pub(crate) input_state: InputState,
    pub(crate) ghost: Option<GhostOverride>,
    /// Latest pointer position not yet applied (screen space)
    pub(crate) pending_move: FrameQueue<Point>,
    pub(crate) spatial: SpatialIndex,
    pub(crate) captures: CaptureTracker,
    /// A text field outside the canvas has keyboard focus
    pub(crate) text_focus: bool,
    pub(crate) container: Option<Size>,
    pub(crate) render_options: RenderOptions,
}

impl EditorSession {
    pub fn new(template: CertificateTemplate) -> Self {
        Self::with_model(TemplateModel::new(template))
    }

    pub fn with_model(model: TemplateModel) -> Self {
        info!(
            elements = model.template().elements.len(),
            canvas_width = model.template().canvas_width,
            canvas_height = model.template().canvas_height,
            "Editor session opened"
        );
        let mut spatial = SpatialIndex::new();
        spatial.sync(&model.template().elements, model.revision());
        Self {
            model,
            view: Viewport::default(),
            display_pan: None,
            tool_mode: ToolMode::default(),
            input_state: InputState::default(),
            ghost: None,
            pending_move: FrameQueue::new(),
            spatial,
            captures: CaptureTracker::default(),
            text_focus: false,
            container: None,
            render_options: RenderOptions::editor(),
        }
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// End the session: cancel any active gesture and drop queued input.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if !self.input_state.is_idle() {
            self.cancel_gesture();
        }
        self.pending_move.clear();
        self.ghost = None;
        self.display_pan = None;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn model(&self) -> &TemplateModel {
        &self.model
    }

    pub fn template(&self) -> &CertificateTemplate {
        self.model.template()
    }

    pub fn input_state(&self) -> &InputState {
        &self.input_state
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.tool_mode
    }

    pub fn set_tool_mode(&mut self, mode: ToolMode) {
        if self.tool_mode != mode {
            debug!(?mode, "Tool mode changed");
            self.tool_mode = mode;
        }
    }

    pub fn ghost(&self) -> Option<&GhostOverride> {
        self.ghost.as_ref()
    }

    /// Committed zoom and pan.
    pub fn committed_view(&self) -> Viewport {
        self.view
    }

    /// Zoom and pan as currently displayed, including a live pan gesture.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.view.zoom, self.display_pan.unwrap_or(self.view.pan))
    }

    pub fn zoom(&self) -> f32 {
        self.view.zoom
    }

    /// Number of pointer captures still registered.
    pub fn active_captures(&self) -> usize {
        self.captures.active()
    }

    pub fn set_text_focus(&mut self, focused: bool) {
        self.text_focus = focused;
    }

    pub fn has_text_focus(&self) -> bool {
        self.text_focus
    }

    // ------------------------------------------------------------------
    // Model operations
    // ------------------------------------------------------------------

    /// Mutable model access for toolbar and property-panel edits.
    /// Refused while a gesture is active so the ghost cannot go stale.
    pub fn model_mut(&mut self) -> Option<&mut TemplateModel> {
        if self.input_state.is_idle() {
            Some(&mut self.model)
        } else {
            None
        }
    }

    pub fn add_element(&mut self, element_type: ElementType) -> Option<ElementId> {
        self.model_mut()
            .map(|model| model.add_element(element_type, ElementPatch::default()))
    }

    pub fn update_selected(&mut self, patch: &ElementPatch) -> bool {
        let Some(id) = self.model.selected_id().cloned() else {
            return false;
        };
        self.model_mut()
            .is_some_and(|model| model.update_element(&id, patch))
    }

    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let id = self.model.selected_id().cloned()?;
        self.model_mut()?.duplicate_element(&id)
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.model.selected_id().cloned() else {
            return false;
        };
        self.model_mut()
            .is_some_and(|model| model.delete_element(&id))
    }

    /// Bind (or clear) the background. With a natural size the canvas takes
    /// the image's dimensions and the view is refit.
    pub fn set_background(&mut self, reference: Option<ImageRef>, natural_size: Option<(u32, u32)>) -> bool {
        let Some(model) = self.model_mut() else {
            return false;
        };
        let mut changed = model.set_background(reference);
        if let Some((width, height)) = natural_size {
            changed |= model.set_canvas_size(width, height);
        }
        if changed && natural_size.is_some() {
            self.fit_to_view();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Keep the hit-test index in step with the model.
    pub(crate) fn sync_spatial(&mut self) {
        self.spatial
            .sync(&self.model.template().elements, self.model.revision());
    }

    /// Display list for the current frame.
    pub fn scene(&self) -> Scene {
        let options = RenderOptions {
            surface: self.container.or(self.render_options.surface),
            ..self.render_options.clone()
        };
        render_scene(
            self.model.template(),
            self.model.selected_id(),
            &self.viewport(),
            self.ghost.as_ref(),
            &options,
        )
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.teardown();
        debug!("Editor session closed");
    }
}

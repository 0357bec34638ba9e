//! Canvas view transformations - zoom steps, zoom around a point, fit to view.
//!
//! These only ever touch the session's view state. Zoom is always clamped to
//! `[MIN_ZOOM, MAX_ZOOM]` and rounded to four decimals so repeated steps do
//! not drift. All of them are ignored while a gesture is active.

use crate::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::editor::EditorSession;
use crate::geometry::{Point, Size};
use tracing::debug;

fn clamp_zoom(zoom: f32) -> f32 {
    ((zoom * 10_000.0).round() / 10_000.0).clamp(MIN_ZOOM, MAX_ZOOM)
}

impl EditorSession {
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.view.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.view.zoom - ZOOM_STEP)
    }

    /// Set the zoom, keeping the pan offset. Returns true if it changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !self.input_state.is_idle() || !zoom.is_finite() {
            return false;
        }
        let zoom = clamp_zoom(zoom);
        if zoom == self.view.zoom {
            return false;
        }
        debug!(zoom, "Zoom changed");
        self.view.zoom = zoom;
        true
    }

    /// Multiply the zoom by `factor`, keeping the canvas point under
    /// `screen_point` fixed on screen (wheel zoom).
    pub fn zoom_around(&mut self, factor: f32, screen_point: Point) -> bool {
        if !self.input_state.is_idle() || !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let zoom = clamp_zoom(self.view.zoom * factor);
        if zoom == self.view.zoom {
            return false;
        }
        let canvas_point = self.view.to_canvas(screen_point);
        self.view.zoom = zoom;
        self.view.pan = Point::new(
            screen_point.x - canvas_point.x * zoom,
            screen_point.y - canvas_point.y * zoom,
        );
        debug!(zoom, "Zoomed around point");
        true
    }

    /// Record the size of the element hosting the canvas.
    pub fn set_container_size(&mut self, size: Size) {
        if size.width > 0.0 && size.height > 0.0 {
            self.container = Some(size);
        }
    }

    pub fn container_size(&self) -> Option<Size> {
        self.container
    }

    /// Zoom so the whole canvas fits the container (never above 100%) and
    /// center it. No-op until a container size is known.
    pub fn fit_to_view(&mut self) -> bool {
        if !self.input_state.is_idle() {
            return false;
        }
        let Some(container) = self.container else {
            return false;
        };
        let template = self.model.template();
        let (width, height) = (template.canvas_width as f32, template.canvas_height as f32);

        let zoom = clamp_zoom(
            (container.width / width)
                .min(container.height / height)
                .min(1.0),
        );
        let pan = Point::new(
            (container.width - width * zoom) / 2.0,
            (container.height - height * zoom) / 2.0,
        );
        debug!(zoom, pan_x = pan.x, pan_y = pan.y, "Fit to view");

        let changed = self.view.zoom != zoom || self.view.pan != pan;
        self.view.zoom = zoom;
        self.view.pan = pan;
        changed
    }
}

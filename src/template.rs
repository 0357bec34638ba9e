//! Template model - the in-memory template of one editing session.
//!
//! The template is held behind an `Arc` and mutated copy-on-write: a snapshot
//! handed to the renderer or the export pipeline is never affected by later
//! edits. Every effective mutation bumps [`TemplateModel::revision`], which is
//! what the renderer watches to decide whether to repaint.
//!
//! Selection is a single optional element id kept beside the template, not
//! inside it; it is never persisted.

use crate::constants::{DEFAULT_ELEMENT_POSITION, DUPLICATE_OFFSET};
use crate::geometry::Point;
use crate::types::{
    CertificateElement, CertificateTemplate, ElementId, ElementPatch, ElementType, ImageRef,
    TemplateRecord,
};
use std::sync::Arc;
use tracing::debug;

/// Explicit z-order changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    /// One step towards the top
    Forward,
    /// One step towards the bottom
    Backward,
    ToFront,
    ToBack,
}

pub struct TemplateModel {
    template: Arc<CertificateTemplate>,
    selected: Option<ElementId>,
    revision: u64,
}

impl Default for TemplateModel {
    fn default() -> Self {
        Self::new(CertificateTemplate::default())
    }
}

impl TemplateModel {
    pub fn new(mut template: CertificateTemplate) -> Self {
        template.sanitize();
        Self {
            template: Arc::new(template),
            selected: None,
            revision: 0,
        }
    }

    /// Load from the external template record.
    pub fn from_record(record: TemplateRecord) -> Self {
        Self::new(record.into_template())
    }

    /// Save payload for the external persistence layer.
    pub fn to_record(&self, name: impl Into<String>) -> TemplateRecord {
        TemplateRecord::from_template(name, &self.template)
    }

    pub fn template(&self) -> &CertificateTemplate {
        &self.template
    }

    /// Read-only snapshot; later edits do not affect it.
    pub fn snapshot(&self) -> Arc<CertificateTemplate> {
        Arc::clone(&self.template)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn selected_element(&self) -> Option<&CertificateElement> {
        self.selected.as_ref().and_then(|id| self.template.element(id))
    }

    /// Select `id`, replacing any prior selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<&ElementId>) {
        self.selected = id.filter(|id| self.template.contains(id)).cloned();
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Apply a change through a writable template and advance the revision.
    /// Callers rule out no-ops beforehand, so a snapshot held elsewhere is
    /// only cloned when something actually changes.
    fn mutate<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CertificateTemplate),
    {
        f(Arc::make_mut(&mut self.template));
        self.revision += 1;
    }

    /// Append a new element with type defaults merged with `overrides`,
    /// and select it.
    pub fn add_element(&mut self, element_type: ElementType, overrides: ElementPatch) -> ElementId {
        let (x, y) = DEFAULT_ELEMENT_POSITION;
        let mut element = CertificateElement::new(element_type, Point::new(x, y));
        overrides.apply_to(&mut element);
        let id = element.id.clone();

        debug!(element_id = %id, ?element_type, "Adding element");
        self.mutate(|t| t.elements.push(element));
        self.selected = Some(id.clone());
        id
    }

    /// Apply a partial update. Returns false for unknown ids or no-op patches.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.template.index_of(id) else {
            return false;
        };
        let current = &self.template.elements[index];
        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        if &updated == current {
            return false;
        }

        self.mutate(|t| t.elements[index] = updated);
        true
    }

    /// Commit a position. Coordinates are clamped to be non-negative so the
    /// invariant holds even for callers that skip their own clamping.
    pub fn move_element(&mut self, id: &ElementId, x: f32, y: f32) -> bool {
        let target = Point::new(x, y).clamp_non_negative();
        let Some(index) = self.template.index_of(id) else {
            return false;
        };
        if self.template.elements[index].position() == target {
            return false;
        }

        self.mutate(|t| {
            let element = &mut t.elements[index];
            element.x = target.x;
            element.y = target.y;
        });
        true
    }

    /// Remove an element; clears the selection if it was selected.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        let Some(index) = self.template.index_of(id) else {
            return false;
        };
        self.mutate(|t| {
            t.elements.remove(index);
        });
        debug!(element_id = %id, "Deleted element");
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        true
    }

    /// Clone an element under a new id, offset by [`DUPLICATE_OFFSET`],
    /// insert it right after the source, and select it.
    pub fn duplicate_element(&mut self, id: &ElementId) -> Option<ElementId> {
        let index = self.template.index_of(id)?;
        let mut copy = self.template.elements[index].clone();
        copy.id = ElementId::generate();
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        let new_id = copy.id.clone();

        debug!(source = %id, element_id = %new_id, "Duplicated element");
        self.mutate(|t| t.elements.insert(index + 1, copy));
        self.selected = Some(new_id.clone());
        Some(new_id)
    }

    /// Move an element within the paint order.
    pub fn reorder_element(&mut self, id: &ElementId, reorder: Reorder) -> bool {
        let Some(index) = self.template.index_of(id) else {
            return false;
        };
        let last = self.template.elements.len() - 1;
        let target = match reorder {
            Reorder::Forward => (index + 1).min(last),
            Reorder::Backward => index.saturating_sub(1),
            Reorder::ToFront => last,
            Reorder::ToBack => 0,
        };
        if target == index {
            return false;
        }

        self.mutate(|t| {
            let element = t.elements.remove(index);
            t.elements.insert(target, element);
        });
        true
    }

    pub fn set_background(&mut self, reference: Option<ImageRef>) -> bool {
        if self.template.background_reference == reference {
            return false;
        }
        self.mutate(|t| t.background_reference = reference);
        true
    }

    /// Canvas dimensions are kept positive.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if (self.template.canvas_width, self.template.canvas_height) == (width, height) {
            return false;
        }
        self.mutate(|t| {
            t.canvas_width = width;
            t.canvas_height = height;
        });
        true
    }
}

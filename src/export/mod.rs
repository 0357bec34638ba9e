//! Export pipeline - one certificate for one participant.
//!
//! ## Steps
//!
//! 1. Resolve variable text (and QR payloads) against the participant record
//! 2. Load images; failures become warnings, never errors
//! 3. Compose the scene offscreen at `raster_scale ×` the canvas size
//! 4. Rasterize the composition
//! 5. Create a page of exactly `canvas_width × canvas_height`
//! 6. Place the raster as a full-page background
//! 7. Overlay every image-like element directly from its original pixels,
//!    contain-fit inside its box minus the overlay padding
//! 8. Add the invisible text layer and serialize
//!
//! Steps run strictly in order on a read-only template snapshot. The
//! offscreen composition is held by a guard that is released on success
//! and on every failure path.

mod error;
pub mod pdf;
pub mod qr;
pub mod resolve;

pub use error::ExportError;
pub use resolve::{ResolvedTemplate, resolve_content, resolve_variable, substitute_placeholders};

use crate::config::DesignerConfig;
use crate::constants::{MIN_RASTER_SCALE, OVERLAY_PADDING};
use crate::geometry::{Viewport, fit_contain};
use crate::images::ImageStore;
use crate::participant::{ParticipantRecord, ParticipantSource};
use crate::perf::{OperationStats, measure};
use crate::profile_scope;
use crate::render::text::LINE_HEIGHT;
use crate::render::{FontBook, ImageSet, RenderOptions, rasterize_scene, render_scene};
use crate::types::{CertificateTemplate, ElementId, ElementKind, ImageRef, Orientation, TextAlign};
use image::DynamicImage;
use parking_lot::Mutex;
use pdf::{PdfPage, TextRun};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Largest raster side the pipeline will allocate.
pub const MAX_RASTER_DIMENSION: u32 = 16_384;

/// Approximate ascent of a line box, as a fraction of the font size.
const BASELINE_RATIO: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Upscale factor of the background raster, at least 3
    pub raster_scale: u32,
    /// Inset of direct overlays inside their element box, canvas pixels
    pub overlay_padding: f32,
    /// Emit the invisible text layer
    pub searchable_text: bool,
    pub max_raster_dimension: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            raster_scale: MIN_RASTER_SCALE,
            overlay_padding: OVERLAY_PADDING,
            searchable_text: true,
            max_raster_dimension: MAX_RASTER_DIMENSION,
        }
    }
}

impl ExportOptions {
    pub fn from_config(config: &DesignerConfig) -> Self {
        Self {
            raster_scale: config.raster_scale.max(MIN_RASTER_SCALE),
            overlay_padding: config.overlay_padding.max(0.0),
            searchable_text: config.searchable_text,
            ..Self::default()
        }
    }

    /// Refuse rasters with a side above `max_raster_dimension`.
    pub fn check_raster_size(&self, width: u64, height: u64) -> Result<(), ExportError> {
        let max = self.max_raster_dimension;
        if width > max as u64 || height > max as u64 {
            return Err(ExportError::Raster { width, height, max });
        }
        Ok(())
    }
}

/// Non-fatal degradation of one element.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportWarning {
    /// The image could not be loaded; the element (or the background, for
    /// `element_id: None`) is missing from the document.
    ImageUnavailable {
        element_id: Option<ElementId>,
        reference: ImageRef,
        reason: String,
    },
    /// A QR payload could not be encoded.
    QrUnencodable { element_id: ElementId, reason: String },
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportWarning::ImageUnavailable {
                element_id: Some(id),
                reference,
                reason,
            } => write!(f, "image {reference} for element {id} unavailable: {reason}"),
            ExportWarning::ImageUnavailable {
                element_id: None,
                reference,
                reason,
            } => write!(f, "background {reference} unavailable: {reason}"),
            ExportWarning::QrUnencodable { element_id, reason } => {
                write!(f, "QR code for element {element_id} not encodable: {reason}")
            }
        }
    }
}

/// A finished certificate.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub page_width: u32,
    pub page_height: u32,
    pub orientation: Orientation,
    /// Direct image overlays placed above the background raster
    pub overlays: usize,
    pub warnings: Vec<ExportWarning>,
}

impl ExportedDocument {
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Offscreen composition held for the duration of one export.
struct Composition {
    live: Arc<AtomicUsize>,
}

impl Composition {
    fn open(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            live: Arc::clone(live),
        }
    }
}

impl Drop for Composition {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Images loaded for one export, keyed for both the raster and the overlays.
#[derive(Default)]
struct LoadedImages {
    set: ImageSet,
    /// Elements whose image came from a generated QR code
    generated: Vec<ElementId>,
}

pub struct ExportPipeline {
    store: Arc<dyn ImageStore>,
    fonts: Arc<FontBook>,
    options: ExportOptions,
    live: Arc<AtomicUsize>,
    timings: Mutex<HashMap<&'static str, OperationStats>>,
}

impl ExportPipeline {
    pub fn new(store: Arc<dyn ImageStore>, fonts: Arc<FontBook>, options: ExportOptions) -> Self {
        Self {
            store,
            fonts,
            options,
            live: Arc::new(AtomicUsize::new(0)),
            timings: Mutex::new(HashMap::new()),
        }
    }

    /// Timing statistics of one step (`resolve`, `rasterize`, `assemble`).
    pub fn step_stats(&self, step: &str) -> Option<OperationStats> {
        self.timings.lock().get(step).cloned()
    }

    fn record_step(&self, step: &'static str, elapsed_ms: f64) {
        debug!(step, elapsed_ms = format!("{:.2}", elapsed_ms), "Export step finished");
        self.timings.lock().entry(step).or_default().record(elapsed_ms);
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Offscreen compositions currently alive.
    pub fn live_compositions(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Export the certificate of the participant registered as `registration_id`.
    pub async fn export_for_registration(
        &self,
        template: Arc<CertificateTemplate>,
        registration_id: &str,
        participants: &dyn ParticipantSource,
    ) -> Result<ExportedDocument, ExportError> {
        let record = participants.participant(registration_id).await?;
        self.export(template, &record).await
    }

    pub async fn export(
        &self,
        template: Arc<CertificateTemplate>,
        participant: &ParticipantRecord,
    ) -> Result<ExportedDocument, ExportError> {
        profile_scope!("export");
        let scale = self.options.raster_scale.max(MIN_RASTER_SCALE);
        info!(
            elements = template.elements.len(),
            canvas_width = template.canvas_width,
            canvas_height = template.canvas_height,
            scale,
            "Export started"
        );

        // 1. Content resolution
        let (resolved, elapsed) = measure(|| resolve_content(&template, participant));
        self.record_step("resolve", elapsed);
        let template = &resolved.template;

        // 2. Images
        let mut warnings = Vec::new();
        let images = self.load_images(&resolved, &mut warnings).await;

        // 3-4. Offscreen composition and rasterization
        let composition = Composition::open(&self.live);
        let (raster, elapsed) = measure(|| self.rasterize(template, scale, &images.set));
        self.record_step("rasterize", elapsed);
        let raster = raster?;
        tokio::task::yield_now().await;

        // 5-6. Page and background layer
        let assemble_started = std::time::Instant::now();
        let (page_width, page_height) = (template.canvas_width, template.canvas_height);
        let mut page = PdfPage::new(page_width, page_height);
        page.draw_image(&raster, &template.canvas_rect(), true)?;
        drop(raster);
        drop(composition);

        // 7. Direct overlays, after the background
        let mut overlays = 0;
        for element in template.elements.iter().filter(|e| e.is_image_like()) {
            let Some(image) = images.set.element(&element.id) else {
                continue;
            };
            let inner = element.bounds().inset(self.options.overlay_padding);
            let fit = fit_contain(inner.width, inner.height, image.width() as f32, image.height() as f32);
            let placed = fit.within(&inner);
            if placed.width <= 0.0 || placed.height <= 0.0 {
                continue;
            }
            let crisp = images.generated.contains(&element.id);
            page.draw_image(image, &placed, !crisp)?;
            overlays += 1;
            debug!(element_id = %element.id, x = placed.x, y = placed.y, w = placed.width, h = placed.height, "Overlay placed");
        }

        // 8. Text layer and serialization
        if self.options.searchable_text {
            page.draw_invisible_text(&self.text_runs(template));
        }
        let bytes = page.finish()?;
        self.record_step("assemble", assemble_started.elapsed().as_secs_f64() * 1000.0);

        for warning in &warnings {
            warn!(%warning, "Export degraded");
        }
        info!(
            bytes = bytes.len(),
            overlays,
            warnings = warnings.len(),
            "Export finished"
        );

        Ok(ExportedDocument {
            bytes,
            page_width,
            page_height,
            orientation: template.orientation(),
            overlays,
            warnings,
        })
    }

    async fn load_images(&self, resolved: &ResolvedTemplate, warnings: &mut Vec<ExportWarning>) -> LoadedImages {
        profile_scope!("export_load_images");
        let template = &resolved.template;
        let mut loaded = LoadedImages::default();
        // Elements bound to the same reference share one load.
        let mut cache: HashMap<ImageRef, Option<Arc<DynamicImage>>> = HashMap::new();

        if let Some(reference) = &template.background_reference {
            match self.store.load_image(reference).await {
                Ok(image) => loaded.set.background = Some(Arc::new(image)),
                Err(e) => warnings.push(ExportWarning::ImageUnavailable {
                    element_id: None,
                    reference: reference.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        for element in &template.elements {
            if let ElementKind::QrCode { .. } = element.kind {
                if let Some(payload) = resolved.qr_payloads.get(&element.id) {
                    match qr::encode_qr(payload) {
                        Ok(code) => {
                            loaded
                                .set
                                .insert(element.id.clone(), Arc::new(DynamicImage::ImageLuma8(code)));
                            loaded.generated.push(element.id.clone());
                            continue;
                        }
                        Err(e) => warnings.push(ExportWarning::QrUnencodable {
                            element_id: element.id.clone(),
                            reason: e.to_string(),
                        }),
                    }
                }
            }

            let Some(reference) = element.image_reference() else {
                continue;
            };
            if !cache.contains_key(reference) {
                let image = match self.store.load_image(reference).await {
                    Ok(image) => Some(Arc::new(image)),
                    Err(e) => {
                        warnings.push(ExportWarning::ImageUnavailable {
                            element_id: Some(element.id.clone()),
                            reference: reference.clone(),
                            reason: e.to_string(),
                        });
                        None
                    }
                };
                cache.insert(reference.clone(), image);
            }
            if let Some(Some(image)) = cache.get(reference) {
                loaded.set.insert(element.id.clone(), Arc::clone(image));
            }
        }
        loaded
    }

    fn rasterize(&self, template: &CertificateTemplate, scale: u32, images: &ImageSet) -> Result<DynamicImage, ExportError> {
        profile_scope!("export_rasterize");
        let width = template.canvas_width as u64 * scale as u64;
        let height = template.canvas_height as u64 * scale as u64;
        self.options.check_raster_size(width, height)?;

        let options = RenderOptions {
            image_padding: self.options.overlay_padding,
            ..RenderOptions::export()
        };
        let scene = render_scene(template, None, &Viewport::scaled(scale as f32), None, &options);
        let raster = rasterize_scene(&scene, images, &self.fonts);
        debug!(width = raster.width(), height = raster.height(), "Composition rasterized");
        Ok(DynamicImage::ImageRgba8(raster))
    }

    /// Invisible text runs laid out like the raster text, in canvas units.
    fn text_runs(&self, template: &CertificateTemplate) -> Vec<TextRun> {
        let mut runs = Vec::new();
        for element in &template.elements {
            let (text, style) = match &element.kind {
                ElementKind::StaticText { content, style }
                | ElementKind::VariableText { content, style, .. } => (content, style),
                _ => continue,
            };
            let rect = element.bounds();
            let layout = self
                .fonts
                .layout(text, style.font_family, style.font_size, rect.width);
            let line_height = style.font_size * LINE_HEIGHT;
            let mut top = rect.y + (rect.height - layout.height()) / 2.0;
            for line in &layout.lines {
                let x = match style.text_align {
                    TextAlign::Left => rect.x,
                    TextAlign::Center => rect.x + (rect.width - line.width) / 2.0,
                    TextAlign::Right => rect.right() - line.width,
                };
                let glyph_top = top + (line_height - style.font_size) / 2.0;
                runs.push(TextRun {
                    text: line.text.clone(),
                    x,
                    baseline: glyph_top + style.font_size * BASELINE_RATIO,
                    font_size: style.font_size,
                });
                top += line_height;
            }
        }
        runs
    }
}

//! # certdesigner CLI
//!
//! ## Usage
//!
//! ```bash
//! # Export one participant's certificate
//! certdesigner export --template award.json --participant ada.json --out ada.pdf
//!
//! # Images referenced by path live under a directory
//! certdesigner export --template award.json --participant ada.json --images assets/ --out ada.pdf
//!
//! # Render the editor view of a template to PNG
//! certdesigner preview --template award.json --out preview.png --zoom 0.5
//! ```

use anyhow::{Context, Result, bail};
use certdesigner::config::DesignerConfig;
use certdesigner::constants::MIN_RASTER_SCALE;
use certdesigner::editor::EditorSession;
use certdesigner::export::{ExportOptions, ExportPipeline};
use certdesigner::images::{FsImageStore, ImageStore};
use certdesigner::logging;
use certdesigner::participant::ParticipantRecord;
use certdesigner::perf::measure_and_log;
use certdesigner::render::{FontBook, ImageSet, RenderOptions, rasterize_scene};
use certdesigner::types::{CertificateTemplate, TemplateRecord};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Certificate template designer
#[derive(Parser, Debug)]
#[command(name = "certdesigner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/certdesigner/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a certificate PDF for one participant
    Export {
        /// Template record (JSON)
        #[arg(long, value_name = "FILE")]
        template: PathBuf,

        /// Participant record (flat JSON object)
        #[arg(long, value_name = "FILE")]
        participant: PathBuf,

        /// Root directory of referenced images
        #[arg(long, value_name = "DIR")]
        images: Option<PathBuf>,

        /// Output PDF
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Background raster upscale factor (minimum 3)
        #[arg(long)]
        scale: Option<u32>,
    },
    /// Render the editor view of a template to PNG
    Preview {
        #[arg(long, value_name = "FILE")]
        template: PathBuf,

        #[arg(long, value_name = "DIR")]
        images: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        #[arg(long, default_value = "1.0")]
        zoom: f32,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DesignerConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DesignerConfig::load().context("loading config")?,
    };
    logging::init(config.log_filter.as_deref());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    match cli.command {
        Commands::Export {
            template,
            participant,
            images,
            out,
            scale,
        } => runtime.block_on(export(&config, &template, &participant, images, &out, scale)),
        Commands::Preview {
            template,
            images,
            out,
            zoom,
        } => runtime.block_on(preview(&config, &template, images, &out, zoom)),
    }
}

fn load_template(path: &Path) -> Result<CertificateTemplate> {
    let record = TemplateRecord::load(path).with_context(|| format!("loading template {}", path.display()))?;
    info!(name = %record.name, "Template loaded");
    Ok(record.into_template())
}

/// `--images`, then the configured root, then the template's directory.
fn image_store(config: &DesignerConfig, images: Option<PathBuf>, template: &Path) -> FsImageStore {
    let root = images
        .or_else(|| config.image_root.clone())
        .or_else(|| template.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    FsImageStore::new(root)
}

fn font_book(config: &DesignerConfig) -> FontBook {
    match &config.font_dir {
        Some(dir) => FontBook::load_dir(dir),
        None => FontBook::builtin(),
    }
}

async fn export(
    config: &DesignerConfig,
    template_path: &Path,
    participant_path: &Path,
    images: Option<PathBuf>,
    out: &Path,
    scale: Option<u32>,
) -> Result<()> {
    let template = load_template(template_path)?;
    let participant = ParticipantRecord::load(participant_path)
        .with_context(|| format!("loading participant {}", participant_path.display()))?;

    let mut options = ExportOptions::from_config(config);
    if let Some(scale) = scale {
        options.raster_scale = scale.max(MIN_RASTER_SCALE);
    }
    let pipeline = ExportPipeline::new(
        Arc::new(image_store(config, images, template_path)),
        Arc::new(font_book(config)),
        options,
    );

    let document = pipeline.export(Arc::new(template), &participant).await?;
    for warning in &document.warnings {
        eprintln!("warning: {}", warning);
    }
    tokio::fs::write(out, &document.bytes)
        .await
        .with_context(|| format!("writing {}", out.display()))?;
    println!(
        "Wrote {} ({}x{} {:?}, {} bytes)",
        out.display(),
        document.page_width,
        document.page_height,
        document.orientation,
        document.bytes.len()
    );
    Ok(())
}

async fn preview(config: &DesignerConfig, template_path: &Path, images: Option<PathBuf>, out: &Path, zoom: f32) -> Result<()> {
    if !(zoom.is_finite() && zoom > 0.0) {
        bail!("zoom must be a positive number");
    }
    let template = load_template(template_path)?;
    let store = image_store(config, images, template_path);

    let mut set = ImageSet::default();
    if let Some(reference) = &template.background_reference {
        match store.load_image(reference).await {
            Ok(image) => set.background = Some(Arc::new(image)),
            Err(e) => warn!(%reference, error = %e, "Background unavailable"),
        }
    }
    for element in &template.elements {
        let Some(reference) = element.image_reference() else {
            continue;
        };
        match store.load_image(reference).await {
            Ok(image) => set.insert(element.id.clone(), Arc::new(image)),
            Err(e) => warn!(element_id = %element.id, %reference, error = %e, "Image unavailable"),
        }
    }

    let options = RenderOptions::editor().with_grid(config.grid.enabled, config.grid.spacing);
    let mut session = EditorSession::new(template).with_render_options(options);
    session.set_zoom(zoom);
    if session.zoom() != zoom {
        warn!(requested = zoom, effective = session.zoom(), "Zoom clamped");
    }
    let scene = session.scene();
    let (width, height) = (scene.size.width.ceil() as u64, scene.size.height.ceil() as u64);
    ExportOptions::from_config(config)
        .check_raster_size(width, height)
        .context("preview too large")?;
    let fonts = font_book(config);
    let raster = measure_and_log("preview_rasterize", 250.0, || rasterize_scene(&scene, &set, &fonts));
    raster
        .save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote {} ({}x{})", out.display(), raster.width(), raster.height());
    Ok(())
}

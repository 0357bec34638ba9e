//! Designer configuration.
//!
//! Read from `<config_dir>/certdesigner/config.json`. Every field has a
//! default, so an empty object (or no file at all) is a valid config.

use crate::constants::{DEFAULT_GRID_SPACING, MIN_RASTER_SCALE, OVERLAY_PADDING};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_DIR: &str = "certdesigner";
const CONFIG_FILE: &str = "config.json";

/// Smallest grid spacing worth painting
const MIN_GRID_SPACING: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub enabled: bool,
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spacing: DEFAULT_GRID_SPACING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerConfig {
    /// Upscale factor of the export background raster
    pub raster_scale: u32,
    /// Inset of direct image overlays inside their element box
    pub overlay_padding: f32,
    /// Emit the invisible PDF text layer
    pub searchable_text: bool,
    pub grid: GridConfig,
    /// Directory of TrueType faces named after the font families
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_dir: Option<PathBuf>,
    /// Root of the filesystem image store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            raster_scale: MIN_RASTER_SCALE,
            overlay_padding: OVERLAY_PADDING,
            searchable_text: true,
            grid: GridConfig::default(),
            font_dir: None,
            image_root: None,
            log_filter: None,
        }
    }
}

impl DesignerConfig {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp out-of-range values to usable ones.
    pub fn sanitized(mut self) -> Self {
        if self.raster_scale < MIN_RASTER_SCALE {
            warn!(raster_scale = self.raster_scale, "Raster scale below minimum, clamping");
            self.raster_scale = MIN_RASTER_SCALE;
        }
        if !self.overlay_padding.is_finite() || self.overlay_padding < 0.0 {
            self.overlay_padding = OVERLAY_PADDING;
        }
        if !self.grid.spacing.is_finite() || self.grid.spacing < MIN_GRID_SPACING {
            self.grid.spacing = DEFAULT_GRID_SPACING;
        }
        self
    }
}

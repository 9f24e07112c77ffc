use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::downsample::DownsampleConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CHART_VIEWER_CONFIG";
/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "chart_viewer.json";

const MAX_SLOTS: usize = 4;

// ---------------------------------------------------------------------------
// Line style descriptor
// ---------------------------------------------------------------------------

/// How the lines of one dataset are stroked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyleConfig {
    pub width: f32,
    /// Dash length; `None` draws a solid line.
    pub dash_length: Option<f32>,
    /// Overrides the per-series colour when set.
    pub color: Option<[u8; 3]>,
}

impl Default for LineStyleConfig {
    fn default() -> Self {
        Self {
            width: 1.5,
            dash_length: None,
            color: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub downsample: DownsampleConfig,
    /// Number of "Load File" slots.
    pub slots: usize,
    pub window_size: [f32; 2],
    /// Style per dataset slot, by index.
    pub dataset_styles: Vec<LineStyleConfig>,
    /// Style for slots past the end of `dataset_styles`.
    pub fallback_style: LineStyleConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            downsample: DownsampleConfig::default(),
            slots: 2,
            window_size: [1000.0, 800.0],
            dataset_styles: vec![
                LineStyleConfig::default(),
                LineStyleConfig {
                    width: 2.0,
                    dash_length: Some(20.0),
                    color: None,
                },
            ],
            fallback_style: LineStyleConfig {
                width: 1.5,
                dash_length: None,
                color: Some([160, 160, 160]),
            },
        }
    }
}

impl ViewerConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ViewerConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config from `$CHART_VIEWER_CONFIG` or `./chart_viewer.json`; defaults
    /// when neither is usable.
    pub fn discover() -> Self {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.exists() {
                    return Self::default();
                }
                local
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ds = &self.downsample;
        if ds.min_points == 0 {
            bail!("downsample.min_points must be at least 1");
        }
        if ds.max_points < ds.min_points {
            bail!(
                "downsample.max_points ({}) is below min_points ({})",
                ds.max_points,
                ds.min_points
            );
        }
        if self.slots == 0 {
            bail!("slots must be at least 1");
        }
        Ok(())
    }

    /// Slot count clamped to what the UI can lay out.
    pub fn slot_count(&self) -> usize {
        self.slots.clamp(1, MAX_SLOTS)
    }

    /// Style for the dataset in slot `index`.
    pub fn style_for(&self, index: usize) -> &LineStyleConfig {
        self.dataset_styles
            .get(index)
            .unwrap_or(&self.fallback_style)
    }
}

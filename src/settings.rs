//! Persisted settings and tunables
//!
//! The feature flag is the only piece of state the engine persists. It is
//! read on every hover-enter so the settings UI can toggle previews live
//! without re-initializing discovery.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::constants::{layout, scan, settings, timing, validation};

/// Source of the "preview enabled" boolean
pub trait FeatureFlag {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// In-memory flag for tests and embedders with their own storage
#[derive(Debug, Clone)]
pub struct MemoryFlag {
    enabled: bool,
}

impl MemoryFlag {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for MemoryFlag {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl FeatureFlag for MemoryFlag {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

fn default_enabled() -> bool {
    true
}

/// On-disk shape of the settings file
#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    /// Enabled unless explicitly disabled
    #[serde(default = "default_enabled")]
    image_preview_enabled: bool,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self { image_preview_enabled: default_enabled() }
    }
}

/// JSON-file-backed feature flag, persisted under the platform config dir
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    enabled: bool,
}

impl FileSettings {
    fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(settings::APP_DIR);
        path.push(settings::FILENAME);
        path
    }

    /// Load from the default location
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load from an explicit path. A missing or unparsable file falls back
    /// to defaults with a logged warning; the file is not overwritten until
    /// the next `set_enabled`.
    pub fn load_from(path: PathBuf) -> Self {
        let file = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<SettingsFile>(&contents) {
                Ok(file) => file,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse settings file, using defaults");
                    SettingsFile::default()
                }
            },
            Err(_) => SettingsFile::default(),
        };
        info!(path = %path.display(), enabled = file.image_preview_enabled, "Loaded preview settings");
        Self { path, enabled: file.image_preview_enabled }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create settings directory: {}", parent.display()))?;
        }
        let file = SettingsFile { image_preview_enabled: self.enabled };
        let contents = serde_json::to_string_pretty(&file)
            .context("Failed to serialize settings")?;
        fs::write(&self.path, contents)
            .context(format!("Failed to write settings file to {}", self.path.display()))?;
        Ok(())
    }
}

impl FeatureFlag for FileSettings {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if let Err(e) = self.save() {
            error!(error = ?e, "Failed to persist feature flag");
        }
    }
}

fn default_spacing() -> f64 {
    layout::SPACING
}

fn default_right_margin() -> f64 {
    layout::RIGHT_MARGIN
}

fn default_top_margin() -> f64 {
    layout::TOP_MARGIN
}

fn default_bottom_margin() -> f64 {
    layout::BOTTOM_MARGIN
}

fn default_height_ratio() -> f64 {
    layout::HEIGHT_RATIO
}

fn default_quick_hide_ms() -> u64 {
    timing::QUICK_HIDE_MS
}

fn default_slow_hide_ms() -> u64 {
    timing::SLOW_HIDE_MS
}

fn default_fade_ms() -> u64 {
    timing::FADE_MS
}

fn default_retry_interval_ms() -> u64 {
    scan::RETRY_INTERVAL_MS
}

fn default_max_scan_retries() -> u32 {
    scan::MAX_RETRIES
}

/// UX constants of the engine, overridable by embedders.
///
/// The quick/slow hide pairing is deliberate: thumbnail-leave and
/// overlay-leave expect the pointer to arrive in the other hover zone and
/// use the quick delay, while dismiss requests use the slow one. Keep the
/// asymmetry when tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewTunables {
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    #[serde(default = "default_right_margin")]
    pub right_margin: f64,
    #[serde(default = "default_top_margin")]
    pub top_margin: f64,
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin: f64,
    /// Fraction of the viewport height available to the overlay (0, 1]
    #[serde(default = "default_height_ratio")]
    pub height_ratio: f64,
    #[serde(default = "default_quick_hide_ms")]
    pub quick_hide_ms: u64,
    #[serde(default = "default_slow_hide_ms")]
    pub slow_hide_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    #[serde(default = "default_max_scan_retries")]
    pub max_scan_retries: u32,
}

impl Default for PreviewTunables {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            right_margin: default_right_margin(),
            top_margin: default_top_margin(),
            bottom_margin: default_bottom_margin(),
            height_ratio: default_height_ratio(),
            quick_hide_ms: default_quick_hide_ms(),
            slow_hide_ms: default_slow_hide_ms(),
            fade_ms: default_fade_ms(),
            retry_interval_ms: default_retry_interval_ms(),
            max_scan_retries: default_max_scan_retries(),
        }
    }
}

impl PreviewTunables {
    pub fn quick_hide(&self) -> Duration {
        Duration::from_millis(self.quick_hide_ms)
    }

    pub fn slow_hide(&self) -> Duration {
        Duration::from_millis(self.slow_hide_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Clamp all values to safe ranges, warning on anything corrected
    pub fn validate_and_clamp(&mut self) {
        for (name, value) in [
            ("spacing", &mut self.spacing),
            ("right_margin", &mut self.right_margin),
            ("top_margin", &mut self.top_margin),
            ("bottom_margin", &mut self.bottom_margin),
        ] {
            if !value.is_finite() || *value < 0.0 {
                warn!(field = name, value = *value, "Margin invalid, resetting to 0");
                *value = 0.0;
            } else if *value > validation::MAX_MARGIN {
                warn!(field = name, value = *value, max = validation::MAX_MARGIN, "Margin exceeds maximum, clamping");
                *value = validation::MAX_MARGIN;
            }
        }

        if !self.height_ratio.is_finite() || self.height_ratio <= 0.0 || self.height_ratio > 1.0 {
            warn!(height_ratio = self.height_ratio, using = default_height_ratio(), "height_ratio outside (0, 1], using default");
            self.height_ratio = default_height_ratio();
        }

        for (name, value) in [
            ("quick_hide_ms", &mut self.quick_hide_ms),
            ("slow_hide_ms", &mut self.slow_hide_ms),
            ("fade_ms", &mut self.fade_ms),
            ("retry_interval_ms", &mut self.retry_interval_ms),
        ] {
            if *value > validation::MAX_DELAY_MS {
                warn!(field = name, value = *value, max = validation::MAX_DELAY_MS, "Delay exceeds maximum, clamping");
                *value = validation::MAX_DELAY_MS;
            }
        }

        if self.max_scan_retries > validation::MAX_SCAN_RETRIES {
            warn!(max_scan_retries = self.max_scan_retries, max = validation::MAX_SCAN_RETRIES, "Retry bound exceeds maximum, clamping");
            self.max_scan_retries = validation::MAX_SCAN_RETRIES;
        }
    }
}

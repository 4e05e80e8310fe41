#![forbid(unsafe_code)]

//! Editor tuning as data.
//!
//! [`EditorConfig`] collects every pixel threshold and step the canvas
//! editor uses. Defaults reproduce the built-in behavior; hosts may override
//! them from the environment or, with the `config-file` feature, from TOML
//! or JSON.
//!
//! ```toml
//! # vellum.toml
//! snap_threshold_px = 6
//! drag_threshold_px = 4
//! snapping_enabled = true
//! ```
//!
//! ```rust,ignore
//! let config = EditorConfig::from_toml_file("vellum.toml")?.validated();
//! ```
//!
//! # Environment
//!
//! | Variable | Effect |
//! |---|---|
//! | `VELLUM_SNAP_THRESHOLD_PX` | snap window in pixels |
//! | `VELLUM_DRAG_THRESHOLD_PX` | drag start threshold in pixels |
//! | `VELLUM_DISABLE_SNAP` | `1`/`true`/`yes` turns snapping off |

#[cfg(feature = "config-file")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::interaction::DEFAULT_DRAG_THRESHOLD_PX;
use crate::snap::DEFAULT_SNAP_THRESHOLD_PX;

pub const ENV_SNAP_THRESHOLD: &str = "VELLUM_SNAP_THRESHOLD_PX";
pub const ENV_DRAG_THRESHOLD: &str = "VELLUM_DRAG_THRESHOLD_PX";
pub const ENV_DISABLE_SNAP: &str = "VELLUM_DISABLE_SNAP";

/// Tunable editor parameters. All lengths are pixels unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snap window around alignment lines.
    pub snap_threshold_px: f64,
    /// Pointer travel (per axis) before a press becomes a drag or resize.
    pub drag_threshold_px: f64,
    /// Smallest width or height a block can be resized to.
    pub min_block_size_px: f64,
    /// Smallest section height the resize handle reports.
    pub min_section_height_px: f64,
    /// Keyboard nudge step.
    pub nudge_step_px: f64,
    /// Keyboard nudge step with shift held.
    pub nudge_large_step_px: f64,
    pub snapping_enabled: bool,
    /// Offset of a duplicated block, in percent of the section.
    pub duplicate_offset_pct: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold_px: DEFAULT_SNAP_THRESHOLD_PX,
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            min_block_size_px: 10.0,
            min_section_height_px: 40.0,
            nudge_step_px: 1.0,
            nudge_large_step_px: 10.0,
            snapping_enabled: true,
            duplicate_offset_pct: 2.0,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn sanitize(value: f64, fallback: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.max(min)
    } else {
        fallback
    }
}

impl EditorConfig {
    /// Defaults overridden by `VELLUM_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a caller-supplied variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(val) = lookup(ENV_SNAP_THRESHOLD)
            && let Ok(px) = val.trim().parse::<f64>()
        {
            config.snap_threshold_px = px;
        }
        if let Some(val) = lookup(ENV_DRAG_THRESHOLD)
            && let Ok(px) = val.trim().parse::<f64>()
        {
            config.drag_threshold_px = px;
        }
        if let Some(val) = lookup(ENV_DISABLE_SNAP) {
            config.snapping_enabled = !parse_flag(&val);
        }
        config.validated()
    }

    /// Clamp every field into its usable range.
    ///
    /// Non-finite values fall back to the default for that field.
    #[must_use]
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let nudge_step_px = sanitize(self.nudge_step_px, defaults.nudge_step_px, 0.0);
        Self {
            snap_threshold_px: sanitize(self.snap_threshold_px, defaults.snap_threshold_px, 0.0),
            drag_threshold_px: sanitize(self.drag_threshold_px, defaults.drag_threshold_px, 0.0),
            min_block_size_px: sanitize(self.min_block_size_px, defaults.min_block_size_px, 1.0),
            min_section_height_px: sanitize(
                self.min_section_height_px,
                defaults.min_section_height_px,
                1.0,
            ),
            nudge_step_px,
            nudge_large_step_px: sanitize(
                self.nudge_large_step_px,
                defaults.nudge_large_step_px,
                nudge_step_px,
            ),
            snapping_enabled: self.snapping_enabled,
            duplicate_offset_pct: sanitize(self.duplicate_offset_pct, defaults.duplicate_offset_pct, 0.0)
                .min(100.0),
        }
    }

    /// List out-of-range fields. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let non_negative = [
            ("snap_threshold_px", self.snap_threshold_px),
            ("drag_threshold_px", self.drag_threshold_px),
            ("nudge_step_px", self.nudge_step_px),
            ("nudge_large_step_px", self.nudge_large_step_px),
            ("duplicate_offset_pct", self.duplicate_offset_pct),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        let positive = [
            ("min_block_size_px", self.min_block_size_px),
            ("min_section_height_px", self.min_section_height_px),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} must be finite and > 0, got {value}"));
            }
        }
        if self.duplicate_offset_pct > 100.0 {
            errors.push(format!(
                "duplicate_offset_pct must be <= 100, got {}",
                self.duplicate_offset_pct
            ));
        }
        if self.nudge_large_step_px < self.nudge_step_px {
            errors.push(format!(
                "nudge_large_step_px ({}) must be >= nudge_step_px ({})",
                self.nudge_large_step_px, self.nudge_step_px
            ));
        }
        errors
    }

    /// Snap window actually applied, `None` when snapping is off.
    #[must_use]
    pub fn effective_snap_threshold(&self) -> Option<f64> {
        self.snapping_enabled.then_some(self.snap_threshold_px)
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(ConfigError::Toml)?
            .checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(ConfigError::Json)?
            .checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

/// Errors that can occur when loading an editor configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

//! Configuration file loading with precedence handling.

use crate::model::{ConstantsError, LayoutConstants, LayoutSpec};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Env var naming an explicit config file.
pub const ENV_CONFIG: &str = "STICKYLANE_CONFIG";
/// Env var overriding the hysteresis half-width.
pub const ENV_HYSTERESIS: &str = "STICKYLANE_HYSTERESIS_PX";
/// Env var overriding the log file path.
pub const ENV_LOG: &str = "STICKYLANE_LOG";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// Unit system the layout defaults are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Device pixels, matching the mobile design system.
    Pixels,
    /// Terminal cell rows.
    Rows,
}

impl Preset {
    /// Base layout spec for this unit system.
    pub fn spec(self) -> LayoutSpec {
        match self {
            Preset::Pixels => LayoutSpec::pixels(),
            Preset::Rows => LayoutSpec::terminal_rows(),
        }
    }
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, the preset defaults are used.
/// Corresponds to `~/.config/stickylane/config.toml`.
///
/// ```toml
/// preset = "rows"
/// log_file_path = "/tmp/stickylane.log"
///
/// [layout]
/// hysteresis = 2.0
/// snap_enabled = false
///
/// [timing]
/// idle_snap_ms = 200
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Unit system for the layout defaults.
    #[serde(default)]
    pub preset: Option<Preset>,

    /// Category selected on startup.
    #[serde(default)]
    pub category: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Layout overrides.
    #[serde(default)]
    pub layout: Option<LayoutSection>,

    /// Timer overrides.
    #[serde(default)]
    pub timing: Option<TimingSection>,
}

/// `[layout]` table. Sizes are in preset units.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LayoutSection {
    /// Safe-area inset above the search bar.
    pub safe_area_top: Option<f64>,
    /// Search bar height.
    pub search_bar: Option<f64>,
    /// Gap under the top bar.
    pub gap: Option<f64>,
    /// Action bar height.
    pub action_bar: Option<f64>,
    /// Category rail height.
    pub category_rail: Option<f64>,
    /// Gap between rail and embedded action bar.
    pub rail_action_gap: Option<f64>,
    /// Extra grid padding while sticky.
    pub overlay_inset: Option<f64>,
    /// Hysteresis half-width.
    pub hysteresis: Option<f64>,
    /// Reveal offset.
    pub reveal_offset: Option<f64>,
    /// Backdrop fade strip height.
    pub fade: Option<f64>,
    /// Idle-snap zone.
    pub snap_zone: Option<f64>,
    /// Plausibility ceiling for reports.
    pub max_plausible: Option<f64>,
    /// Whether idle-snap is enabled.
    pub snap_enabled: Option<bool>,
    /// Fallback estimate for the top bar.
    pub estimated_top_bar: Option<f64>,
    /// Fallback estimate for the action bar.
    pub estimated_action_bar: Option<f64>,
    /// Fallback estimate for the scroll header.
    pub estimated_scroll_header: Option<f64>,
}

/// `[timing]` table. All values in milliseconds.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TimingSection {
    /// Short measurement fallback.
    pub short_fallback_ms: Option<u64>,
    /// Long measurement fallback.
    pub long_fallback_ms: Option<u64>,
    /// Idle-snap delay.
    pub idle_snap_ms: Option<u64>,
    /// Scroll frame interval (0 disables throttling).
    pub frame_interval_ms: Option<u64>,
    /// Action bar cross-fade (0 disables).
    pub fade_ms: Option<u64>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args. Layout
/// values stay as overrides until [`ResolvedConfig::layout_spec`] applies them
/// to a preset, because the preset default depends on the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedConfig {
    /// Explicit preset, if any.
    pub preset: Option<Preset>,
    /// Category selected on startup.
    pub category: Option<String>,
    /// Layout overrides.
    pub layout: LayoutSection,
    /// Timer overrides.
    pub timing: TimingSection,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl ResolvedConfig {
    /// Layout spec: `fallback` preset (unless one was configured) with all
    /// overrides applied.
    ///
    /// Estimates are re-derived from the overridden design constants, then
    /// explicit estimate overrides win.
    pub fn layout_spec(&self, fallback: Preset) -> LayoutSpec {
        let mut spec = self.preset.unwrap_or(fallback).spec();
        let layout = &self.layout;

        let sizes = [
            (&mut spec.safe_area_top_px, layout.safe_area_top),
            (&mut spec.search_bar_px, layout.search_bar),
            (&mut spec.gap_px, layout.gap),
            (&mut spec.action_bar_px, layout.action_bar),
            (&mut spec.category_rail_px, layout.category_rail),
            (&mut spec.rail_action_gap_px, layout.rail_action_gap),
            (&mut spec.overlay_inset_px, layout.overlay_inset),
            (&mut spec.hysteresis_px, layout.hysteresis),
            (&mut spec.reveal_offset_px, layout.reveal_offset),
            (&mut spec.fade_px, layout.fade),
            (&mut spec.snap_zone_px, layout.snap_zone),
            (&mut spec.max_plausible_px, layout.max_plausible),
        ];
        for (slot, value) in sizes {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(enabled) = layout.snap_enabled {
            spec.snap_enabled = enabled;
        }

        let mut spec = spec.with_derived_estimates();
        if let Some(top) = layout.estimated_top_bar {
            spec.estimates.top_bar_px = top;
        }
        if let Some(action) = layout.estimated_action_bar {
            spec.estimates.action_bar_px = action;
        }
        if let Some(header) = layout.estimated_scroll_header {
            spec.estimates.scroll_header_px = header;
        }

        let timing = &self.timing;
        let delays = [
            (&mut spec.timing.short_fallback, timing.short_fallback_ms),
            (&mut spec.timing.long_fallback, timing.long_fallback_ms),
            (&mut spec.timing.idle_snap_delay, timing.idle_snap_ms),
            (&mut spec.timing.frame_interval, timing.frame_interval_ms),
            (&mut spec.timing.fade_duration, timing.fade_ms),
        ];
        for (slot, value) in delays {
            if let Some(ms) = value {
                *slot = Duration::from_millis(ms);
            }
        }

        spec
    }

    /// Validated constants for [`Self::layout_spec`].
    ///
    /// # Errors
    ///
    /// Returns `ConstantsError` when the overrides produce an invalid layout.
    pub fn constants(&self, fallback: Preset) -> Result<LayoutConstants, ConstantsError> {
        LayoutConstants::new(self.layout_spec(fallback))
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/stickylane/stickylane.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("stickylane").join("stickylane.log")
    } else {
        PathBuf::from("stickylane.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/stickylane/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stickylane").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `STICKYLANE_CONFIG` environment variable
/// 3. Default path `~/.config/stickylane/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let Some(config) = config_file else {
        return ResolvedConfig {
            log_file_path: default_log_path(),
            ..ResolvedConfig::default()
        };
    };

    ResolvedConfig {
        preset: config.preset,
        category: config.category,
        layout: config.layout.unwrap_or_default(),
        timing: config.timing.unwrap_or_default(),
        log_file_path: config.log_file_path.unwrap_or_else(default_log_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `STICKYLANE_HYSTERESIS_PX`: Override hysteresis (ignored with a warning if unparseable)
/// - `STICKYLANE_LOG`: Override log file path
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(ENV_HYSTERESIS) {
        match raw.trim().parse::<f64>() {
            Ok(value) => config.layout.hysteresis = Some(value),
            Err(e) => warn!(var = ENV_HYSTERESIS, value = %raw, error = %e, "Ignoring env override"),
        }
    }

    if let Ok(path) = std::env::var(ENV_LOG) {
        config.log_file_path = PathBuf::from(path);
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    hysteresis_override: Option<f64>,
    no_snap: bool,
    category_override: Option<String>,
) -> ResolvedConfig {
    if let Some(hysteresis) = hysteresis_override {
        config.layout.hysteresis = Some(hysteresis);
    }

    if no_snap {
        config.layout.snap_enabled = Some(false);
    }

    if let Some(category) = category_override {
        config.category = Some(category);
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

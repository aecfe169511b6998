//! Header styling configuration.
//!
//! Terminal cells have no alpha channel, so instance opacity maps onto three
//! steps: hidden, dimmed and normal.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== HeaderStyles =====

/// Below this opacity an instance is drawn dimmed.
pub const DIM_BELOW_OPACITY: f64 = 0.5;

/// Styles for the header, grid and overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderStyles {
    /// Search bar block.
    pub top_bar: Style,
    /// Hairline under the top bar.
    pub divider: Style,
    /// Unselected rail entries.
    pub rail: Style,
    /// Selected rail entry.
    pub rail_selected: Style,
    /// Action bar buttons.
    pub action_bar: Style,
    /// Sticky backdrop fill.
    pub backdrop: Style,
    /// Listing rows.
    pub listing: Style,
    /// Bottom status line.
    pub status: Style,
    /// Measurement overlay.
    pub overlay: Style,
}

impl HeaderStyles {
    /// Styles following `NO_COLOR`.
    pub fn new() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }

    /// Styles for the given color configuration.
    ///
    /// Without colors only modifiers remain, so the selected rail entry and
    /// the fade steps stay distinguishable.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                top_bar: Style::default().fg(Color::White),
                divider: Style::default().fg(Color::Yellow),
                rail: Style::default().fg(Color::Gray),
                rail_selected: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                action_bar: Style::default().fg(Color::Green),
                backdrop: Style::default().bg(Color::Black),
                listing: Style::default(),
                status: Style::default().fg(Color::Black).bg(Color::Gray),
                overlay: Style::default().fg(Color::Cyan),
            }
        } else {
            Self {
                top_bar: Style::default(),
                divider: Style::default(),
                rail: Style::default(),
                rail_selected: Style::default().add_modifier(Modifier::REVERSED),
                action_bar: Style::default(),
                backdrop: Style::default(),
                listing: Style::default(),
                status: Style::default().add_modifier(Modifier::REVERSED),
                overlay: Style::default(),
            }
        }
    }

    /// Action bar style at `opacity`, or `None` when fully transparent.
    pub fn faded_action_bar(&self, opacity: f64) -> Option<Style> {
        if opacity <= 0.0 {
            None
        } else if opacity < DIM_BELOW_OPACITY {
            Some(self.action_bar.add_modifier(Modifier::DIM))
        } else {
            Some(self.action_bar)
        }
    }
}

impl Default for HeaderStyles {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Tests =====

//! Render coordinator.
//!
//! The action bar is one logical component with two physical instances: the
//! embedded one inside the scroll-away header and the floating one pinned
//! under the search bar. The coordinator owns the current [`DisplayMode`] and
//! derives everything else from it, so the two instances can never both accept
//! pointer events.
//!
//! Opacity cross-fades on mode change; pointer events switch at once.

use crate::model::{DisplayMode, LayoutConstants, Placement, Thresholds, Timestamp};
use serde::Serialize;
use std::time::Duration;

/// Offset of the floating action bar: directly under the top bar.
pub fn sticky_lane_offset(top_bar_px: f64, constants: &LayoutConstants) -> f64 {
    top_bar_px + constants.gap_px()
}

/// Top inset the grid applies so content starts below the fixed header.
/// Sticky mode adds the overlay inset.
pub fn grid_padding_top(mode: DisplayMode, top_bar_px: f64, constants: &LayoutConstants) -> f64 {
    let inset = match mode {
        DisplayMode::Sticky => constants.overlay_inset_px(),
        DisplayMode::Resting => 0.0,
    };
    sticky_lane_offset(top_bar_px, constants) + inset
}

/// Whether an instance receives pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEvents {
    /// Interactive.
    Auto,
    /// Input passes through.
    None,
}

/// Visual state of one physical action bar instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstanceStyle {
    /// 0.0 (hidden) ..= 1.0 (opaque).
    pub opacity: f64,
    /// Input routing.
    pub pointer_events: PointerEvents,
}

/// Blur/gradient layer behind the sticky lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Backdrop {
    /// Shown only while sticky.
    pub visible: bool,
    /// `top_bar + gap + action_bar + fade`.
    pub height_px: f64,
}

/// Measured heights the frame geometry depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Effective top bar height.
    pub top_bar_px: f64,
    /// Effective action bar height.
    pub action_bar_px: f64,
    /// Last evaluated scroll offset.
    pub offset_y: f64,
}

/// Everything a host needs to draw the header for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Current mode.
    pub mode: DisplayMode,
    /// Where the interactive action bar lives.
    pub placement: Placement,
    /// Embedded instance style.
    pub embedded: InstanceStyle,
    /// Floating instance style.
    pub floating: InstanceStyle,
    /// Sticky backdrop layer.
    pub backdrop: Backdrop,
    /// Top content inset for the grid.
    pub grid_padding_top: f64,
    /// Vertical position of the floating action bar.
    pub sticky_lane_offset: f64,
    /// Hairline under the fixed header.
    pub divider_visible: bool,
    /// Thresholds in force for this frame.
    pub thresholds: Thresholds,
    /// Whether a cross-fade is still running.
    pub is_animating: bool,
}

impl RenderFrame {
    /// Style of the instance at `placement`.
    pub fn instance(&self, placement: Placement) -> InstanceStyle {
        match placement {
            Placement::Embedded => self.embedded,
            Placement::Floating => self.floating,
        }
    }

    /// Number of instances accepting pointer input. Always 1.
    pub fn interactive_count(&self) -> usize {
        Placement::ALL
            .iter()
            .filter(|p| self.instance(**p).pointer_events == PointerEvents::Auto)
            .count()
    }
}

/// Symmetric ease-in-out (quadratic).
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    started_at: Timestamp,
    /// Opacity of the incoming instance when the fade started.
    from_opacity: f64,
}

/// Owns the mode shown on screen and the cross-fade between placements.
#[derive(Debug, Clone)]
pub struct RenderCoordinator {
    mode: DisplayMode,
    fade: Option<Fade>,
    fade_duration: Duration,
}

impl RenderCoordinator {
    /// Resting, embedded and fully opaque.
    pub fn new(fade_duration: Duration) -> Self {
        Self {
            mode: DisplayMode::Resting,
            fade: None,
            fade_duration,
        }
    }

    /// Displayed mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Placement of the interactive instance.
    pub fn placement(&self) -> Placement {
        self.mode.placement()
    }

    /// Apply a mode. Returns `true` when the placement changed.
    ///
    /// With `animate` false (host frozen) the switch is instant.
    pub fn on_mode(&mut self, mode: DisplayMode, now: Timestamp, animate: bool) -> bool {
        if mode == self.mode {
            return false;
        }

        // Mid-fade reversal continues from the current opacity.
        let from_opacity = 1.0 - self.incoming_opacity(now);
        self.mode = mode;
        self.fade = (animate && !self.fade_duration.is_zero()).then_some(Fade {
            started_at: now,
            from_opacity,
        });
        true
    }

    /// Jump to the end of any running fade.
    pub fn finish_fade(&mut self) {
        self.fade = None;
    }

    /// Whether a fade is still running at `now`.
    pub fn is_animating(&self, now: Timestamp) -> bool {
        self.fade
            .is_some_and(|fade| now.saturating_since(fade.started_at) < self.fade_duration)
    }

    fn incoming_opacity(&self, now: Timestamp) -> f64 {
        let Some(fade) = self.fade else {
            return 1.0;
        };
        let elapsed = now.saturating_since(fade.started_at).as_secs_f64();
        let progress = ease_in_out(elapsed / self.fade_duration.as_secs_f64());
        fade.from_opacity + (1.0 - fade.from_opacity) * progress
    }

    fn styles(&self, now: Timestamp) -> (InstanceStyle, InstanceStyle) {
        let active = self.placement();
        let incoming = self.incoming_opacity(now);
        let style_for = |placement: Placement| {
            if placement == active {
                InstanceStyle {
                    opacity: incoming,
                    pointer_events: PointerEvents::Auto,
                }
            } else {
                InstanceStyle {
                    opacity: 1.0 - incoming,
                    pointer_events: PointerEvents::None,
                }
            }
        };
        (style_for(Placement::Embedded), style_for(Placement::Floating))
    }

    /// Compose the frame for `now`.
    pub fn frame(
        &self,
        thresholds: Thresholds,
        geometry: FrameGeometry,
        constants: &LayoutConstants,
        now: Timestamp,
    ) -> RenderFrame {
        let sticky = self.mode == DisplayMode::Sticky;
        let (embedded, floating) = self.styles(now);
        let lane = sticky_lane_offset(geometry.top_bar_px, constants);

        RenderFrame {
            mode: self.mode,
            placement: self.placement(),
            embedded,
            floating,
            backdrop: Backdrop {
                visible: sticky,
                height_px: lane + geometry.action_bar_px + constants.fade_px(),
            },
            grid_padding_top: grid_padding_top(self.mode, geometry.top_bar_px, constants),
            sticky_lane_offset: lane,
            divider_visible: geometry.offset_y > 0.0,
            thresholds,
            is_animating: self.is_animating(now),
        }
    }
}

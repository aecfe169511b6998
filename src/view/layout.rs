//! Screen layout rendering.
//!
//! Pure rendering: everything drawn comes from a [`ScreenModel`] snapshot,
//! so the same model always produces the same buffer.
//!
//! The grid is one virtual column of rows. Its first rows are the scroll-away
//! header (category rail, gap, embedded action bar), then the listings. Row 0
//! of that column sits at `grid_padding_top - offset` on screen and is clipped
//! under the top bar. The floating action bar, backdrop and top bar are drawn
//! over the grid at fixed screen rows.

use crate::model::{LayoutReport, LayoutSpec, MeasureKind};
use crate::view::constants::{
    ACTION_BAR_BUTTONS, CATEGORIES, LISTINGS_PER_CATEGORY, OVERLAY_WIDTH, STATUS_BAR_HEIGHT,
};
use crate::view::styles::HeaderStyles;
use crate::view_state::{PointerEvents, RenderFrame};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Convert layout units to whole terminal rows.
///
/// Negative and non-finite values clamp to zero.
pub fn to_rows(units: f64) -> u16 {
    if !units.is_finite() || units <= 0.0 {
        return 0;
    }
    units.round().min(f64::from(u16::MAX)) as u16
}

/// Header geometry in rows, as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRows {
    /// Blank rows above the search bar.
    pub safe_area: u16,
    /// Search bar block.
    pub search_bar: u16,
    /// Gap between the top bar and the sticky lane.
    pub gap: u16,
    /// Category rail.
    pub category_rail: u16,
    /// Gap between the rail and the embedded action bar.
    pub rail_action_gap: u16,
    /// Action bar, in either placement.
    pub action_bar: u16,
}

impl HeaderRows {
    /// Rows for the design constants in `spec`.
    pub fn from_spec(spec: &LayoutSpec) -> Self {
        Self {
            safe_area: to_rows(spec.safe_area_top_px),
            search_bar: to_rows(spec.search_bar_px),
            gap: to_rows(spec.gap_px),
            category_rail: to_rows(spec.category_rail_px),
            rail_action_gap: to_rows(spec.rail_action_gap_px),
            action_bar: to_rows(spec.action_bar_px),
        }
    }

    /// Fixed top bar: safe area plus search bar.
    pub fn top_bar(&self) -> u16 {
        self.safe_area.saturating_add(self.search_bar)
    }

    /// Composite scroll-away header.
    pub fn scroll_header(&self) -> u16 {
        self.category_rail
            .saturating_add(self.rail_action_gap)
            .saturating_add(self.action_bar)
    }

    /// Layout reports for the three measured views at `width` columns.
    pub fn reports(&self, width: u16) -> [LayoutReport; 3] {
        let width = f64::from(width);
        [
            LayoutReport::new(MeasureKind::TopBar, width, f64::from(self.top_bar())),
            LayoutReport::new(MeasureKind::ActionBar, width, f64::from(self.action_bar)),
            LayoutReport::new(
                MeasureKind::ScrollHeader,
                width,
                f64::from(self.scroll_header()),
            ),
        ]
    }
}

/// Listing rows for `category`.
pub fn listing_lines(category: &str) -> Vec<String> {
    (1..=LISTINGS_PER_CATEGORY)
        .map(|n| format!("  {n:>3}. {category} listing {n}"))
        .collect()
}

/// Snapshot of everything drawn in one frame.
#[derive(Debug, Clone)]
pub struct ScreenModel {
    /// Engine output for this frame.
    pub frame: RenderFrame,
    /// Header geometry.
    pub rows: HeaderRows,
    /// Index into [`CATEGORIES`].
    pub selected: usize,
    /// Listing rows below the scroll header.
    pub listings: Vec<String>,
    /// Grid scroll offset in rows.
    pub offset_y: f64,
    /// Whether the engine is dropping scroll input.
    pub frozen: bool,
    /// Measurement overlay lines, when shown.
    pub overlay: Option<Vec<String>>,
}

impl ScreenModel {
    /// Rows in the virtual grid column.
    pub fn content_rows(&self) -> usize {
        usize::from(self.rows.scroll_header()) + self.listings.len()
    }
}

/// Render the whole screen: grid, backdrop, floating action bar, top bar,
/// status bar and the optional overlay, back to front.
pub fn render_layout(frame: &mut Frame, model: &ScreenModel) {
    let styles = HeaderStyles::new();
    let area = frame.area();

    render_grid(frame, area, model, &styles);
    render_backdrop(frame, area, model, &styles);
    render_floating_bar(frame, area, model, &styles);
    render_top_bar(frame, area, model, &styles);
    render_status_bar(frame, area, model, &styles);

    if let Some(lines) = &model.overlay {
        render_overlay(frame, area, model.rows.top_bar(), lines, &styles);
    }
}

/// Screen row of grid row 0 and the number of grid rows hidden under the top bar.
fn grid_origin(model: &ScreenModel) -> (u16, u16) {
    let top = i64::from(model.rows.top_bar());
    let padding = i64::from(to_rows(model.frame.grid_padding_top));
    let shift = padding - i64::from(to_rows(model.offset_y));

    if shift >= top {
        (u16::try_from(shift).unwrap_or(u16::MAX), 0)
    } else {
        let hidden = u16::try_from(top - shift).unwrap_or(u16::MAX);
        (model.rows.top_bar(), hidden)
    }
}

fn render_grid(frame: &mut Frame, area: Rect, model: &ScreenModel, styles: &HeaderStyles) {
    let (y, hidden) = grid_origin(model);
    if y >= area.bottom() {
        return;
    }
    let rect = Rect::new(area.x, y, area.width, area.bottom() - y);

    let mut lines = framed(
        rail_line(model.selected, styles),
        model.rows.category_rail,
        area.width,
        styles.rail,
    );
    lines.extend(blank_lines(model.rows.rail_action_gap));

    let embedded = model.frame.embedded;
    match styles.faded_action_bar(embedded.opacity) {
        Some(style) => lines.extend(framed(
            action_bar_line(embedded.pointer_events, style),
            model.rows.action_bar,
            area.width,
            style,
        )),
        None => lines.extend(blank_lines(model.rows.action_bar)),
    }

    lines.extend(
        model
            .listings
            .iter()
            .map(|listing| Line::styled(listing.clone(), styles.listing)),
    );

    frame.render_widget(Paragraph::new(lines).scroll((hidden, 0)), rect);
}

fn render_backdrop(frame: &mut Frame, area: Rect, model: &ScreenModel, styles: &HeaderStyles) {
    let backdrop = model.frame.backdrop;
    if !backdrop.visible {
        return;
    }
    let top = model.rows.top_bar();
    let bottom = to_rows(backdrop.height_px).min(area.bottom());
    if bottom <= top {
        return;
    }
    let rect = Rect::new(area.x, top, area.width, bottom - top);
    frame.render_widget(Clear, rect);
    frame.render_widget(Block::default().style(styles.backdrop), rect);
}

fn render_floating_bar(
    frame: &mut Frame,
    area: Rect,
    model: &ScreenModel,
    styles: &HeaderStyles,
) {
    let floating = model.frame.floating;
    let Some(style) = styles.faded_action_bar(floating.opacity) else {
        return;
    };
    let y = to_rows(model.frame.sticky_lane_offset);
    let height = model.rows.action_bar.min(area.bottom().saturating_sub(y));
    if height == 0 {
        return;
    }

    let rect = Rect::new(area.x, y, area.width, height);
    let lines = framed(
        action_bar_line(floating.pointer_events, style),
        model.rows.action_bar,
        area.width,
        style,
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines), rect);
}

fn render_top_bar(frame: &mut Frame, area: Rect, model: &ScreenModel, styles: &HeaderStyles) {
    let y = model.rows.safe_area.min(area.bottom());
    let height = model.rows.search_bar.min(area.bottom() - y);
    if height == 0 {
        return;
    }

    let (borders, border_style) = if model.frame.divider_visible {
        (Borders::ALL, styles.divider)
    } else {
        (Borders::TOP | Borders::LEFT | Borders::RIGHT, styles.top_bar)
    };
    let block = Block::default()
        .borders(borders)
        .border_style(border_style)
        .title(" stickylane ");

    let rect = Rect::new(area.x, y, area.width, height);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Line::styled(" Search listings...", styles.top_bar)).block(block),
        rect,
    );
}

fn build_status_text(model: &ScreenModel) -> String {
    let thresholds = model.frame.thresholds;
    let frozen = if model.frozen { " [frozen]" } else { "" };
    format!(
        " {:?}{} | offset {:.0} | enter {:.1} exit {:.1} | j/k scroll  h/l category  f focus  m overlay  q quit",
        model.frame.mode, frozen, model.offset_y, thresholds.enter, thresholds.exit
    )
}

fn render_status_bar(frame: &mut Frame, area: Rect, model: &ScreenModel, styles: &HeaderStyles) {
    if area.height < STATUS_BAR_HEIGHT {
        return;
    }
    let rect = Rect::new(
        area.x,
        area.bottom() - STATUS_BAR_HEIGHT,
        area.width,
        STATUS_BAR_HEIGHT,
    );
    frame.render_widget(
        Paragraph::new(build_status_text(model)).style(styles.status),
        rect,
    );
}

fn render_overlay(frame: &mut Frame, area: Rect, top: u16, lines: &[String], styles: &HeaderStyles) {
    let width = OVERLAY_WIDTH.min(area.width);
    let available = area.bottom().saturating_sub(top.saturating_add(STATUS_BAR_HEIGHT));
    let wanted = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let height = wanted.min(available);
    if width == 0 || height < 3 {
        return;
    }

    let rect = Rect::new(area.right() - width, top, width, height);
    let body: Vec<Line> = lines
        .iter()
        .map(|line| Line::styled(line.clone(), styles.overlay))
        .collect();
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles.overlay)
                .title(" measurements "),
        ),
        rect,
    );
}

fn rail_line(selected: usize, styles: &HeaderStyles) -> Line<'static> {
    let mut spans = Vec::with_capacity(CATEGORIES.len() * 2);
    for (index, category) in CATEGORIES.iter().enumerate() {
        let style = if index == selected {
            styles.rail_selected
        } else {
            styles.rail
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {category} "), style));
    }
    Line::from(spans)
}

/// The interactive instance carries a `>` marker.
fn action_bar_line(pointer_events: PointerEvents, style: Style) -> Line<'static> {
    let marker = match pointer_events {
        PointerEvents::Auto => ">",
        PointerEvents::None => " ",
    };
    let mut spans = vec![Span::styled(format!(" {marker}"), style)];
    spans.extend(
        ACTION_BAR_BUTTONS
            .iter()
            .map(|button| Span::styled(format!("  [{button}]"), style)),
    );
    Line::from(spans)
}

/// Fit `body` into `rows` rows, with rules above and below when there is room.
fn framed(body: Line<'static>, rows: u16, width: u16, style: Style) -> Vec<Line<'static>> {
    let rule = || Line::styled("─".repeat(usize::from(width)), style);
    match rows {
        0 => Vec::new(),
        1 => vec![body],
        2 => vec![body, rule()],
        n => {
            let mut lines = vec![rule(), body, rule()];
            lines.extend(blank_lines(n - 3));
            lines
        }
    }
}

fn blank_lines(rows: u16) -> Vec<Line<'static>> {
    (0..rows).map(|_| Line::default()).collect()
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;

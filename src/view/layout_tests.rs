//! Tests for screen layout rendering.

use super::*;
use crate::model::{DisplayMode, LayoutConstants, Timestamp};
use crate::state::StickyHeader;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

// ===== Test Helpers =====

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

/// Model after scrolling to `offset` at mount, drawn well after the fade.
fn model_at(offset: f64) -> ScreenModel {
    let spec = LayoutSpec::terminal_rows();
    let rows = HeaderRows::from_spec(&spec);
    let constants = LayoutConstants::new(spec).unwrap();
    let mut engine = StickyHeader::new(constants, Timestamp::ZERO);
    engine.scroll(offset, Timestamp::ZERO);

    ScreenModel {
        frame: engine.frame(Timestamp::from_millis(1_000)),
        rows,
        selected: 0,
        listings: listing_lines(CATEGORIES[0]),
        offset_y: offset,
        frozen: false,
        overlay: None,
    }
}

fn draw(model: &ScreenModel) -> Vec<String> {
    let mut terminal = create_test_terminal();
    terminal
        .draw(|frame| render_layout(frame, model))
        .unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        })
        .collect()
}

// ===== Geometry =====

#[test]
fn to_rows_rounds_and_clamps() {
    assert_eq!(to_rows(2.4), 2);
    assert_eq!(to_rows(2.6), 3);
    assert_eq!(to_rows(-5.0), 0);
    assert_eq!(to_rows(f64::NAN), 0);
    assert_eq!(to_rows(1e12), u16::MAX);
}

#[test]
fn header_rows_from_terminal_spec() {
    let rows = HeaderRows::from_spec(&LayoutSpec::terminal_rows());
    assert_eq!(rows.top_bar(), 3);
    assert_eq!(rows.scroll_header(), 7);

    let reports = rows.reports(80);
    assert_eq!(reports[0].kind, MeasureKind::TopBar);
    assert_eq!(reports[0].height, 3.0);
    assert_eq!(reports[2].kind, MeasureKind::ScrollHeader);
    assert_eq!(reports[2].height, 7.0);
}

#[test]
fn listing_lines_are_numbered_per_category() {
    let lines = listing_lines("eatery");
    assert_eq!(lines.len(), LISTINGS_PER_CATEGORY);
    assert!(lines[0].contains("1. eatery listing 1"));
}

#[test]
fn content_rows_counts_header_and_listings() {
    let model = model_at(0.0);
    assert_eq!(model.content_rows(), 7 + LISTINGS_PER_CATEGORY);
}

// ===== Rendering =====

#[test]
fn resting_frame_draws_header_inside_grid() {
    let model = model_at(0.0);
    assert_eq!(model.frame.mode, DisplayMode::Resting);
    let screen = draw(&model);

    // Grid starts below top bar + gap: rail 4..7, gap 7, action bar 8..11
    assert!(screen[5].contains(" mikvah "), "rail row: {:?}", screen[5]);
    assert!(screen[9].contains(">  [Filter]"), "action row: {:?}", screen[9]);
    assert!(screen[11].contains("1. mikvah listing 1"));
}

#[test]
fn sticky_frame_draws_single_interactive_bar_in_lane() {
    let model = model_at(20.0);
    assert_eq!(model.frame.mode, DisplayMode::Sticky);
    let screen = draw(&model);

    // Lane starts at top bar + gap = 4; buttons on the middle row
    assert!(screen[5].contains(">  [Filter]"), "lane row: {:?}", screen[5]);
    let bars = screen.iter().filter(|row| row.contains("[Filter]")).count();
    assert_eq!(bars, 1, "embedded bar scrolled away and is transparent");
}

#[test]
fn divider_appears_once_scrolled() {
    let at_top = draw(&model_at(0.0));
    assert!(!at_top[2].contains('└'), "no divider at offset 0");

    let scrolled = draw(&model_at(2.0));
    assert!(scrolled[2].contains('└'), "divider row: {:?}", scrolled[2]);
}

#[test]
fn top_bar_shows_search_placeholder() {
    let screen = draw(&model_at(0.0));
    assert!(screen[0].contains("stickylane"));
    assert!(screen[1].contains("Search listings..."));
}

#[test]
fn status_bar_shows_mode_and_frozen_flag() {
    let mut model = model_at(20.0);
    model.frozen = true;
    let screen = draw(&model);

    let status = &screen[23];
    assert!(status.contains("Sticky"), "status: {status:?}");
    assert!(status.contains("[frozen]"));
}

#[test]
fn overlay_renders_lines_in_box() {
    let mut model = model_at(0.0);
    model.overlay = Some(vec!["top_bar: 3.0 (Measured)".to_string()]);
    let screen = draw(&model);

    assert!(screen[3].contains("measurements"));
    assert!(screen[4].contains("top_bar: 3.0 (Measured)"));
}

#[test]
fn tiny_terminal_does_not_panic() {
    let model = model_at(20.0);
    let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
    terminal
        .draw(|frame| render_layout(frame, &model))
        .unwrap();
}

//! Snapshot tests for the terminal host screen
//!
//! Uses insta + ratatui TestBackend to verify rendering output doesn't regress.
//! A small 40x12 terminal keeps every header region on screen at once.

use crate::model::{DisplayMode, LayoutConstants, LayoutSpec};
use crate::view::TuiApp;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Captures the visual output character by character, preserving layout.
/// Empty lines are removed to keep snapshots clean.
fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Demo host on a 40x12 terminal with row-unit constants.
fn create_app() -> TuiApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
    let constants = LayoutConstants::new(LayoutSpec::terminal_rows()).unwrap();
    TuiApp::new_for_test(terminal, constants, None)
}

fn screen(app: &TuiApp<TestBackend>) -> String {
    buffer_to_string(app.terminal().backend().buffer())
}

// ===== Screen Snapshot Tests =====

#[test]
fn snapshot_resting_at_top() {
    let mut app = create_app();
    app.render_test().unwrap();

    assert_eq!(app.engine().mode(), DisplayMode::Resting);
    insta::assert_snapshot!("resting_at_top", screen(&app));
}

#[test]
fn snapshot_sticky_after_fade() {
    let mut app = create_app();
    app.render_test().unwrap();

    // Two pages down, well past the snap zone
    let page_down = KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE);
    app.handle_key_test(page_down);
    app.handle_key_test(page_down);
    app.advance_to(1_000);
    app.render_test().unwrap();

    assert_eq!(app.engine().mode(), DisplayMode::Sticky);
    assert_eq!(app.offset_y(), 16.0);
    insta::assert_snapshot!("sticky_after_fade", screen(&app));
}

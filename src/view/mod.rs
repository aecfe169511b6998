//! Terminal demo host (impure shell).
//!
//! Drives a [`StickyHeader`] from crossterm input and draws its
//! [`crate::view_state::RenderFrame`] with ratatui. The host owns the scroll
//! offset; the engine only observes it and occasionally asks for a snap.

pub mod constants;
pub mod layout;
pub mod styles;

pub use layout::{listing_lines, render_layout, to_rows, HeaderRows, ScreenModel};
pub use styles::{ColorConfig, HeaderStyles};

use crate::config::keybindings::KeyBindings;
use crate::model::{AppError, Dimensions, KeyAction, LayoutConstants, MeasureKind, Timestamp};
use crate::state::{EngineEvent, StickyHeader};
use constants::{ANIMATION_POLL, CATEGORIES, IDLE_POLL, STATUS_BAR_HEIGHT};
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Source of engine timestamps.
#[derive(Debug, Clone, Copy)]
enum Clock {
    /// Milliseconds since the app started.
    Wall(Instant),
    /// Fixed time, moved by hand.
    #[cfg_attr(not(test), allow(dead_code))]
    Manual(Timestamp),
}

impl Clock {
    fn now(&self) -> Timestamp {
        match self {
            Clock::Wall(start) => Timestamp::from(start.elapsed()),
            Clock::Manual(now) => *now,
        }
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    engine: StickyHeader,
    rows: HeaderRows,
    key_bindings: KeyBindings,
    clock: Clock,
    /// Index into [`CATEGORIES`].
    selected: usize,
    listings: Vec<String>,
    /// Grid scroll offset in rows, owned by the host.
    offset_y: f64,
    focused: bool,
    overlay_visible: bool,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and focus reporting
    pub fn new(constants: LayoutConstants, category: Option<&str>) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableFocusChange)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self::assemble(
            terminal,
            constants,
            category,
            KeyBindings::default(),
            Clock::Wall(Instant::now()),
        ))
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Sleeps until the next input,
    /// the next engine timer, or the next fade step, whichever comes first.
    pub fn run(&mut self) -> Result<(), TuiError> {
        loop {
            self.draw()?;

            if event::poll(self.poll_timeout())? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    Event::FocusGained => self.handle_focus(true),
                    Event::FocusLost => self.handle_focus(false),
                    _ => {}
                }
            } else {
                let now = self.now();
                self.engine.advance(now);
            }

            self.apply_engine_events();
        }

        self.engine.unmount();
        Ok(())
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Mount the engine and send it the initial category and window size.
    fn assemble(
        terminal: Terminal<B>,
        constants: LayoutConstants,
        category: Option<&str>,
        key_bindings: KeyBindings,
        clock: Clock,
    ) -> Self {
        let now = clock.now();
        let rows = HeaderRows::from_spec(constants.spec());
        let selected = match category {
            Some(name) => CATEGORIES.iter().position(|c| *c == name).unwrap_or_else(|| {
                warn!(category = name, "Unknown category, starting with the first");
                0
            }),
            None => 0,
        };

        let mut engine = StickyHeader::new(constants, now);
        engine.category_changed(CATEGORIES[selected], now);
        match terminal.size() {
            Ok(size) => engine.dimensions_changed(
                Dimensions::new(f64::from(size.width), f64::from(size.height)),
                now,
            ),
            Err(err) => warn!(error = %err, "Terminal size unavailable at mount"),
        }

        Self {
            terminal,
            engine,
            rows,
            key_bindings,
            clock,
            selected,
            listings: listing_lines(CATEGORIES[selected]),
            offset_y: 0.0,
            focused: true,
            overlay_visible: false,
        }
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// How long to wait for input before the engine needs time to pass.
    fn poll_timeout(&self) -> Duration {
        let now = self.now();
        if self.engine.frame(now).is_animating {
            return ANIMATION_POLL;
        }
        match self.engine.next_deadline() {
            Some(deadline) => deadline.saturating_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        debug!(?action, "Key action");

        match action {
            KeyAction::Quit => return true,
            KeyAction::NextCategory => {
                self.select_category((self.selected + 1) % CATEGORIES.len());
            }
            KeyAction::PrevCategory => {
                self.select_category((self.selected + CATEGORIES.len() - 1) % CATEGORIES.len());
            }
            KeyAction::ToggleFocus => self.handle_focus(!self.focused),
            KeyAction::ToggleOverlay => self.overlay_visible = !self.overlay_visible,
            scroll => self.handle_scroll(scroll),
        }
        false
    }

    fn handle_scroll(&mut self, action: KeyAction) {
        // A blurred screen is not on display; nothing scrolls it.
        if self.engine.is_frozen() {
            return;
        }
        let page = f64::from(self.viewport_rows().max(1));
        let target = match action {
            KeyAction::ScrollUp => self.offset_y - 1.0,
            KeyAction::ScrollDown => self.offset_y + 1.0,
            KeyAction::PageUp => self.offset_y - page,
            KeyAction::PageDown => self.offset_y + page,
            KeyAction::ScrollToTop => 0.0,
            KeyAction::ScrollToBottom => self.max_offset(),
            _ => return,
        };
        self.scroll_to(target);
    }

    /// Move the grid and tell the engine. No-op when the clamped offset is unchanged.
    fn scroll_to(&mut self, target: f64) {
        let clamped = target.clamp(0.0, self.max_offset());
        if clamped == self.offset_y {
            return;
        }
        self.offset_y = clamped;
        let now = self.now();
        self.engine.scroll(clamped, now);
    }

    fn select_category(&mut self, index: usize) {
        self.selected = index;
        self.listings = listing_lines(CATEGORIES[index]);
        let now = self.now();
        self.engine.category_changed(CATEGORIES[index], now);
        info!(category = CATEGORIES[index], "Category selected");
        self.scroll_to(self.offset_y.min(self.max_offset()));
    }

    fn handle_focus(&mut self, focused: bool) {
        self.focused = focused;
        let now = self.now();
        self.engine.set_focused(focused, now);
    }

    /// Handle a terminal resize event
    ///
    /// The engine starts a fresh measurement lifecycle on the new size.
    fn handle_resize(&mut self, width: u16, height: u16) {
        debug!("Handling resize to {}x{}", width, height);
        let now = self.now();
        self.engine
            .dimensions_changed(Dimensions::new(f64::from(width), f64::from(height)), now);
        self.scroll_to(self.offset_y.min(self.max_offset()));
    }

    /// Apply snap requests; everything else is only logged.
    fn apply_engine_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::ScrollTo { offset_y } => {
                    debug!(offset_y, "Snapping grid");
                    self.scroll_to(offset_y);
                }
                other => debug!(event = ?other, "Engine event"),
            }
        }
    }

    fn terminal_height(&self) -> u16 {
        self.terminal.size().map(|size| size.height).unwrap_or(0)
    }

    /// Rows between the top bar and the status bar.
    fn viewport_rows(&self) -> u16 {
        self.terminal_height()
            .saturating_sub(self.rows.top_bar())
            .saturating_sub(STATUS_BAR_HEIGHT)
    }

    /// Largest offset that still fills the viewport.
    fn max_offset(&self) -> f64 {
        let content = self.rows.scroll_header() as usize + self.listings.len();
        let padding = f64::from(self.rows.top_bar()) + self.engine.constants().gap_px();
        let visible = f64::from(self.terminal_height().saturating_sub(STATUS_BAR_HEIGHT));
        (content as f64 + padding - visible).max(0.0)
    }

    /// Report the drawn header sizes, as a layout pass would.
    fn report_layouts(&mut self, width: u16) {
        let now = self.now();
        for report in self.rows.reports(width) {
            self.engine.report_layout(report, now);
        }
    }

    fn overlay_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = MeasureKind::ALL
            .iter()
            .map(|kind| {
                let measurement = self.engine.measurement(*kind);
                format!(
                    "{kind}: {:.1} ({:?})",
                    measurement.height_px, measurement.source
                )
            })
            .collect();
        let thresholds = self.engine.thresholds();
        lines.push(format!(
            "base {:.1} enter {:.1} exit {:.1}",
            thresholds.base, thresholds.enter, thresholds.exit
        ));
        lines.push(format!(
            "published: {}",
            if self.engine.header_metrics().is_some() {
                "yes"
            } else {
                "no"
            }
        ));
        lines
    }

    fn screen_model(&self, now: Timestamp) -> ScreenModel {
        ScreenModel {
            frame: self.engine.frame(now),
            rows: self.rows,
            selected: self.selected,
            listings: self.listings.clone(),
            offset_y: self.offset_y,
            frozen: self.engine.is_frozen(),
            overlay: self.overlay_visible.then(|| self.overlay_lines()),
        }
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.report_layouts(size.width);

        let model = self.screen_model(self.now());
        self.terminal.draw(|frame| {
            render_layout(frame, &model);
        })?;

        Ok(())
    }
}

// ===== Test Helpers =====
//
// The following methods are ONLY for testing within the crate.

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Create TuiApp on any backend with a hand-driven clock at time zero.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        constants: LayoutConstants,
        category: Option<&str>,
    ) -> Self {
        Self::assemble(
            terminal,
            constants,
            category,
            KeyBindings::default(),
            Clock::Manual(Timestamp::ZERO),
        )
    }

    /// Move the test clock to `at_ms`, fire due timers and apply snaps.
    pub(crate) fn advance_to(&mut self, at_ms: u64) {
        let now = Timestamp::from_millis(at_ms);
        self.clock = Clock::Manual(now);
        self.engine.advance(now);
        self.apply_engine_events();
    }

    /// Handle a key and apply resulting engine events. Returns true on quit.
    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        let quit = self.handle_key(key);
        self.apply_engine_events();
        quit
    }

    pub(crate) fn handle_resize_test(&mut self, width: u16, height: u16) {
        self.handle_resize(width, height);
        self.apply_engine_events();
    }

    /// Draw one frame.
    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn engine(&self) -> &StickyHeader {
        &self.engine
    }

    pub(crate) fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub(crate) fn selected_category(&self) -> &'static str {
        CATEGORIES[self.selected]
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(constants: LayoutConstants, category: Option<&str>) -> Result<(), TuiError> {
    let mut app = TuiApp::new(constants, category)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and focus reporting, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableFocusChange)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DisplayMode, LayoutSpec, MeasureSource};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // Helper to create test TuiApp
    fn create_test_app() -> TuiApp<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let constants = LayoutConstants::new(LayoutSpec::terminal_rows()).unwrap();
        TuiApp::new_for_test(terminal, constants, None)
    }

    fn press(app: &mut TuiApp<TestBackend>, code: KeyCode, times: usize) {
        for _ in 0..times {
            app.handle_key_test(key(code));
        }
    }

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    #[test]
    fn handle_key_q_returns_true() {
        let mut app = create_test_app();
        assert!(app.handle_key_test(key(KeyCode::Char('q'))));
    }

    #[test]
    fn unbound_key_is_ignored() {
        let mut app = create_test_app();
        assert!(!app.handle_key_test(key(KeyCode::Char('z'))));
        assert_eq!(app.offset_y(), 0.0);
    }

    #[test]
    fn draw_renders_without_error() {
        let mut app = create_test_app();
        app.render_test().unwrap();
        assert!(app
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .any(|cell| cell.symbol() == ">"));
    }

    #[test]
    fn first_draw_locks_measurements() {
        let mut app = create_test_app();
        app.render_test().unwrap();

        for kind in MeasureKind::ALL {
            assert_eq!(
                app.engine().measurement(kind).source,
                MeasureSource::Measured,
                "{kind}"
            );
        }
        assert!(app.engine().header_metrics().is_some());
    }

    #[test]
    fn unknown_category_falls_back_to_first() {
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let constants = LayoutConstants::new(LayoutSpec::terminal_rows()).unwrap();
        let app = TuiApp::new_for_test(terminal, constants, Some("bakery"));
        assert_eq!(app.selected_category(), CATEGORIES[0]);
        assert_eq!(app.engine().category(), Some(CATEGORIES[0]));
    }

    #[test]
    fn initial_category_is_honored() {
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let constants = LayoutConstants::new(LayoutSpec::terminal_rows()).unwrap();
        let app = TuiApp::new_for_test(terminal, constants, Some("shul"));
        assert_eq!(app.selected_category(), "shul");
    }

    #[test]
    fn scrolling_down_enters_sticky() {
        let mut app = create_test_app();
        app.render_test().unwrap();

        press(&mut app, KeyCode::PageDown, 1);

        assert!(app.offset_y() > app.engine().thresholds().enter);
        assert_eq!(app.engine().mode(), DisplayMode::Sticky);
    }

    #[test]
    fn scroll_up_at_top_is_clamped() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('k'), 3);
        assert_eq!(app.offset_y(), 0.0);
    }

    #[test]
    fn scroll_to_bottom_stops_at_max_offset() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::End, 1);
        let bottom = app.offset_y();
        assert!(bottom > 0.0);

        press(&mut app, KeyCode::Char('j'), 1);
        assert_eq!(app.offset_y(), bottom);
    }

    #[test]
    fn idle_near_threshold_snaps_grid() {
        let mut app = create_test_app();
        app.render_test().unwrap();
        let base = app.engine().thresholds().base;

        // One row short of base, inside the snap zone
        app.scroll_to(base - 1.0);
        app.advance_to(1_000);

        assert_eq!(app.offset_y(), base);
    }

    #[test]
    fn focus_loss_freezes_scrolling() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('f'), 1);
        assert!(app.engine().is_frozen());

        press(&mut app, KeyCode::PageDown, 1);
        assert_eq!(app.offset_y(), 0.0);
        assert_eq!(app.engine().mode(), DisplayMode::Resting);

        press(&mut app, KeyCode::Char('f'), 1);
        assert!(!app.engine().is_frozen());
    }

    #[test]
    fn category_change_resets_measurements() {
        let mut app = create_test_app();
        app.render_test().unwrap();

        press(&mut app, KeyCode::Char('l'), 1);

        assert_eq!(app.selected_category(), CATEGORIES[1]);
        assert_eq!(
            app.engine().measurement(MeasureKind::TopBar).source,
            MeasureSource::Default
        );
    }

    #[test]
    fn prev_category_wraps_around() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('h'), 1);
        assert_eq!(app.selected_category(), CATEGORIES[CATEGORIES.len() - 1]);
    }

    #[test]
    fn resize_starts_new_lifecycle() {
        let mut app = create_test_app();
        app.render_test().unwrap();

        app.handle_resize_test(100, 30);

        assert_eq!(
            app.engine().measurement(MeasureKind::ActionBar).source,
            MeasureSource::Default
        );
        app.render_test().unwrap();
        assert_eq!(
            app.engine().measurement(MeasureKind::ActionBar).source,
            MeasureSource::Measured
        );
    }

    #[test]
    fn overlay_toggle_shows_measurements() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('m'), 1);
        app.render_test().unwrap();

        let text: String = app
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("measurements"));
        assert!(text.contains("top_bar"));
    }

    #[test]
    fn poll_timeout_tracks_next_timer() {
        let app = create_test_app();
        // Fallback timers are pending from mount
        assert!(app.poll_timeout() <= Duration::from_millis(500));
    }
}

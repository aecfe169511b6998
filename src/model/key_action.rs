//! Domain-level keyboard actions for the terminal host, independent of key bindings.

/// Actions the terminal host understands.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the grid up by one row. Default: k/↑
    ScrollUp,
    /// Scroll the grid down by one row. Default: j/↓
    ScrollDown,
    /// Scroll up by one page. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the top of the grid. Default: g/Home
    ScrollToTop,
    /// Jump to the bottom of the grid. Default: G/End
    ScrollToBottom,

    // Categories
    /// Select the next category in the rail. Default: l/→/Tab
    NextCategory,
    /// Select the previous category in the rail. Default: h/←/Shift+Tab
    PrevCategory,

    // Host lifecycle
    /// Simulate navigating away from and back to the screen. Default: f
    ToggleFocus,
    /// Toggle the measurement overlay. Default: m
    ToggleOverlay,

    // Application
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

impl KeyAction {
    /// Whether this action moves the scroll offset.
    pub fn is_scroll(self) -> bool {
        matches!(
            self,
            KeyAction::ScrollUp
                | KeyAction::ScrollDown
                | KeyAction::PageUp
                | KeyAction::PageDown
                | KeyAction::ScrollToTop
                | KeyAction::ScrollToBottom
        )
    }
}

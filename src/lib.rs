//! stickylane
//!
//! Scroll-synchronized sticky header layout engine. A screen has a fixed top
//! bar, a scroll-away header holding a category rail and an action bar, and a
//! scrolling grid. Once the grid scrolls far enough the action bar detaches
//! and pins under the top bar; scrolling back re-embeds it.
//!
//! Pure Core / Impure Shell:
//! - `model`, `state`, `view_state`, `parser`, `integration`: pure, driven by
//!   host timestamps
//! - `source`, `view`, `logging`, `config`: I/O at the edges

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;

// Re-export trace replay integration
pub mod integration;

pub use state::StickyHeader;

#[cfg(test)]
mod tests;

//! View-state layer: what the host draws, derived from engine state.
//!
//! - `render`: RenderCoordinator - action bar placement, cross-fade, backdrop
//!   and grid padding for one frame

pub mod render;

pub use render::{
    ease_in_out, Backdrop, FrameGeometry, InstanceStyle, PointerEvents, RenderCoordinator,
    RenderFrame,
};

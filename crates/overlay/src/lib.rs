//! Per-anchor tooltip overlays.
//!
//! The host forwards pointer events and geometry; this crate decides what
//! each overlay shows, whether it is visible, and where it goes.

mod label;
mod mount;
mod query;
mod tooltip;

pub use label::Label;
pub use mount::{Overlay, OverlayContent, OverlayMount};
pub use query::{query_selection, remove_query_anchors};
pub use tooltip::{HIDE_DELAY, Triggers, TooltipState};

//! PEEKBAR - Scrub-preview coordinator for seek/timeline controls
//!
//! Re-exports the embedding surface: the time bar adapter, the delegate,
//! and the traits at the loader/view-tree boundary.

// Core engine (delegate, loader boundary)
pub mod core;

// Embedding surface
pub mod color;
pub mod timebar;
pub mod view;

// Re-export commonly used types from core
pub use core::delegate::PreviewDelegate;
pub use core::loader::{FrameRequest, FrameTicket, PreviewFrame, PreviewLoader};

// Re-export the embedding surface
pub use color::{Color, ColorRes, Palette};
pub use timebar::{
    PreviewChangeListener, PreviewTimeBar, ScrubListener, ScrubState, ShowOnScrub, TimeBarStyle,
};
pub use view::{ParentView, PreviewSurface, SharedSurface, SiblingView, ViewId};

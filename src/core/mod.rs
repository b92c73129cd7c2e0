//! Core engine modules - delegate and loader boundary
//!
//! These modules form the coordination engine, independent of any UI toolkit.

pub mod delegate;
pub mod loader;

// Re-exports for convenience
pub use delegate::PreviewDelegate;
pub use loader::{FrameRequest, FrameSink, FrameTicket, PreviewFrame, PreviewLoader};

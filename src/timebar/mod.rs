//! Seek-bar-facing adapter - scrub state machine and listener fan-out

mod timebar;
pub mod timebar_events;

pub use timebar::{PreviewTimeBar, ScrubState, TimeBarStyle};
pub use timebar_events::{PreviewChangeListener, ScrubListener, ShowOnScrub};

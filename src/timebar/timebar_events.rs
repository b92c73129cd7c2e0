//! Preview lifecycle contracts: scrub callbacks in, change events out.
//!
//! Notification order is FIFO (first-registered, first-called) and fan-out
//! iterates a snapshot, so a listener may mutate the set or call straight
//! back into the bar mid-notification. A listener registered during a pass
//! is not notified in that same pass.

use std::sync::Arc;

use super::timebar::PreviewTimeBar;

/// Scrub callbacks consumed from the timeline widget
pub trait ScrubListener {
    fn on_scrub_start(&mut self, position: i64);
    fn on_scrub_move(&mut self, position: i64);
    fn on_scrub_stop(&mut self, position: i64, canceled: bool);
}

/// Preview lifecycle events re-broadcast to the embedding application.
///
/// All callbacks default to no-ops, so embedders implement only what they
/// need. `bar` is the event source; callbacks may call straight back into it
/// (`show_preview`, `hide_preview`, queries). Listeners are shared by `Arc`
/// and invoked through `&self` - keep mutable listener state behind a
/// `Mutex` or an atomic.
pub trait PreviewChangeListener: Send + Sync {
    /// Scrub began; the bar is now in `ScrubState::Scrubbing`
    fn on_start_preview(&self, bar: &mut PreviewTimeBar) {
        let _ = bar;
    }

    /// Scrub moved; `temporary` is true for intermediate drag positions
    fn on_preview(&self, bar: &mut PreviewTimeBar, position: i64, temporary: bool) {
        let _ = (bar, position, temporary);
    }

    /// Scrub ended; the committed position is `bar.progress()`
    fn on_stop_preview(&self, bar: &mut PreviewTimeBar) {
        let _ = bar;
    }
}

/// Ordered listener sequence.
///
/// Registration order is notification order. Duplicates are permitted and
/// notified once per registration; removal drops the first match only.
#[derive(Clone, Default)]
pub(crate) struct ListenerSet {
    listeners: Vec<Arc<dyn PreviewChangeListener>>,
}

impl ListenerSet {
    pub(crate) fn add(&mut self, listener: Arc<dyn PreviewChangeListener>) {
        self.listeners.push(listener);
    }

    /// Remove the first registration of `listener`, by pointer identity
    pub(crate) fn remove(&mut self, listener: &Arc<dyn PreviewChangeListener>) {
        if let Some(idx) = self.listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            self.listeners.remove(idx);
        }
    }

    /// Snapshot for reentrancy-safe fan-out
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn PreviewChangeListener>> {
        self.listeners.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

/// Out-of-box visibility policy: show on scrub-start, hide on scrub-stop.
///
/// The architecture keeps visibility listener-driven so embedders can
/// suppress the preview on certain scrub states; registering this listener
/// first restores the classic behavior.
pub struct ShowOnScrub;

impl PreviewChangeListener for ShowOnScrub {
    fn on_start_preview(&self, bar: &mut PreviewTimeBar) {
        bar.show_preview();
    }

    fn on_stop_preview(&self, bar: &mut PreviewTimeBar) {
        bar.hide_preview();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;
    impl PreviewChangeListener for Tag {}

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let mut set = ListenerSet::default();
        let listener: Arc<dyn PreviewChangeListener> = Arc::new(Tag);
        set.add(listener.clone());
        set.add(listener.clone());
        assert_eq!(set.len(), 2);

        let snapshot = set.snapshot();
        assert!(Arc::ptr_eq(&snapshot[0], &listener));
        assert!(Arc::ptr_eq(&snapshot[1], &listener));
    }

    #[test]
    fn test_remove_drops_first_match_only() {
        let mut set = ListenerSet::default();
        let listener: Arc<dyn PreviewChangeListener> = Arc::new(Tag);
        set.add(listener.clone());
        set.add(listener.clone());

        set.remove(&listener);
        assert_eq!(set.len(), 1);

        set.remove(&listener);
        assert_eq!(set.len(), 0);

        // Removing from an empty set is fine.
        set.remove(&listener);
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut set = ListenerSet::default();
        let listener: Arc<dyn PreviewChangeListener> = Arc::new(Tag);
        set.add(listener.clone());

        let snapshot = set.snapshot();
        set.remove(&listener);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(set.len(), 0);
    }
}

//! Preview time bar - the seek-bar-facing host control.
//!
//! Adapts raw scrub callbacks into delegate operations, mirrors the
//! timeline's progress pair, resolves the preview container on layout
//! passes, and fans preview lifecycle events out to registered listeners.
//!
//! Fan-out discipline: position is committed first, then listeners are
//! notified over a snapshot of the registration list. Cancellation does not
//! roll back position - scrub-stop commits whatever position it was given.

use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::timebar_events::{ListenerSet, PreviewChangeListener, ScrubListener};
use crate::color::{Color, ColorRes, Palette, DEFAULT_TINT};
use crate::core::delegate::PreviewDelegate;
use crate::core::loader::PreviewLoader;
use crate::view::{find_container, ParentView, SharedSurface, ViewId};

/// Scrub gesture state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrubState {
    #[default]
    Idle,
    Scrubbing,
}

/// Construction-time styling attributes, resolved once
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeBarStyle {
    /// Sibling id of the preview container; `None` means no container is
    /// declared and attachment never resolves
    pub container_id: Option<ViewId>,
    /// Inherited default tint (the scrubber accent color)
    pub tint: Color,
    /// Optional override tint; wins over `tint` when set
    pub tint_override: Option<Color>,
    /// Theme color table for resource tints
    pub palette: Palette,
}

impl Default for TimeBarStyle {
    fn default() -> Self {
        Self {
            container_id: None,
            tint: DEFAULT_TINT,
            tint_override: None,
            palette: Palette::default(),
        }
    }
}

impl TimeBarStyle {
    /// Effective initial tint: override beats the inherited default
    fn resolve_tint(&self) -> Color {
        self.tint_override.unwrap_or(self.tint)
    }
}

/// Seek-bar adapter owning the preview delegate and the listener set
pub struct PreviewTimeBar {
    delegate: PreviewDelegate,
    listeners: ListenerSet,
    scrub_state: ScrubState,
    scrub_progress: i64,
    duration: i64,
    enabled: bool,
    container_id: Option<ViewId>,
    default_tint: Color,
}

impl PreviewTimeBar {
    /// Build from construction-time style attributes
    pub fn new(style: TimeBarStyle) -> Self {
        let tint = style.resolve_tint();
        Self {
            delegate: PreviewDelegate::new(tint, style.palette),
            listeners: ListenerSet::default(),
            scrub_state: ScrubState::Idle,
            scrub_progress: 0,
            duration: 0,
            enabled: true,
            container_id: style.container_id,
            default_tint: tint,
        }
    }

    // ========== Embedding application contract ==========

    /// Replace the preview loader; effective from the next show/update
    pub fn set_preview_loader(&mut self, loader: Box<dyn PreviewLoader>) {
        self.delegate.set_loader(loader);
    }

    /// Bind a preview container directly, bypassing layout lookup.
    /// No-op once a container is attached.
    pub fn attach_preview_container(&mut self, surface: SharedSurface) {
        self.delegate.attach_container(surface);
    }

    /// Tint the preview surface chrome
    pub fn set_preview_color_tint(&mut self, color: Color) {
        self.delegate.set_tint(color);
    }

    /// Tint the preview surface chrome from a theme color resource
    pub fn set_preview_color_resource_tint(&mut self, res: ColorRes) {
        self.delegate.set_resource_tint(res);
    }

    /// True iff the container is attached and the preview is visible
    pub fn is_showing_preview(&self) -> bool {
        self.delegate.is_setup() && self.delegate.is_showing()
    }

    /// Reveal the preview at the current scrub position
    pub fn show_preview(&mut self) {
        if self.enabled {
            self.delegate.show(self.scrub_progress, self.duration);
        }
    }

    /// Hide the preview
    pub fn hide_preview(&mut self) {
        if self.enabled {
            self.delegate.hide();
        }
    }

    /// Register a listener; duplicates are permitted and notified once per
    /// registration
    pub fn add_preview_change_listener(&mut self, listener: Arc<dyn PreviewChangeListener>) {
        self.listeners.add(listener);
    }

    /// Remove the first registration of `listener`
    pub fn remove_preview_change_listener(&mut self, listener: &Arc<dyn PreviewChangeListener>) {
        self.listeners.remove(listener);
    }

    /// Construction-resolved scrubber tint
    pub fn default_tint(&self) -> Color {
        self.default_tint
    }

    // ========== Timeline widget mirrors ==========

    /// Enable or disable both the bar and its preview
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.delegate.set_enabled(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Mirror the timeline duration (the max of the progress pair)
    pub fn set_duration(&mut self, duration: i64) {
        self.duration = duration;
    }

    /// Mirror an externally set position
    pub fn set_position(&mut self, position: i64) {
        self.scrub_progress = position;
    }

    /// Current scrub position: mid-drag while scrubbing, last committed
    /// otherwise
    pub fn progress(&self) -> i64 {
        self.scrub_progress
    }

    /// Mirrored duration
    pub fn max_position(&self) -> i64 {
        self.duration
    }

    pub fn scrub_state(&self) -> ScrubState {
        self.scrub_state
    }

    // ========== Layout coupling ==========

    /// External "layout settled" signal.
    ///
    /// Retries the container lookup among the parent's direct children until
    /// the first success, but only once the bar has nonzero dimensions. Also
    /// pumps pending frame deliveries, so a per-frame `on_layout` call is
    /// enough to drive the whole coordinator.
    pub fn on_layout(&mut self, width: u32, height: u32, parent: &dyn ParentView) {
        if !self.delegate.is_setup()
            && width != 0
            && height != 0
            && let Some(id) = self.container_id
            && let Some(surface) = find_container(parent, id)
        {
            debug!("resolved preview container {:?}", id);
            self.delegate.attach_container(surface);
        }
        self.pump();
    }

    /// Drain pending frame deliveries onto the surface. UI thread only.
    pub fn pump(&mut self) {
        self.delegate.pump();
    }

    // ========== Fan-out ==========

    fn notify(&mut self, f: impl Fn(&dyn PreviewChangeListener, &mut Self)) {
        for listener in self.listeners.snapshot() {
            f(listener.as_ref(), self);
        }
    }
}

impl ScrubListener for PreviewTimeBar {
    fn on_scrub_start(&mut self, position: i64) {
        self.scrub_progress = position;
        self.scrub_state = ScrubState::Scrubbing;
        debug!("scrub start at {}", position);
        self.notify(|listener, bar| listener.on_start_preview(bar));
    }

    fn on_scrub_move(&mut self, position: i64) {
        self.scrub_progress = position;
        self.delegate.update(position, self.duration);
        trace!("scrub move to {}", position);
        self.notify(move |listener, bar| listener.on_preview(bar, position, true));
    }

    fn on_scrub_stop(&mut self, position: i64, canceled: bool) {
        // Committed regardless of cancellation.
        self.scrub_progress = position;
        self.scrub_state = ScrubState::Idle;
        debug!("scrub stop at {} (canceled: {})", position, canceled);
        self.notify(|listener, bar| listener.on_stop_preview(bar));
    }
}

impl std::fmt::Debug for PreviewTimeBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewTimeBar")
            .field("delegate", &self.delegate)
            .field("listeners", &self.listeners.len())
            .field("scrub_state", &self.scrub_state)
            .field("progress", &self.scrub_progress)
            .field("duration", &self.duration)
            .field("enabled", &self.enabled)
            .finish()
    }
}

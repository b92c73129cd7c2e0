//! Preview visibility, attachment, and loader mediation.
//!
//! **Architecture**: the delegate does NOT hold a back-reference to the host
//! bar. Position-dependent operations receive the progress pair from the
//! host's bookkeeping (`show(position, max)`, `update(position, max)`),
//! which breaks the view<->delegate cycle of retained widget trees.
//!
//! **Policy**: every failure mode is an absorbed steady state, never an
//! error. A missing loader, an unresolved container, or a disabled bar all
//! degrade to silent no-ops; the log carries what the API does not.
//!
//! # Attachment
//!
//! The container is bound at most once per widget lifetime. The first
//! successful `attach_container` wins; later offers are ignored.
//!
//! # Frame delivery
//!
//! Loader answers arrive through an internal channel and are applied by
//! `pump()` on the UI thread. Only the newest request's ticket is live;
//! anything else is dropped on arrival.

use crossbeam_channel::Receiver;
use log::{debug, trace, warn};

use crate::color::{Color, ColorRes, Palette};
use crate::core::loader::{
    delivery_channel, FrameDelivery, FrameRequest, FrameSink, FrameTicket, PreviewLoader,
};
use crate::view::{PreviewSurface, SharedSurface};

/// Preview state owner: attachment, visibility, enabled flag, tint
pub struct PreviewDelegate {
    surface: Option<SharedSurface>,
    loader: Option<Box<dyn PreviewLoader>>,
    enabled: bool,
    visible: bool,
    tint: Color,
    palette: Palette,
    issued: u64,
    live: Option<FrameTicket>,
    sink: FrameSink,
    inbox: Receiver<FrameDelivery>,
}

impl PreviewDelegate {
    /// Create a delegate with the construction-resolved tint and theme
    /// palette
    pub fn new(tint: Color, palette: Palette) -> Self {
        let (sink, inbox) = delivery_channel();
        Self {
            surface: None,
            loader: None,
            enabled: true,
            visible: false,
            tint,
            palette,
            issued: 0,
            live: None,
            sink,
            inbox,
        }
    }

    /// Bind `surface` as the permanent preview container.
    ///
    /// The first successful call wins for the lifetime of the widget; later
    /// calls are no-ops. The stored tint and the current visibility flag are
    /// applied to the surface on bind.
    pub fn attach_container(&mut self, surface: SharedSurface) {
        if self.surface.is_some() {
            trace!("preview container already attached, ignoring");
            return;
        }
        {
            let mut guard = surface.lock().unwrap_or_else(|e| e.into_inner());
            guard.set_tint(self.tint);
            guard.set_visible(self.visible);
        }
        self.surface = Some(surface);
        debug!("preview container attached");
    }

    /// Replace the active loader.
    ///
    /// Takes effect on the next `show`/`update`; an in-flight load keeps its
    /// ticket and delivers (or not) as before.
    pub fn set_loader(&mut self, loader: Box<dyn PreviewLoader>) {
        self.loader = Some(loader);
    }

    /// Enable or disable the preview. Disabling while showing hides first;
    /// re-enabling does not re-show.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.visible {
            self.hide_now();
        }
        if self.enabled != enabled {
            debug!("preview {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    /// Reveal the preview at `position` of `max` and request a frame.
    ///
    /// No-op while disabled. Without a loader the visibility flag stays
    /// false: an empty surface is not "showing".
    pub fn show(&mut self, position: i64, max: i64) {
        if !self.enabled {
            return;
        }
        if self.loader.is_none() {
            trace!("show ignored: no preview loader set");
            return;
        }
        self.visible = true;
        self.with_surface(|s| {
            s.set_progress(position, max);
            s.set_visible(true);
        });
        self.request(position, max);
        debug!("preview shown at {}/{}", position, max);
    }

    /// Track a scrub move: reposition the surface against the new progress
    /// pair and request a fresh frame. No-op while hidden or disabled.
    pub fn update(&mut self, position: i64, max: i64) {
        if !self.enabled || !self.visible {
            return;
        }
        self.with_surface(|s| s.set_progress(position, max));
        self.request(position, max);
    }

    /// Hide the preview. No-op while disabled; safe to call when already
    /// hidden.
    pub fn hide(&mut self) {
        if !self.enabled {
            return;
        }
        self.hide_now();
    }

    fn hide_now(&mut self) {
        if self.live.take().is_some() {
            trace!("retired live frame ticket");
        }
        if self.visible {
            debug!("preview hidden");
        }
        self.visible = false;
        self.with_surface(|s| s.set_visible(false));
    }

    /// Visibility flag, regardless of attachment
    pub fn is_showing(&self) -> bool {
        self.visible
    }

    /// True once attachment has been resolved
    pub fn is_setup(&self) -> bool {
        self.surface.is_some()
    }

    /// Current tint of the preview surface chrome
    pub fn tint(&self) -> Color {
        self.tint
    }

    /// Update the stored tint and retint the attached surface
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
        self.with_surface(|s| s.set_tint(tint));
    }

    /// Resolve `res` through the theme palette and apply it as the tint.
    /// Unknown resources keep the current tint.
    pub fn set_resource_tint(&mut self, res: ColorRes) {
        match self.palette.resolve(res) {
            Some(color) => self.set_tint(color),
            None => warn!("unknown color resource {:?}, keeping current tint", res),
        }
    }

    /// Drain pending frame deliveries and apply the ones whose ticket is
    /// still live. Call once per host tick, on the UI thread.
    pub fn pump(&mut self) {
        while let Ok(delivery) = self.inbox.try_recv() {
            if Some(delivery.ticket) != self.live {
                trace!("dropped stale preview frame for position {}", delivery.position);
                continue;
            }
            if self.surface.is_some() {
                trace!("applied preview frame for position {}", delivery.position);
                let frame = delivery.frame;
                self.with_surface(move |s| s.set_frame(frame));
            } else {
                warn!(
                    "preview frame for position {} arrived before any container",
                    delivery.position
                );
            }
        }
    }

    /// Issue a loader request stamped with a fresh ticket
    fn request(&mut self, position: i64, max: i64) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        self.issued += 1;
        let ticket = FrameTicket(self.issued);
        self.live = Some(ticket);
        trace!("requesting preview frame for {}/{} ({:?})", position, max, ticket);
        loader.load_preview(FrameRequest::new(position, max, ticket, self.sink.clone()));
    }

    /// Run `f` against the attached surface, if any
    fn with_surface(&self, f: impl FnOnce(&mut dyn PreviewSurface)) {
        if let Some(surface) = &self.surface {
            let mut guard = surface.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut *guard);
        }
    }
}

impl std::fmt::Debug for PreviewDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewDelegate")
            .field("attached", &self.surface.is_some())
            .field("has_loader", &self.loader.is_some())
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .field("tint", &self.tint)
            .field("live", &self.live)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::PreviewFrame;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSurface {
        visible: bool,
        tint: Option<Color>,
        progress: Option<(i64, i64)>,
        frames: Vec<i64>,
    }

    impl PreviewSurface for RecordingSurface {
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }
        fn set_tint(&mut self, tint: Color) {
            self.tint = Some(tint);
        }
        fn set_progress(&mut self, position: i64, max: i64) {
            self.progress = Some((position, max));
        }
        fn set_frame(&mut self, frame: PreviewFrame) {
            self.frames.push(frame.width as i64);
        }
    }

    fn recording_surface() -> (Arc<Mutex<RecordingSurface>>, SharedSurface) {
        let surface = Arc::new(Mutex::new(RecordingSurface::default()));
        let shared: SharedSurface = surface.clone();
        (surface, shared)
    }

    /// Loader that parks every request for the test to answer later
    fn parking_loader() -> (Arc<Mutex<Vec<FrameRequest>>>, Box<dyn PreviewLoader>) {
        let requests: Arc<Mutex<Vec<FrameRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let inner = Arc::clone(&requests);
        let loader = move |request: FrameRequest| inner.lock().unwrap().push(request);
        (requests, Box::new(loader))
    }

    fn delegate() -> PreviewDelegate {
        PreviewDelegate::new(Color::WHITE, Palette::new())
    }

    #[test]
    fn test_hidden_after_construction() {
        let delegate = delegate();
        assert!(!delegate.is_showing());
        assert!(!delegate.is_setup());
    }

    #[test]
    fn test_show_without_loader_stays_hidden() {
        let (_surface, shared) = recording_surface();
        let mut delegate = delegate();
        delegate.attach_container(shared);

        delegate.show(100, 1000);

        assert!(!delegate.is_showing());
    }

    #[test]
    fn test_show_reveals_surface_and_requests_frame() {
        let (surface, shared) = recording_surface();
        let (requests, loader) = parking_loader();
        let mut delegate = delegate();
        delegate.attach_container(shared);
        delegate.set_loader(loader);

        delegate.show(200, 1000);

        assert!(delegate.is_showing());
        {
            let s = surface.lock().unwrap();
            assert!(s.visible);
            assert_eq!(s.progress, Some((200, 1000)));
        }
        let reqs = requests.lock().unwrap();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].position(), 200);
        assert_eq!(reqs[0].max_position(), 1000);
    }

    #[test]
    fn test_hide_is_idempotent() {
        let (surface, shared) = recording_surface();
        let (_requests, loader) = parking_loader();
        let mut delegate = delegate();
        delegate.attach_container(shared);
        delegate.set_loader(loader);

        delegate.hide();
        assert!(!delegate.is_showing());

        delegate.show(10, 100);
        delegate.hide();
        delegate.hide();
        assert!(!delegate.is_showing());
        assert!(!surface.lock().unwrap().visible);
    }

    #[test]
    fn test_disable_while_showing_forces_hide() {
        let (surface, shared) = recording_surface();
        let (_requests, loader) = parking_loader();
        let mut delegate = delegate();
        delegate.attach_container(shared);
        delegate.set_loader(loader);

        delegate.show(10, 100);
        assert!(delegate.is_showing());

        delegate.set_enabled(false);
        assert!(!delegate.is_showing());
        assert!(!surface.lock().unwrap().visible);

        // Re-enable must not re-show, and disabled show is a no-op.
        delegate.set_enabled(true);
        assert!(!delegate.is_showing());
        delegate.set_enabled(false);
        delegate.show(10, 100);
        assert!(!delegate.is_showing());
    }

    #[test]
    fn test_attach_is_resolve_once() {
        let (first, shared_first) = recording_surface();
        let (second, shared_second) = recording_surface();
        let (_requests, loader) = parking_loader();
        let mut delegate = delegate();
        delegate.set_loader(loader);

        delegate.attach_container(shared_first);
        delegate.attach_container(shared_second);
        assert!(delegate.is_setup());

        delegate.show(1, 10);
        assert!(first.lock().unwrap().visible);
        assert!(!second.lock().unwrap().visible);
    }

    #[test]
    fn test_attach_applies_tint() {
        let (surface, shared) = recording_surface();
        let mut delegate = PreviewDelegate::new(Color::from_rgb(1, 2, 3), Palette::new());
        delegate.attach_container(shared);
        assert_eq!(surface.lock().unwrap().tint, Some(Color::from_rgb(1, 2, 3)));
    }

    #[test]
    fn test_resource_tint_through_palette() {
        let (surface, shared) = recording_surface();
        let palette = Palette::new().with(ColorRes(4), Color::from_rgb(9, 9, 9));
        let mut delegate = PreviewDelegate::new(Color::WHITE, palette);
        delegate.attach_container(shared);

        delegate.set_resource_tint(ColorRes(4));
        assert_eq!(delegate.tint(), Color::from_rgb(9, 9, 9));
        assert_eq!(surface.lock().unwrap().tint, Some(Color::from_rgb(9, 9, 9)));

        // Unknown resource keeps the current tint.
        delegate.set_resource_tint(ColorRes(999));
        assert_eq!(delegate.tint(), Color::from_rgb(9, 9, 9));
    }

    #[test]
    fn test_stale_frame_is_dropped() {
        let (surface, shared) = recording_surface();
        let (requests, loader) = parking_loader();
        let mut delegate = delegate();
        delegate.attach_container(shared);
        delegate.set_loader(loader);

        delegate.show(100, 1000);
        delegate.update(150, 1000);

        // Answer the superseded request first, then the live one.
        let reqs = requests.lock().unwrap();
        reqs[0].deliver(PreviewFrame::solid(1, 1, Color::WHITE));
        delegate.pump();
        assert!(surface.lock().unwrap().frames.is_empty());

        reqs[1].deliver(PreviewFrame::solid(2, 1, Color::WHITE));
        delegate.pump();
        assert_eq!(surface.lock().unwrap().frames, vec![2]);
    }

    #[test]
    fn test_frame_after_hide_is_dropped() {
        let (surface, shared) = recording_surface();
        let (requests, loader) = parking_loader();
        let mut delegate = delegate();
        delegate.attach_container(shared);
        delegate.set_loader(loader);

        delegate.show(100, 1000);
        delegate.hide();

        requests.lock().unwrap()[0].deliver(PreviewFrame::solid(1, 1, Color::WHITE));
        delegate.pump();
        assert!(surface.lock().unwrap().frames.is_empty());
    }

    #[test]
    fn test_update_while_hidden_is_noop() {
        let (surface, shared) = recording_surface();
        let (requests, loader) = parking_loader();
        let mut delegate = delegate();
        delegate.attach_container(shared);
        delegate.set_loader(loader);

        delegate.update(100, 1000);
        assert!(requests.lock().unwrap().is_empty());
        assert!(surface.lock().unwrap().progress.is_none());
    }

    #[test]
    fn test_loader_swap_takes_effect_on_next_request() {
        let (_surface, shared) = recording_surface();
        let (first_requests, first_loader) = parking_loader();
        let (second_requests, second_loader) = parking_loader();
        let mut delegate = delegate();
        delegate.attach_container(shared);

        delegate.set_loader(first_loader);
        delegate.show(10, 100);
        assert_eq!(first_requests.lock().unwrap().len(), 1);

        delegate.set_loader(second_loader);
        delegate.update(20, 100);
        assert_eq!(first_requests.lock().unwrap().len(), 1);
        assert_eq!(second_requests.lock().unwrap().len(), 1);
    }
}

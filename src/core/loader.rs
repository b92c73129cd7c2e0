//! Loader contract and the frame-delivery channel.
//!
//! The loader is the only asynchronous boundary in the crate. Each request
//! carries a clonable sink; loader workers deliver frames out-of-band from
//! any thread, and the delegate drains the receiving side on the UI thread
//! (`PreviewDelegate::pump`).
//!
//! Requests are stamped with a monotonic [`FrameTicket`]. The delegate keeps
//! only the newest ticket live, so frames that arrive after a newer request
//! (or after the preview was hidden) are discarded on arrival instead of
//! overwriting the surface with stale content.

use crossbeam_channel::{Receiver, Sender};
use log::trace;
use std::sync::Arc;

use crate::color::Color;

/// Monotonic tag identifying the newest loader request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTicket(pub(crate) u64);

/// Opaque preview image payload: RGBA8 pixels, shared so repeated deliveries
/// and surface handoffs stay cheap
#[derive(Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl PreviewFrame {
    pub fn new(width: u32, height: u32, rgba: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            rgba: rgba.into(),
        }
    }

    /// Single-color stand-in, for loaders that answer before the real image
    /// is ready
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let rgba = [color.r, color.g, color.b, color.a].repeat((width * height) as usize);
        Self::new(width, height, rgba)
    }
}

impl std::fmt::Debug for PreviewFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Delivery envelope crossing the thread boundary
#[derive(Clone, Debug)]
pub(crate) struct FrameDelivery {
    pub(crate) ticket: FrameTicket,
    pub(crate) position: i64,
    pub(crate) frame: PreviewFrame,
}

/// Sending half of the delivery channel, cloned into every request
#[derive(Clone, Debug)]
pub struct FrameSink {
    tx: Sender<FrameDelivery>,
}

impl FrameSink {
    // A closed channel means the bar is gone; nothing left to update.
    pub(crate) fn send(&self, delivery: FrameDelivery) {
        let _ = self.tx.send(delivery);
    }
}

/// Create the sink/inbox pair owned by a delegate
pub(crate) fn delivery_channel() -> (FrameSink, Receiver<FrameDelivery>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (FrameSink { tx }, rx)
}

/// One preview request, owning everything a loader needs to answer
/// out-of-band
#[derive(Clone, Debug)]
pub struct FrameRequest {
    position: i64,
    max_position: i64,
    ticket: FrameTicket,
    sink: FrameSink,
}

impl FrameRequest {
    pub(crate) fn new(position: i64, max_position: i64, ticket: FrameTicket, sink: FrameSink) -> Self {
        Self {
            position,
            max_position,
            ticket,
            sink,
        }
    }

    /// Requested position within `[0, max_position]`
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Timeline duration at request time
    pub fn max_position(&self) -> i64 {
        self.max_position
    }

    /// Tag of this request; stale tickets are dropped by the delegate
    pub fn ticket(&self) -> FrameTicket {
        self.ticket
    }

    /// Deliver a frame for this request.
    ///
    /// May be called zero or more times, from any thread. The frame is
    /// marshaled onto the UI thread and applied on the next pump if this
    /// request is still the live one.
    pub fn deliver(&self, frame: PreviewFrame) {
        trace!(
            "frame delivered for position {} ({:?}, {}x{})",
            self.position, self.ticket, frame.width, frame.height
        );
        self.sink.send(FrameDelivery {
            ticket: self.ticket,
            position: self.position,
            frame,
        });
    }
}

/// Supplies preview images for requested positions, asynchronously.
///
/// Failures are the loader's private concern: deliver a frame, or silently
/// don't. The coordinator never retries and never times out.
pub trait PreviewLoader: Send {
    fn load_preview(&mut self, request: FrameRequest);
}

// Closures work as loaders, same as boxed jobs elsewhere.
impl<F> PreviewLoader for F
where
    F: FnMut(FrameRequest) + Send,
{
    fn load_preview(&mut self, request: FrameRequest) {
        self(request);
    }
}

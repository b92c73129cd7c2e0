//! View-tree interface boundary: ids, sibling lookup, preview surface.
//!
//! The coordinator never talks to a concrete layout tree. The embedding
//! toolkit adapts its parent/child structure to these traits and signals
//! "layout settled" through `PreviewTimeBar::on_layout`, which retries the
//! container lookup until the first success.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::core::loader::PreviewFrame;

/// Identifier of a view within its parent container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u32);

/// Surface hosting the rendered preview image during a scrub.
///
/// Implemented by the embedding application for its container widget.
/// All calls arrive on the UI thread.
pub trait PreviewSurface: Send {
    /// Show or hide the surface
    fn set_visible(&mut self, visible: bool);

    /// Tint for the surface chrome (border, scrubber accent) - never applied
    /// to decoded image content
    fn set_tint(&mut self, tint: Color);

    /// Mirror of the timeline progress pair, so the surface can position and
    /// size itself against the bar
    fn set_progress(&mut self, position: i64, max: i64);

    /// Replace the displayed preview image
    fn set_frame(&mut self, frame: PreviewFrame);
}

/// Shared handle to a preview surface. Locked only from the UI thread.
pub type SharedSurface = Arc<Mutex<dyn PreviewSurface>>;

/// Direct child of the host's parent container, as seen during attachment
/// lookup
pub trait SiblingView {
    fn view_id(&self) -> ViewId;

    /// `Some` when this sibling is a preview container; `None` for any other
    /// kind of view
    fn as_preview_container(&self) -> Option<SharedSurface>;
}

/// Immediate parent container of the host control
pub trait ParentView {
    fn child_count(&self) -> usize;
    fn child_at(&self, index: usize) -> &dyn SiblingView;
}

/// Search the parent's direct children for a preview container with `id`.
/// Both the id and the kind must match; anything else is skipped.
pub(crate) fn find_container(parent: &dyn ParentView, id: ViewId) -> Option<SharedSurface> {
    for i in 0..parent.child_count() {
        let child = parent.child_at(i);
        if child.view_id() == id
            && let Some(surface) = child.as_preview_container()
        {
            return Some(surface);
        }
    }
    None
}

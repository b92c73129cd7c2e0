//! Standalone scrub simulation for development and testing.
//!
//! Drives a scripted scrub gesture against a worker-thread loader and a
//! logging surface, printing the preview lifecycle as it happens. Useful for
//! watching the attachment handshake, frame marshaling, and stale-frame
//! drops without a GUI host.

use clap::Parser;
use log::info;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use peekbar::{
    Color, FrameRequest, ParentView, PreviewFrame, PreviewLoader, PreviewSurface, PreviewTimeBar,
    ScrubListener, SharedSurface, ShowOnScrub, SiblingView, TimeBarStyle, ViewId,
};

/// Scrub-preview coordinator demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Timeline duration in milliseconds
    #[arg(long = "duration", value_name = "MS", default_value_t = 10_000)]
    duration: i64,

    /// Number of scrub-move steps between start and stop
    #[arg(long = "steps", value_name = "N", default_value_t = 8)]
    steps: i64,

    /// Simulated loader latency per frame
    #[arg(long = "latency", value_name = "MS", default_value_t = 40)]
    latency_ms: u64,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp_millis()
        .init();
}

/// Surface that narrates everything the coordinator does to it
struct ConsoleSurface;

impl PreviewSurface for ConsoleSurface {
    fn set_visible(&mut self, visible: bool) {
        info!("[surface] visible = {}", visible);
    }

    fn set_tint(&mut self, tint: Color) {
        info!("[surface] tint = #{:02x}{:02x}{:02x}", tint.r, tint.g, tint.b);
    }

    fn set_progress(&mut self, position: i64, max: i64) {
        info!("[surface] progress {}/{}", position, max);
    }

    fn set_frame(&mut self, frame: PreviewFrame) {
        info!("[surface] frame {}x{}", frame.width, frame.height);
    }
}

/// Loader that answers every request from a short-lived worker thread,
/// shading the frame by position so deliveries are distinguishable
struct ThreadedLoader {
    latency: Duration,
}

impl PreviewLoader for ThreadedLoader {
    fn load_preview(&mut self, request: FrameRequest) {
        let latency = self.latency;
        thread::spawn(move || {
            thread::sleep(latency);
            let shade = (request.position() * 255 / request.max_position().max(1)) as u8;
            request.deliver(PreviewFrame::solid(160, 90, Color::from_gray(shade)));
        });
    }
}

struct DemoChild {
    id: ViewId,
    surface: Option<SharedSurface>,
}

impl SiblingView for DemoChild {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn as_preview_container(&self) -> Option<SharedSurface> {
        self.surface.clone()
    }
}

struct DemoParent {
    children: Vec<DemoChild>,
}

impl ParentView for DemoParent {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_at(&self, index: usize) -> &dyn SiblingView {
        &self.children[index]
    }
}

fn main() {
    init_logger();
    let args = Args::parse();

    let surface: SharedSurface = Arc::new(Mutex::new(ConsoleSurface));
    let parent = DemoParent {
        children: vec![
            DemoChild { id: ViewId(5), surface: None },
            DemoChild { id: ViewId(7), surface: Some(surface) },
        ],
    };

    let mut bar = PreviewTimeBar::new(TimeBarStyle {
        container_id: Some(ViewId(7)),
        tint: Color::from_rgb(220, 160, 60),
        ..TimeBarStyle::default()
    });
    bar.set_duration(args.duration);
    bar.set_preview_loader(Box::new(ThreadedLoader {
        latency: Duration::from_millis(args.latency_ms),
    }));
    bar.add_preview_change_listener(Arc::new(ShowOnScrub));

    // First layout pass resolves the container among the siblings.
    bar.on_layout(640, 48, &parent);

    let start = args.duration / 4;
    let end = args.duration * 3 / 4;
    info!("scrubbing {} -> {} over {} steps", start, end, args.steps);

    bar.on_scrub_start(start);
    for step in 1..=args.steps {
        let position = start + (end - start) * step / args.steps.max(1);
        bar.on_scrub_move(position);
        thread::sleep(Duration::from_millis(args.latency_ms * 3 / 2));
        bar.on_layout(640, 48, &parent);
    }
    bar.on_scrub_stop(end, false);

    // Anything still in flight is stale now and gets dropped on arrival.
    thread::sleep(Duration::from_millis(args.latency_ms * 2));
    bar.pump();

    info!(
        "done: position {}/{}, showing = {}",
        bar.progress(),
        bar.max_position(),
        bar.is_showing_preview()
    );
}

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// The host rendering surface the grid and viewer draw into.
///
/// Implementations wrap whatever the host uses (a widget tree, a canvas, a
/// native view); the core only needs the container width and control over
/// background scrolling while the viewer is open.
pub trait HostSurface: Send + Sync {
    /// Content width of the grid container, or `None` if it does not exist.
    fn container_width(&self) -> Option<f32>;

    /// Enables or disables scrolling of the grid behind the viewer.
    fn set_background_scroll(&self, enabled: bool);
}

/// A surface with no pixels, used by the headless host and in tests.
#[derive(Debug)]
pub struct HeadlessSurface {
    width: Mutex<Option<f32>>,
    background_scroll: AtomicBool,
}

impl HeadlessSurface {
    pub fn new(width: f32) -> Self {
        Self {
            width: Mutex::new(Some(width)),
            background_scroll: AtomicBool::new(true),
        }
    }

    /// A surface whose container has not been created.
    pub fn detached() -> Self {
        Self {
            width: Mutex::new(None),
            background_scroll: AtomicBool::new(true),
        }
    }

    pub fn set_width(&self, width: f32) {
        *self.width.lock() = Some(width);
    }

    pub fn background_scroll(&self) -> bool {
        self.background_scroll.load(Ordering::Relaxed)
    }
}

impl HostSurface for HeadlessSurface {
    fn container_width(&self) -> Option<f32> {
        *self.width.lock()
    }

    fn set_background_scroll(&self, enabled: bool) {
        self.background_scroll.store(enabled, Ordering::Relaxed);
    }
}

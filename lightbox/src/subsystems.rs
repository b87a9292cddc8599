//! The smaller window-owned collaborators: the projection surface, the
//! global hotkey hook and the FPS monitor. Thin owners over machinery that
//! lives elsewhere; each one only needs to expose the operation its
//! shutdown step performs, guarded so a second call is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};

use lb_core::pt;

/// The secondary display surface used for projecting media.
#[derive(Default)]
pub struct Projection {
    open: AtomicBool,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Close and release the surface. Idempotent.
    pub fn close_and_release(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            pt!("Projection window closed");
        }
    }
}

/// System-wide hotkey registration.
#[derive(Default)]
pub struct GlobalHotkeys {
    registered: AtomicBool,
}

impl GlobalHotkeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) {
        self.registered.store(true, Ordering::SeqCst);
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Release the OS hook. Idempotent.
    pub fn release(&self) {
        if self.registered.swap(false, Ordering::SeqCst) {
            pt!("Global hotkeys released");
        }
    }
}

/// Frame-rate / performance monitor.
#[derive(Default)]
pub struct FpsMonitor {
    running: AtomicBool,
}

impl FpsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop and release. Idempotent.
    pub fn stop_and_release(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            pt!("FPS monitor stopped");
        }
    }
}

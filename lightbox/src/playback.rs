//! The video playback collaborator.
//!
//! The actual decoding/rendering lives behind OS-level machinery that is
//! none of this layer's business; what matters here is the event
//! subscription surface and the teardown contract. Listeners get a handle
//! at subscription time and every handle is dropped before the player is,
//! so no callback can fire into a window that is already going away.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use lb_core::observe::{Observers, SubscriptionHandle};
use lb_core::pt;

#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    Opened(PathBuf),
    Playing,
    Paused,
    PositionChanged(Duration),
    EndReached,
}

#[derive(Default)]
struct PlayerState {
    observers: Observers<PlaybackEvent>,
    playing: bool,
    released: bool,
}

/// Owned by the main window for its whole lifetime; interior mutability so
/// shutdown steps can share it.
#[derive(Default)]
pub struct VideoPlayer {
    state: Mutex<PlayerState>,
}

impl VideoPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&PlaybackEvent) + Send + 'static,
    {
        match self.state.lock() {
            Ok(mut state) => state.observers.subscribe(callback),
            Err(poisoned) => poisoned.into_inner().observers.subscribe(callback),
        }
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.with_state(|state| state.observers.unsubscribe(handle))
    }

    /// Drop every listener. First step of teardown, before `stop`.
    pub fn unsubscribe_all(&self) -> usize {
        let dropped = self.with_state(|state| state.observers.unsubscribe_all());
        if dropped > 0 {
            pt!("Dropped {dropped} playback listeners");
        }
        dropped
    }

    pub fn emit(&self, event: &PlaybackEvent) {
        if let Ok(state) = self.state.lock() {
            state.observers.emit(event);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.with_state(|state| state.playing)
    }

    pub fn play(&self) {
        self.with_state(|state| {
            if !state.released {
                state.playing = true;
            }
        });
        self.emit(&PlaybackEvent::Playing);
    }

    /// Stop playback and release the underlying player. Second call is a
    /// no-op.
    pub fn stop_and_release(&self) {
        let first = self.with_state(|state| {
            if state.released {
                return false;
            }
            state.playing = false;
            state.released = true;
            true
        });
        if first {
            pt!("Video player stopped and released");
        }
    }

    pub fn listener_count(&self) -> usize {
        self.with_state(|state| state.observers.len())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut PlayerState) -> T) -> T {
        match self.state.lock() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn unsubscribed_listeners_stop_firing() {
        let player = VideoPlayer::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let handle = {
            let hits = hits.clone();
            player.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        player.emit(&PlaybackEvent::Playing);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(player.unsubscribe(handle));
        player.emit(&PlaybackEvent::Playing);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_is_single_shot() {
        lb_core::print::set_print(false);
        let player = VideoPlayer::new();
        player.play();
        assert!(player.is_playing());

        player.stop_and_release();
        assert!(!player.is_playing());

        // Second release is a no-op, and a released player won't play.
        player.stop_and_release();
        player.play();
        assert!(!player.is_playing());
    }
}

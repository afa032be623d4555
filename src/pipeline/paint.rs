//! Paint-frame signalling between the host and the async driver.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How a paint wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintSignal {
    Settled,
    /// The fallback timer fired before enough frames were painted.
    TimedOut,
}

/// A frame counter the host advances after every paint.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frames: Arc<watch::Sender<u64>>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let (frames, _) = watch::channel(0);
        Self {
            frames: Arc::new(frames),
        }
    }

    /// Signals that one more frame has been painted. Returns the new count.
    pub fn tick(&self) -> u64 {
        self.frames.send_modify(|frame| *frame = frame.saturating_add(1));
        self.frame()
    }

    pub fn frame(&self) -> u64 {
        *self.frames.borrow()
    }

    /// Waits until `frames` more frames have been painted, or `timeout` elapses.
    pub async fn wait_frames(&self, frames: u64, timeout: Duration) -> PaintSignal {
        self.wait_from(self.frame(), frames, timeout).await
    }

    /// Like [`FrameClock::wait_frames`], counting from `baseline` instead of
    /// the current frame. Ticks that land between reading the baseline and
    /// awaiting still count.
    pub async fn wait_from(&self, baseline: u64, frames: u64, timeout: Duration) -> PaintSignal {
        let mut rx = self.frames.subscribe();
        let target = baseline.saturating_add(frames);

        let settled = async move {
            loop {
                let frame = *rx.borrow_and_update();
                if frame >= target {
                    return;
                }
                if rx.changed().await.is_err() {
                    // The sender lives as long as any clone of the clock.
                    return;
                }
            }
        };

        match tokio::time::timeout(timeout, settled).await {
            Ok(()) => PaintSignal::Settled,
            Err(_) => {
                log::debug!("paint did not settle within {:?}", timeout);
                PaintSignal::TimedOut
            }
        }
    }
}

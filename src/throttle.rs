//! Fixed-delay request throttling.
//!
//! A naive rate limiter: after each page request or transfer attempt the
//! caller awaits a fixed pause. Nothing is shared, so a plain value is enough.

use std::time::Duration;

use tracing::trace;

use crate::config::ThrottleConfig;

/// Which pause to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// After a catalog page request.
    Page,
    /// After an artwork transfer attempt.
    Artwork,
    /// After an audio transfer attempt.
    Audio,
}

/// Sleeps the configured delay for each pause kind.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    config: ThrottleConfig,
}

impl Throttle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self { config }
    }

    /// Delay configured for a pause kind.
    pub fn delay(&self, pause: Pause) -> Duration {
        match pause {
            Pause::Page => self.config.page,
            Pause::Artwork => self.config.artwork,
            Pause::Audio => self.config.audio,
        }
    }

    /// Wait out the delay for `pause`. Zero delays return immediately.
    pub async fn pause(&self, pause: Pause) {
        let delay = self.delay(pause);
        if delay.is_zero() {
            return;
        }
        trace!("Throttle {:?}: sleeping {:?}", pause, delay);
        tokio::time::sleep(delay).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

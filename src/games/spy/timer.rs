//! Advisory discussion countdown.
//!
//! The timer owns no thread. Callers feed it elapsed time through
//! [`DiscussionTimer::tick`] and act on the event it returns.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Something the timer wants the caller to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Time is up; the table should make an accusation.
    AccusationDue,
}

/// Countdown for one discussion stretch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscussionTimer {
    remaining: Option<Duration>,
}

impl DiscussionTimer {
    /// Creates a stopped timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the countdown.
    pub fn start(&mut self, duration: Duration) {
        debug!(seconds = duration.as_secs(), "Countdown started");
        self.remaining = Some(duration);
    }

    /// Stops the countdown without firing.
    pub fn cancel(&mut self) {
        if self.remaining.take().is_some() {
            debug!("Countdown cancelled");
        }
    }

    /// True while counting down.
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Time left, if running.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Advances the countdown. Fires once, then stops.
    pub fn tick(&mut self, elapsed: Duration) -> Option<TimerEvent> {
        let left = self.remaining?.saturating_sub(elapsed);
        if left.is_zero() {
            self.remaining = None;
            info!("Discussion time is up");
            Some(TimerEvent::AccusationDue)
        } else {
            self.remaining = Some(left);
            None
        }
    }
}

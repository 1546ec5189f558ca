// SPDX-License-Identifier: MPL-2.0

//! Short-lived presentation signals (shutter flash, "capturing" badge)
//!
//! A signal is raised with a timestamp and reads as active until its fixed
//! duration has elapsed. Raising it again restarts the window. Signals never
//! block a capture.

use std::time::{Duration, Instant};

/// Signal that stays up for a fixed duration after being raised
#[derive(Debug, Clone, Copy)]
pub struct TransientSignal {
    duration: Duration,
    raised_at: Option<Instant>,
}

impl TransientSignal {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            raised_at: None,
        }
    }

    /// Raise (or re-raise) the signal at `now`
    pub fn raise(&mut self, now: Instant) {
        self.raised_at = Some(now);
    }

    /// Whether the signal is up at `now`
    pub fn is_active_at(&self, now: Instant) -> bool {
        self.raised_at
            .is_some_and(|at| now >= at && now.duration_since(at) < self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_window() {
        let start = Instant::now();
        let mut flash = TransientSignal::new(Duration::from_millis(150));
        assert!(!flash.is_active_at(start));

        flash.raise(start);
        assert!(flash.is_active_at(start));
        assert!(flash.is_active_at(start + Duration::from_millis(149)));
        assert!(!flash.is_active_at(start + Duration::from_millis(150)));
    }

    #[test]
    fn test_raise_restarts_window() {
        let start = Instant::now();
        let mut capturing = TransientSignal::new(Duration::from_millis(300));
        capturing.raise(start);
        capturing.raise(start + Duration::from_millis(200));
        assert!(capturing.is_active_at(start + Duration::from_millis(450)));
    }
}

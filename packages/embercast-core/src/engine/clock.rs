//! Position clock: a pausable monotonic stopwatch.
//!
//! Simulates "where in the track we are" without querying the renderer on
//! every read. Reported playback position is always
//! `seek_offset + clock.elapsed_secs()`; the drift corrector keeps the
//! offset honest.

use std::time::Duration;

use tokio::time::Instant;

/// Pausable elapsed-time counter.
///
/// Paused time never accumulates. Built on [`tokio::time::Instant`] so tests
/// running under tokio's paused virtual clock are deterministic.
#[derive(Debug)]
pub struct PositionClock {
    /// Time accumulated across completed running intervals.
    accumulated: Duration,
    /// Start of the current running interval, when running.
    started_at: Option<Instant>,
}

impl PositionClock {
    /// Creates a stopped clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            started_at: None,
        }
    }

    /// Starts or resumes the clock. No-op when already running.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Pauses the clock, banking the current running interval.
    /// No-op when not running.
    pub fn pause(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += started_at.elapsed();
        }
    }

    /// Stops the clock and clears all accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = None;
    }

    /// Whether the clock is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total running time since the last reset.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.accumulated + started_at.elapsed(),
            None => self.accumulated,
        }
    }

    /// Total running time in whole seconds (`floor(ms / 1000)`).
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }
}

impl Default for PositionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn counts_only_running_time() {
        let mut clock = PositionClock::new();
        clock.start();
        advance(Duration::from_secs(5)).await;

        clock.pause();
        advance(Duration::from_secs(30)).await;
        assert_eq!(clock.elapsed_secs(), 5);

        clock.start();
        advance(Duration::from_secs(2)).await;
        assert_eq!(clock.elapsed_secs(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_is_a_no_op() {
        let mut clock = PositionClock::new();
        clock.start();
        advance(Duration::from_secs(3)).await;
        clock.start();
        advance(Duration::from_secs(3)).await;
        assert_eq!(clock.elapsed_secs(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_is_idempotent() {
        let mut clock = PositionClock::new();
        clock.start();
        advance(Duration::from_secs(4)).await;

        clock.pause();
        let after_first = clock.elapsed();
        clock.pause();
        assert_eq!(clock.elapsed(), after_first);
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_accumulated_time() {
        let mut clock = PositionClock::new();
        clock.start();
        advance(Duration::from_secs(10)).await;

        clock.reset();
        assert_eq!(clock.elapsed_secs(), 0);
        assert!(!clock.is_running());

        advance(Duration::from_secs(10)).await;
        assert_eq!(clock.elapsed_secs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_secs_floors_subsecond_time() {
        let mut clock = PositionClock::new();
        clock.start();
        advance(Duration::from_millis(1999)).await;
        assert_eq!(clock.elapsed_secs(), 1);
    }
}

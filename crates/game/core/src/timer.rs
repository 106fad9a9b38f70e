//! Count-up timer shared by abilities and enemy behaviors.
//!
//! Waiting is always an accumulating timer checked against a threshold on a
//! later tick. The elapsed value clamps at the threshold so progress math
//! lands on exactly 1.0.

use std::time::Duration;

/// Elapsed time measured against a fixed threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timer {
    elapsed: Duration,
    threshold: Duration,
}

impl Timer {
    pub const fn new(threshold: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            threshold,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Changes the threshold, re-clamping the elapsed value.
    pub fn set_threshold(&mut self, threshold: Duration) {
        self.threshold = threshold;
        self.elapsed = self.elapsed.min(threshold);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.threshold
    }

    /// Adds `delta` and reports whether this call crossed the threshold.
    ///
    /// A timer that has already finished stays finished and never reports
    /// the crossing twice.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.is_finished() {
            return false;
        }
        self.elapsed = (self.elapsed + delta).min(self.threshold);
        self.is_finished()
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Sets the elapsed value directly (save restore), clamped to the threshold.
    pub fn restore(&mut self, elapsed: Duration) {
        self.elapsed = elapsed.min(self.threshold);
    }

    /// Fraction of the threshold elapsed, in `[0, 1]`.
    ///
    /// A zero-length threshold reports exactly 1.0.
    pub fn progress(&self) -> f32 {
        if self.threshold.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.threshold.as_secs_f32()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_is_reported_once_and_clamped() {
        let mut timer = Timer::new(Duration::from_millis(300));
        assert!(!timer.advance(Duration::from_millis(200)));
        assert!(timer.advance(Duration::from_millis(200)));
        assert_eq!(timer.elapsed(), Duration::from_millis(300));
        assert!(!timer.advance(Duration::from_millis(200)));
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn zero_threshold_progress_is_one() {
        let timer = Timer::new(Duration::ZERO);
        assert!(timer.is_finished());
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn restore_and_threshold_changes_clamp() {
        let mut timer = Timer::new(Duration::from_secs(1));
        timer.restore(Duration::from_secs(5));
        assert_eq!(timer.elapsed(), Duration::from_secs(1));

        timer.set_threshold(Duration::from_millis(400));
        assert_eq!(timer.elapsed(), Duration::from_millis(400));
    }
}

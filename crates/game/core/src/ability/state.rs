//! Shared lifecycle fields for every ability variant.

use std::time::Duration;

use crate::timer::Timer;

/// What one [`AbilityState::advance`] call changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateAdvance {
    /// Active time reached this frame, before any deactivation. `None` when
    /// the ability was not active.
    pub active_elapsed: Option<Duration>,
    /// The active window closed this frame.
    pub deactivated: bool,
    /// The cooldown completed this frame.
    pub became_ready: bool,
}

/// Ready/active/cooldown lifecycle shared by all abilities.
///
/// `active` and the cooldown count-up are independent: an ability can still
/// be playing its effect while its cooldown is already running. `ready` goes
/// false the instant the cooldown starts and true only once the elapsed time
/// reaches the level-scaled cooldown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityState {
    ready: bool,
    active: bool,
    cooling: bool,
    cooldown: Timer,
    active_window: Timer,
    base_cooldown: Duration,
    cooldown_cut: Duration,
    mana_cost: u32,
    level: u8,
    max_level: u8,
}

impl AbilityState {
    pub fn new(cooldown: Duration, duration: Duration, mana_cost: u32, max_level: u8) -> Self {
        Self {
            ready: true,
            active: false,
            cooling: false,
            cooldown: Timer::new(cooldown),
            active_window: Timer::new(duration),
            base_cooldown: cooldown,
            cooldown_cut: Duration::ZERO,
            mana_cost,
            level: 1,
            max_level: max_level.max(1),
        }
    }

    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// True while the cooldown count-up is running.
    pub fn cooling(&self) -> bool {
        self.cooling
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn mana_cost(&self) -> u32 {
        self.mana_cost
    }

    pub fn cooldown_duration(&self) -> Duration {
        self.cooldown.threshold()
    }

    pub fn active_duration(&self) -> Duration {
        self.active_window.threshold()
    }

    pub fn cooldown_elapsed(&self) -> Duration {
        self.cooldown.elapsed()
    }

    pub fn active_elapsed(&self) -> Duration {
        self.active_window.elapsed()
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Starts the cooldown count-up; `ready` flips false immediately.
    pub fn start_cooldown(&mut self) {
        self.ready = false;
        self.cooling = true;
        self.cooldown.reset();
    }

    /// Marks the ability as consumed without starting the cooldown yet.
    pub fn commit(&mut self) {
        self.ready = false;
        self.cooling = false;
    }

    /// Enters the active window. A zero-length window is skipped entirely.
    pub fn enter_active(&mut self) -> bool {
        if self.active_window.threshold().is_zero() {
            return false;
        }
        self.active = true;
        self.active_window.reset();
        true
    }

    /// Advances the active window and the cooldown independently.
    pub fn advance(&mut self, delta: Duration) -> StateAdvance {
        let mut report = StateAdvance::default();

        if self.active {
            self.active_window.advance(delta);
            report.active_elapsed = Some(self.active_window.elapsed());
            if self.active_window.is_finished() {
                self.active = false;
                self.active_window.reset();
                report.deactivated = true;
            }
        }

        if self.cooling {
            self.cooldown.advance(delta);
            if self.cooldown.is_finished() {
                self.cooling = false;
                self.ready = true;
                report.became_ready = true;
            }
        }

        report
    }

    /// Clears every timer and flag; level and upgrades are kept.
    pub fn force_reset(&mut self) {
        self.ready = true;
        self.active = false;
        self.cooling = false;
        self.cooldown.reset();
        self.active_window.reset();
    }

    // ========================================================================
    // Upgrades
    // ========================================================================

    /// Increments the level. Returns false at max level.
    pub fn level_up(&mut self) -> bool {
        if self.level >= self.max_level {
            return false;
        }
        self.level += 1;
        true
    }

    /// Shortens the cooldown by `cut`, cumulatively.
    pub fn reduce_cooldown(&mut self, cut: Duration) {
        self.cooldown_cut += cut;
        self.cooldown
            .set_threshold(self.base_cooldown.saturating_sub(self.cooldown_cut));
    }

    /// Lengthens the active window by `extra`.
    pub fn extend_duration(&mut self, extra: Duration) {
        let duration = self.active_window.threshold() + extra;
        self.active_window.set_threshold(duration);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Cooldown progress in `[0, 1]`.
    ///
    /// Reports 1.0 while the ability is ready and for a zero-length cooldown;
    /// 0.0 while consumed but not yet counting.
    pub fn cooldown_progress(&self) -> f32 {
        if self.cooling {
            self.cooldown.progress()
        } else if self.ready || self.cooldown.threshold().is_zero() {
            1.0
        } else {
            0.0
        }
    }

    /// Active-window progress in `[0, 1]`; 0.0 when not active.
    pub fn duration_progress(&self) -> f32 {
        if self.active {
            self.active_window.progress()
        } else {
            0.0
        }
    }

    // ========================================================================
    // Restore
    // ========================================================================

    /// Re-applies persisted dynamic fields. Elapsed values are clamped to
    /// their thresholds. An active window resumes only if it has time left.
    pub fn restore(
        &mut self,
        ready: bool,
        cooling: bool,
        cooldown_elapsed: Duration,
        active: bool,
        active_elapsed: Duration,
    ) {
        self.ready = ready;
        self.cooling = cooling && !ready;
        self.cooldown.restore(cooldown_elapsed);

        self.active_window.restore(active_elapsed);
        self.active = active && !self.active_window.is_finished();
        if !self.active {
            self.active_window.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AbilityState {
        AbilityState::new(Duration::from_millis(800), Duration::from_millis(250), 10, 5)
    }

    #[test]
    fn ready_returns_exactly_at_cooldown() {
        let mut s = state();
        s.start_cooldown();
        assert!(!s.ready());

        s.advance(Duration::from_millis(799));
        assert!(!s.ready());

        let report = s.advance(Duration::from_millis(1));
        assert!(report.became_ready);
        assert!(s.ready());
        assert_eq!(s.cooldown_elapsed(), Duration::from_millis(800));
    }

    #[test]
    fn active_and_cooldown_run_independently() {
        let mut s = state();
        s.start_cooldown();
        assert!(s.enter_active());

        let report = s.advance(Duration::from_millis(250));
        assert_eq!(report.active_elapsed, Some(Duration::from_millis(250)));
        assert!(report.deactivated);
        assert!(!s.active());
        assert!(!s.ready());
    }

    #[test]
    fn zero_duration_skips_active() {
        let mut s = AbilityState::new(Duration::from_millis(100), Duration::ZERO, 0, 1);
        assert!(!s.enter_active());
        assert!(!s.active());
    }

    #[test]
    fn cooldown_progress_is_monotonic_and_clamped() {
        let mut s = state();
        s.start_cooldown();
        let mut last = s.cooldown_progress();
        for _ in 0..20 {
            s.advance(Duration::from_millis(60));
            let p = s.cooldown_progress();
            assert!(p >= last);
            assert!(p <= 1.0);
            last = p;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn zero_cooldown_progress_is_one_and_ready_next_frame() {
        let mut s = AbilityState::new(Duration::ZERO, Duration::ZERO, 0, 1);
        s.start_cooldown();
        assert_eq!(s.cooldown_progress(), 1.0);
        s.advance(Duration::ZERO);
        assert!(s.ready());
    }

    #[test]
    fn level_up_stops_at_max() {
        let mut s = AbilityState::new(Duration::ZERO, Duration::ZERO, 0, 2);
        assert!(s.level_up());
        assert!(!s.level_up());
        assert_eq!(s.level(), 2);
    }

    #[test]
    fn reduce_cooldown_accumulates() {
        let mut s = state();
        s.reduce_cooldown(Duration::from_millis(100));
        s.reduce_cooldown(Duration::from_millis(100));
        assert_eq!(s.cooldown_duration(), Duration::from_millis(600));
    }

    #[test]
    fn force_reset_keeps_level() {
        let mut s = state();
        s.level_up();
        s.start_cooldown();
        s.enter_active();
        s.force_reset();
        assert!(s.ready());
        assert!(!s.active());
        assert_eq!(s.level(), 2);
        assert_eq!(s.cooldown_elapsed(), Duration::ZERO);
    }

    #[test]
    fn restore_resumes_a_window_opened_this_frame() {
        let mut s = state();
        s.restore(false, true, Duration::ZERO, true, Duration::ZERO);
        assert!(s.active());
        assert_eq!(s.active_elapsed(), Duration::ZERO);

        s.restore(false, true, Duration::ZERO, true, Duration::from_secs(5));
        assert!(!s.active());
    }
}

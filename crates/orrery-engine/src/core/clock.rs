use crate::api::error::EphemerisError;
use crate::core::calendar::{day_number_to_date, CalendarDate};
use crate::ephemeris::TabulatedEphemeris;

/// Result of one [`SimClock::increment`].
#[derive(Debug)]
pub enum Increment {
    /// Clock is off; nothing changed.
    Idle,
    /// The new day number was committed.
    Committed(f64),
    /// The target lies past the loaded data; a batch keyed at it is pending.
    Waiting(f64),
    /// No data for the target could be loaded.
    Exhausted(EphemerisError),
}

/// The simulated clock: current day number and days advanced per tick.
#[derive(Debug, Clone)]
pub struct SimClock {
    day_number: f64,
    step: f64,
    previous_step: f64,
    pending: Option<f64>,
}

impl SimClock {
    /// A stopped clock at `epoch`.
    pub fn new(epoch: f64) -> Self {
        Self {
            day_number: epoch,
            step: 0.0,
            previous_step: 0.0,
            pending: None,
        }
    }

    pub fn day_number(&self) -> f64 {
        self.day_number
    }

    pub fn calendar_date(&self) -> CalendarDate {
        day_number_to_date(self.day_number)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Last nonzero step, restored by [`resume`](Self::resume).
    pub fn previous_step(&self) -> f64 {
        self.previous_step
    }

    pub fn is_on(&self) -> bool {
        self.step > 0.0
    }

    /// Day number an increment is currently waiting on. Cleared when the
    /// clock is turned off.
    pub fn pending(&self) -> Option<f64> {
        self.pending
    }

    /// 0 turns the clock off, a positive value turns it on. Negative or
    /// non-finite steps are rejected.
    pub fn set_step(&mut self, days: f64) -> bool {
        if !days.is_finite() || days < 0.0 {
            log::warn!("clock: rejecting step {}", days);
            return false;
        }
        if self.step > 0.0 {
            self.previous_step = self.step;
        }
        if days > 0.0 {
            self.previous_step = days;
        } else if let Some(target) = self.pending.take() {
            log::debug!("clock: stopped while waiting on day {}", target);
        }
        self.step = days;
        true
    }

    /// Set the step [`resume`](Self::resume) restores without touching the
    /// current one. Only positive finite values are accepted.
    pub fn set_previous_step(&mut self, days: f64) -> bool {
        if !days.is_finite() || days <= 0.0 {
            log::warn!("clock: rejecting previous step {}", days);
            return false;
        }
        self.previous_step = days;
        true
    }

    pub fn pause(&mut self) {
        if self.is_on() {
            self.set_step(0.0);
        }
    }

    /// Restore the last nonzero step. Returns whether the clock is now on.
    pub fn resume(&mut self) -> bool {
        if !self.is_on() && self.previous_step > 0.0 {
            self.step = self.previous_step;
        }
        self.is_on()
    }

    pub fn toggle(&mut self) -> bool {
        if self.is_on() {
            self.pause();
            false
        } else {
            self.resume()
        }
    }

    /// Advance by one step. A target inside the loaded data commits at once;
    /// otherwise one batch keyed at the target is requested and the day
    /// number stays put until that batch has been merged. An off clock never
    /// moves.
    pub fn increment(&mut self, ephemeris: &mut TabulatedEphemeris) -> Increment {
        if !self.is_on() {
            return Increment::Idle;
        }
        if let Some(target) = self.pending {
            return self.resolve_pending(target, ephemeris);
        }

        let target = self.day_number + self.step;
        if ephemeris.covers(target) {
            self.day_number = target;
            return Increment::Committed(target);
        }

        ephemeris.request_batch(target);
        self.pending = Some(target);
        Increment::Waiting(target)
    }

    fn resolve_pending(&mut self, target: f64, ephemeris: &mut TabulatedEphemeris) -> Increment {
        if ephemeris.covers(target) {
            self.pending = None;
            self.day_number = target;
            return Increment::Committed(target);
        }
        if ephemeris.is_loading() {
            return Increment::Waiting(target);
        }
        self.pending = None;
        let err = ephemeris
            .take_failure()
            .unwrap_or(EphemerisError::OutOfRange(target));
        Increment::Exhausted(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::loader::scripted::{Script, ScriptedLoader, SharedScript};
    use glam::DVec3;

    fn loaded(start: f64, days: u32) -> (TabulatedEphemeris, SharedScript) {
        let script = Script::shared();
        let mut eph = TabulatedEphemeris::new(Box::new(ScriptedLoader(script.clone())), days, 1.0);
        eph.request_batch(start);
        script.borrow_mut().resolve(&[("earth", DVec3::X)]);
        eph.poll();
        (eph, script)
    }

    #[test]
    fn zero_step_is_a_no_op() {
        let (mut eph, _) = loaded(2451544.0, 10);
        let mut clock = SimClock::new(2451544.0);
        clock.set_step(0.0);
        for _ in 0..5 {
            assert!(matches!(clock.increment(&mut eph), Increment::Idle));
        }
        assert_eq!(clock.day_number(), 2451544.0);
    }

    #[test]
    fn step_of_seven_advances_by_seven() {
        let (mut eph, _) = loaded(2451544.0, 10);
        let mut clock = SimClock::new(2451544.0);
        clock.set_step(7.0);
        assert!(matches!(clock.increment(&mut eph), Increment::Committed(d) if d == 2451551.0));
        assert_eq!(clock.day_number(), 2451551.0);
    }

    #[test]
    fn crossing_the_watermark_waits_for_one_batch() {
        // Days 2451544..=2451548 loaded.
        let (mut eph, script) = loaded(2451544.0, 5);
        let mut clock = SimClock::new(2451544.0);
        clock.set_step(1.0);

        for expected in [2451545.0, 2451546.0, 2451547.0, 2451548.0] {
            assert!(matches!(clock.increment(&mut eph), Increment::Committed(d) if d == expected));
        }
        assert_eq!(script.borrow().requests.len(), 1);

        assert!(matches!(clock.increment(&mut eph), Increment::Waiting(d) if d == 2451549.0));
        assert_eq!(script.borrow().requests.len(), 2);
        assert_eq!(script.borrow().requests[1].start, 2451549.0);
        assert_eq!(clock.day_number(), 2451548.0);

        // Still waiting: no second request, no commit.
        assert!(matches!(clock.increment(&mut eph), Increment::Waiting(_)));
        assert_eq!(script.borrow().requests.len(), 2);
        assert_eq!(clock.day_number(), 2451548.0);

        script.borrow_mut().resolve(&[("earth", DVec3::Y)]);
        eph.poll();
        assert!(matches!(clock.increment(&mut eph), Increment::Committed(d) if d == 2451549.0));
        assert_eq!(clock.day_number(), 2451549.0);
    }

    #[test]
    fn failed_batch_exhausts_without_moving() {
        let (mut eph, script) = loaded(0.0, 2);
        let mut clock = SimClock::new(1.0);
        clock.set_step(1.0);
        assert!(matches!(clock.increment(&mut eph), Increment::Waiting(_)));
        script.borrow_mut().fail("503");
        eph.poll();
        assert!(matches!(clock.increment(&mut eph), Increment::Exhausted(EphemerisError::Fetch(_))));
        assert_eq!(clock.day_number(), 1.0);
        assert!(clock.pending().is_none());
    }

    #[test]
    fn stopping_while_waiting_freezes_the_day() {
        let (mut eph, script) = loaded(0.0, 2);
        let mut clock = SimClock::new(1.0);
        clock.set_step(1.0);
        assert!(matches!(clock.increment(&mut eph), Increment::Waiting(d) if d == 2.0));

        clock.set_step(0.0);
        assert!(clock.pending().is_none());
        script.borrow_mut().resolve(&[("earth", DVec3::Z)]);
        eph.poll();
        for _ in 0..3 {
            assert!(matches!(clock.increment(&mut eph), Increment::Idle));
        }
        assert_eq!(clock.day_number(), 1.0);

        // The merged batch is still there once time runs again.
        assert!(clock.resume());
        assert!(matches!(clock.increment(&mut eph), Increment::Committed(d) if d == 2.0));
    }

    #[test]
    fn pausing_while_waiting_freezes_the_day() {
        let (mut eph, script) = loaded(0.0, 2);
        let mut clock = SimClock::new(1.0);
        clock.set_step(1.0);
        assert!(matches!(clock.increment(&mut eph), Increment::Waiting(_)));
        clock.pause();
        script.borrow_mut().resolve(&[("earth", DVec3::Z)]);
        eph.poll();
        assert!(matches!(clock.increment(&mut eph), Increment::Idle));
        assert_eq!(clock.day_number(), 1.0);
    }

    #[test]
    fn previous_step_can_be_set_directly() {
        let mut clock = SimClock::new(0.0);
        clock.set_step(1.0);
        clock.pause();
        assert!(clock.set_previous_step(4.0));
        assert!(!clock.set_previous_step(0.0));
        assert!(!clock.is_on());
        assert!(clock.resume());
        assert_eq!(clock.step(), 4.0);
    }

    #[test]
    fn pause_and_resume_restore_step() {
        let mut clock = SimClock::new(0.0);
        clock.set_step(3.0);
        clock.pause();
        assert!(!clock.is_on());
        assert_eq!(clock.previous_step(), 3.0);
        assert!(clock.resume());
        assert_eq!(clock.step(), 3.0);
        assert!(!clock.toggle());
        assert!(clock.toggle());
    }

    #[test]
    fn negative_step_rejected() {
        let mut clock = SimClock::new(0.0);
        clock.set_step(2.0);
        assert!(!clock.set_step(-1.0));
        assert!(!clock.set_step(f64::NAN));
        assert_eq!(clock.step(), 2.0);
    }
}

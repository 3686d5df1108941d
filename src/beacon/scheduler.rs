//! Beacon scheduler
//!
//! Decides when a position report goes on the air. Two separate questions are
//! kept apart: "is it time to send" (the pending flag, raised by the interval
//! boundary or the manual trigger) and "do we have fresh, valid data to send"
//! (the commit gate). The pending flag persists across iterations until a
//! fresh valid fix arrives, then exactly one beacon fires.

use crate::gps::clock::UnixTime;

/// Scheduler state, owned by one [`BeaconScheduler`] instance.
///
/// `next_beacon_at` only ever advances, and only as a side effect of a
/// committed send. The pending flag starts raised so the first valid fix
/// after power-up produces an immediate beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconState {
    next_beacon_at: Option<UnixTime>,
    send_pending: bool,
}

impl BeaconState {
    pub const fn new() -> Self {
        Self {
            next_beacon_at: None,
            send_pending: true,
        }
    }

    /// Timestamp of the next scheduled beacon; `None` until the first send.
    pub fn next_beacon_at(&self) -> Option<UnixTime> {
        self.next_beacon_at
    }

    /// True when a send is due and waiting for fresh, valid data.
    pub fn send_pending(&self) -> bool {
        self.send_pending
    }
}

impl Default for BeaconState {
    fn default() -> Self {
        Self::new()
    }
}

/// Interval-based beacon scheduler.
pub struct BeaconScheduler {
    interval_seconds: i64,
    state: BeaconState,
}

impl BeaconScheduler {
    pub fn new(interval_minutes: u32) -> Self {
        Self {
            interval_seconds: interval_minutes as i64 * 60,
            state: BeaconState::new(),
        }
    }

    pub fn state(&self) -> &BeaconState {
        &self.state
    }

    /// Evaluate the transition rule for one iteration.
    ///
    /// Raises the pending flag when the schedule boundary has been reached
    /// (or was never set). A manual trigger raises it unconditionally,
    /// overriding the timing for on-demand transmission. It does not bypass
    /// the freshness gate in [`should_send`](Self::should_send).
    pub fn evaluate(&mut self, now: UnixTime, manual_trigger: bool) {
        match self.state.next_beacon_at {
            None => self.state.send_pending = true,
            Some(boundary) if now >= boundary => self.state.send_pending = true,
            Some(_) => {}
        }
        if manual_trigger {
            self.state.send_pending = true;
        }
    }

    /// Commit gate: a beacon goes out only when a send is pending AND the
    /// location is currently valid and freshly updated.
    pub fn should_send(&self, location_fresh_and_valid: bool) -> bool {
        self.state.send_pending && location_fresh_and_valid
    }

    /// Record a committed send: clear the pending flag and move the boundary
    /// to `now + interval`.
    ///
    /// Called before the (slow) transmission so radio latency never skews the
    /// schedule. There is no catch-up: after missed intervals the boundary
    /// resets forward from `now`, not from the missed slot.
    pub fn commit(&mut self, now: UnixTime) {
        self.state.send_pending = false;
        self.state.next_beacon_at = Some(now + self.interval_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> UnixTime {
        UnixTime::from_seconds(seconds)
    }

    /// One full iteration: evaluate, gate, commit on success.
    fn run_iteration(
        scheduler: &mut BeaconScheduler,
        now: UnixTime,
        manual: bool,
        fix_fresh_and_valid: bool,
    ) -> bool {
        scheduler.evaluate(now, manual);
        if scheduler.should_send(fix_fresh_and_valid) {
            scheduler.commit(now);
            true
        } else {
            false
        }
    }

    #[test]
    fn test_first_fix_sends_immediately_and_schedules_next() {
        let mut scheduler = BeaconScheduler::new(5);
        assert_eq!(scheduler.state().next_beacon_at(), None);

        // Fresh valid fix at t=0 with the boundary unset
        assert!(run_iteration(&mut scheduler, at(0), false, true));
        assert_eq!(scheduler.state().next_beacon_at(), Some(at(300)));
        assert!(!scheduler.state().send_pending());
    }

    #[test]
    fn test_no_send_before_boundary() {
        let mut scheduler = BeaconScheduler::new(5);
        assert!(run_iteration(&mut scheduler, at(0), false, true));

        for now in [1, 60, 299] {
            assert!(!run_iteration(&mut scheduler, at(now), false, true));
        }
        assert_eq!(scheduler.state().next_beacon_at(), Some(at(300)));
    }

    #[test]
    fn test_at_most_one_send_per_boundary() {
        let mut scheduler = BeaconScheduler::new(1);
        assert!(run_iteration(&mut scheduler, at(0), false, true));

        // Crossing t=60: exactly one commit even over repeated iterations
        assert!(run_iteration(&mut scheduler, at(61), false, true));
        assert!(!run_iteration(&mut scheduler, at(62), false, true));
        assert_eq!(scheduler.state().next_beacon_at(), Some(at(121)));
    }

    #[test]
    fn test_stale_fix_withholds_commit_past_boundary() {
        let mut scheduler = BeaconScheduler::new(5);
        assert!(run_iteration(&mut scheduler, at(0), false, true));

        // Fix goes invalid exactly at the boundary: pending stays raised
        assert!(!run_iteration(&mut scheduler, at(300), false, false));
        assert!(scheduler.state().send_pending());
        assert!(!run_iteration(&mut scheduler, at(310), false, false));
        assert!(scheduler.state().send_pending());

        // Fresh valid fix arrives: exactly one beacon fires, schedule resets
        // forward from now
        assert!(run_iteration(&mut scheduler, at(325), false, true));
        assert!(!run_iteration(&mut scheduler, at(326), false, true));
        assert_eq!(scheduler.state().next_beacon_at(), Some(at(625)));
    }

    #[test]
    fn test_manual_trigger_overrides_schedule() {
        let mut scheduler = BeaconScheduler::new(5);
        assert!(run_iteration(&mut scheduler, at(0), false, true));

        // Mid-interval manual trigger with fresh fix: immediate commit and
        // the boundary resets to now + interval
        assert!(run_iteration(&mut scheduler, at(100), true, true));
        assert_eq!(scheduler.state().next_beacon_at(), Some(at(400)));
    }

    #[test]
    fn test_manual_trigger_still_requires_fresh_fix() {
        let mut scheduler = BeaconScheduler::new(5);
        assert!(run_iteration(&mut scheduler, at(0), false, true));

        // Manual trigger without fresh data: pending raised, nothing sent
        assert!(!run_iteration(&mut scheduler, at(100), true, false));
        assert!(scheduler.state().send_pending());

        // Next fresh fix satisfies the pending manual request
        assert!(run_iteration(&mut scheduler, at(130), false, true));
        assert_eq!(scheduler.state().next_beacon_at(), Some(at(430)));
    }

    #[test]
    fn test_no_catch_up_after_gap() {
        let mut scheduler = BeaconScheduler::new(1);
        assert!(run_iteration(&mut scheduler, at(0), false, true));

        // Fix-less for many intervals, then recovery: one beacon, schedule
        // restarts from now
        for now in [100, 200, 500] {
            assert!(!run_iteration(&mut scheduler, at(now), false, false));
        }
        assert!(run_iteration(&mut scheduler, at(600), false, true));
        assert!(!run_iteration(&mut scheduler, at(601), false, true));
        assert_eq!(scheduler.state().next_beacon_at(), Some(at(660)));
    }

    #[test]
    fn test_boundary_only_advances() {
        let mut scheduler = BeaconScheduler::new(5);
        assert!(run_iteration(&mut scheduler, at(1_000), false, true));
        let first = scheduler.state().next_beacon_at().unwrap();

        assert!(run_iteration(&mut scheduler, at(1_300), false, true));
        let second = scheduler.state().next_beacon_at().unwrap();
        assert!(second > first);
    }
}

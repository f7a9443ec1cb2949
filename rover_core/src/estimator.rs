//! Pulse-to-velocity estimation and error-term bookkeeping.
//!
//! One estimator instance lives inside `DriveCore` for the duration of a
//! movement activation: `init` arms it when a direction begins, `reset`
//! disarms it when the vehicle stops. While armed, every accepted sample
//! recomputes the PID error terms in place.

use crate::config::GeometryCfg;
use crate::pid::ErrorTerms;

#[derive(Debug, Clone)]
pub struct FeedbackEstimator {
    wheel_circumference_m: f32,
    pulses_per_rev: f32,

    target_mps: f32,
    current_mps: f32,
    err: ErrorTerms,

    last_sample_ms: u64,
    /// Timestamp of the first zero-distance sample of this activation.
    /// Latched: cleared only by `reset`/`init`, never by a later nonzero
    /// sample. Callers relying on `time_reading_zero_s` get "time since
    /// feedback first went quiet", re-armed per activation.
    zero_since_ms: Option<u64>,
    initialized: bool,
}

impl FeedbackEstimator {
    pub fn new(geometry: &GeometryCfg, target_mps: f32) -> Self {
        Self {
            wheel_circumference_m: geometry.wheel_circumference_m(),
            pulses_per_rev: geometry.pulses_per_rev,
            target_mps,
            current_mps: 0.0,
            err: ErrorTerms::default(),
            last_sample_ms: 0,
            zero_since_ms: None,
            initialized: false,
        }
    }

    /// Disarm and clear per-activation state. The last observed velocity is
    /// kept for diagnostics.
    pub fn reset(&mut self) {
        self.initialized = false;
        self.err = ErrorTerms::default();
        self.last_sample_ms = 0;
        self.zero_since_ms = None;
    }

    /// Reset and arm for a new activation starting at `now_ms`.
    pub fn init(&mut self, now_ms: u64) {
        self.reset();
        self.last_sample_ms = now_ms;
        self.initialized = true;
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn set_target(&mut self, target_mps: f32) {
        self.target_mps = target_mps;
    }

    #[inline]
    pub fn target_mps(&self) -> f32 {
        self.target_mps
    }

    #[inline]
    pub fn velocity_mps(&self) -> f32 {
        self.current_mps
    }

    #[inline]
    pub fn errors(&self) -> &ErrorTerms {
        &self.err
    }

    /// Wheel travel for a pulse count.
    #[inline]
    pub fn distance_m(&self, pulses: u32) -> f32 {
        self.wheel_circumference_m * pulses as f32 / self.pulses_per_rev
    }

    /// Ingest one drained pulse count at `now_ms`.
    ///
    /// A sample with a non-positive interval is discarded whole (clock
    /// resolution guard): no timestamps move, no error term changes.
    pub fn sample(&mut self, pulses: u32, now_ms: u64) {
        if !self.initialized {
            return;
        }
        let dt_ms = now_ms.saturating_sub(self.last_sample_ms);
        if dt_ms == 0 {
            return;
        }
        let dt = dt_ms as f32 * 1e-3;
        self.last_sample_ms = now_ms;

        let dist = self.distance_m(pulses);
        if dist == 0.0 && self.zero_since_ms.is_none() {
            self.zero_since_ms = Some(now_ms);
        }

        self.current_mps = dist / dt;

        let prev = self.err.p;
        let e = self.target_mps - self.current_mps;
        self.err.p = e;
        self.err.i += e * dt;
        self.err.d = (e - prev) / dt;
    }

    /// Seconds spent latched on zero feedback; 0 while unlatched.
    pub fn time_reading_zero_s(&self, now_ms: u64) -> f32 {
        match self.zero_since_ms {
            Some(t0) => now_ms.saturating_sub(t0) as f32 * 1e-3,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> FeedbackEstimator {
        let mut e = FeedbackEstimator::new(&GeometryCfg::default(), 0.1);
        e.init(1_000);
        e
    }

    #[test]
    fn zero_interval_sample_is_discarded() {
        let mut e = estimator();
        e.sample(10, 1_000);
        assert_eq!(*e.errors(), ErrorTerms::default());
        assert_eq!(e.velocity_mps(), 0.0);
    }

    #[test]
    fn velocity_is_distance_over_dt() {
        let mut e = estimator();
        // 20 pulses = one revolution = one circumference, over 50 ms.
        e.sample(20, 1_050);
        let circ = GeometryCfg::default().wheel_circumference_m();
        let expected = circ / 0.05;
        assert!((e.velocity_mps() - expected).abs() < 1e-5);
    }

    #[test]
    fn disarmed_estimator_ignores_samples() {
        let mut e = estimator();
        e.reset();
        e.sample(20, 2_000);
        assert_eq!(*e.errors(), ErrorTerms::default());
    }

    #[test]
    fn error_terms_follow_the_definition() {
        let mut e = estimator();
        e.sample(0, 1_100); // dt = 0.1 s, velocity 0
        let err = 0.1; // target - 0
        assert!((e.errors().p - err).abs() < 1e-6);
        assert!((e.errors().i - err * 0.1).abs() < 1e-6);
        assert!((e.errors().d - err / 0.1).abs() < 1e-6);

        let prev_p = e.errors().p;
        e.sample(0, 1_200);
        assert!((e.errors().d - (e.errors().p - prev_p) / 0.1).abs() < 1e-6);
    }

    #[test]
    fn zero_flag_latches_until_reset() {
        let mut e = estimator();
        assert_eq!(e.time_reading_zero_s(5_000), 0.0);

        e.sample(0, 1_100);
        assert!((e.time_reading_zero_s(1_600) - 0.5).abs() < 1e-6);

        // A nonzero sample does NOT clear the latch; duration keeps growing
        // from the original onset.
        e.sample(20, 1_200);
        assert!((e.time_reading_zero_s(2_100) - 1.0).abs() < 1e-6);

        // Only re-arming clears it.
        e.init(3_000);
        assert_eq!(e.time_reading_zero_s(9_000), 0.0);
    }

    #[test]
    fn zero_onset_is_stamped_once() {
        let mut e = estimator();
        e.sample(0, 1_100);
        e.sample(0, 1_200);
        e.sample(0, 1_300);
        // Duration measured from the first zero sample, not the last.
        assert!((e.time_reading_zero_s(1_300) - 0.2).abs() < 1e-6);
    }
}

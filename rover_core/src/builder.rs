//! Type-state builder for `Drive` and the generic `build_drive` constructor.
//!
//! The builder enforces at compile time that the digital I/O, PWM output,
//! and pulse counter are provided before `build()` is available;
//! `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use rover_traits::clock::{Clock, MonotonicClock};
use rover_traits::{DigitalIo, PulseCounter, PwmOut};

use crate::command::Command;
use crate::config::{ControlCfg, GeometryCfg, PinMap, SafetyCfg, TimerCfg};
use crate::core::DriveCore;
use crate::error::{BuildError, Result};
use crate::estimator::FeedbackEstimator;
use crate::movement::Movement;
use crate::status::{Snapshot, TickStatus};

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Boxed drive controller composed from trait objects.
pub struct Drive {
    pub(crate) inner:
        DriveCore<Box<dyn DigitalIo>, Box<dyn PwmOut>, Box<dyn PulseCounter>>,
}

impl core::fmt::Debug for Drive {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl Drive {
    /// Start building a Drive.
    pub fn builder() -> DriveBuilder<Missing, Missing, Missing> {
        DriveBuilder::default()
    }

    /// Apply one decoded command.
    pub fn apply(&mut self, cmd: Command) {
        self.inner.apply(cmd);
    }

    /// Request a movement state directly (commands normally do this).
    pub fn request(&mut self, requested: Movement) {
        self.inner.request(requested);
    }

    /// One control cycle.
    pub fn tick(&mut self) -> Result<TickStatus> {
        self.inner.tick()
    }

    /// Park the vehicle (best-effort neutral actuation).
    pub fn halt(&mut self) -> Result<()> {
        self.inner.halt()
    }

    pub fn state(&self) -> Movement {
        self.inner.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Drive`. All configuration is validated on build.
pub struct DriveBuilder<Io, Pwm, Enc> {
    dio: Option<Box<dyn DigitalIo>>,
    pwm: Option<Box<dyn PwmOut>>,
    encoder: Option<Box<dyn PulseCounter>>,
    pins: Option<PinMap>,
    geometry: Option<GeometryCfg>,
    control: Option<ControlCfg>,
    safety: Option<SafetyCfg>,
    timer: Option<TimerCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _io: PhantomData<Io>,
    _pwm: PhantomData<Pwm>,
    _enc: PhantomData<Enc>,
}

impl Default for DriveBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            dio: None,
            pwm: None,
            encoder: None,
            pins: None,
            geometry: None,
            control: None,
            safety: None,
            timer: None,
            clock: None,
            _io: PhantomData,
            _pwm: PhantomData,
            _enc: PhantomData,
        }
    }
}

/// Validate configuration and construct a `DriveCore`.
///
/// Single source of truth for validation, used by both
/// `DriveBuilder::try_build()` and `build_drive()`.
fn validate_and_build<D: DigitalIo, W: PwmOut, P: PulseCounter>(
    dio: D,
    pwm: W,
    encoder: P,
    pins: PinMap,
    geometry: GeometryCfg,
    control: ControlCfg,
    safety: SafetyCfg,
    timer: TimerCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<DriveCore<D, W, P>> {
    // ── Validation ───────────────────────────────────────────────────────────
    if !(geometry.wheel_radius_m.is_finite() && geometry.wheel_radius_m > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "wheel_radius_m must be > 0",
        )));
    }
    if !(geometry.pulses_per_rev.is_finite() && geometry.pulses_per_rev > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "pulses_per_rev must be > 0",
        )));
    }
    if !(geometry.max_velocity_mps.is_finite() && geometry.max_velocity_mps > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_velocity_mps must be > 0",
        )));
    }
    if !control.target_velocity_mps.is_finite()
        || control.target_velocity_mps < 0.0
        || control.target_velocity_mps > geometry.max_velocity_mps
    {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "target_velocity_mps must be in [0, max_velocity_mps]",
        )));
    }
    for g in [control.gains.p, control.gains.i, control.gains.d] {
        if !g.is_finite() || g < 0.0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "gains must be finite and >= 0",
            )));
        }
    }
    if control.tick_rate_hz == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tick_rate_hz must be > 0",
        )));
    }
    if !(safety.max_zero_read_s.is_finite() && safety.max_zero_read_s > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_zero_read_s must be > 0",
        )));
    }
    if !(timer.duration_s.is_finite() && timer.duration_s >= 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "timer duration_s must be >= 0",
        )));
    }

    // ── Precompute ───────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();
    let now = clock.ms_since(epoch);
    let period_us = crate::util::period_us(control.tick_rate_hz);
    let estimator = FeedbackEstimator::new(&geometry, control.target_velocity_mps);

    Ok(DriveCore {
        dio,
        pwm,
        encoder,
        pins,
        safety,
        clock,
        epoch,
        period_us,
        max_velocity_mps: geometry.max_velocity_mps,
        state: Movement::Stopped,
        estimator,
        gains: control.gains,
        out_duty: 0.0,
        control_active: control.control_active,
        manual_duty: control.manual_duty,
        timer,
        edge_hits: 0,
        move_start_ms: now,
    })
}

impl<Io, Pwm, Enc> DriveBuilder<Io, Pwm, Enc> {
    /// Fallible build available in any type-state; returns a detailed error
    /// for missing pieces.
    pub fn try_build(self) -> Result<Drive> {
        let dio = self
            .dio
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDigitalIo))?;
        let pwm = self
            .pwm
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPwm))?;
        let encoder = self
            .encoder
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPulseCounter))?;

        let inner = validate_and_build(
            dio,
            pwm,
            encoder,
            self.pins.unwrap_or_default(),
            self.geometry.unwrap_or_default(),
            self.control.unwrap_or_default(),
            self.safety.unwrap_or_default(),
            self.timer.unwrap_or_default(),
            self.clock,
        )?;

        Ok(Drive { inner })
    }
}

/// Chainable setters that do not affect type-state.
impl<Io, Pwm, Enc> DriveBuilder<Io, Pwm, Enc> {
    pub fn with_pins(mut self, pins: PinMap) -> Self {
        self.pins = Some(pins);
        self
    }
    pub fn with_geometry(mut self, geometry: GeometryCfg) -> Self {
        self.geometry = Some(geometry);
        self
    }
    pub fn with_control(mut self, control: ControlCfg) -> Self {
        self.control = Some(control);
        self
    }
    pub fn with_safety(mut self, safety: SafetyCfg) -> Self {
        self.safety = Some(safety);
        self
    }
    pub fn with_timer(mut self, timer: TimerCfg) -> Self {
        self.timer = Some(timer);
        self
    }
    /// Provide a custom clock; defaults to `MonotonicClock` when not set.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state
impl<Pwm, Enc> DriveBuilder<Missing, Pwm, Enc> {
    pub fn with_digital_io(self, dio: impl DigitalIo + 'static) -> DriveBuilder<Set, Pwm, Enc> {
        DriveBuilder {
            dio: Some(Box::new(dio)),
            pwm: self.pwm,
            encoder: self.encoder,
            pins: self.pins,
            geometry: self.geometry,
            control: self.control,
            safety: self.safety,
            timer: self.timer,
            clock: self.clock,
            _io: PhantomData,
            _pwm: PhantomData,
            _enc: PhantomData,
        }
    }
}

impl<Io, Enc> DriveBuilder<Io, Missing, Enc> {
    pub fn with_pwm(self, pwm: impl PwmOut + 'static) -> DriveBuilder<Io, Set, Enc> {
        DriveBuilder {
            dio: self.dio,
            pwm: Some(Box::new(pwm)),
            encoder: self.encoder,
            pins: self.pins,
            geometry: self.geometry,
            control: self.control,
            safety: self.safety,
            timer: self.timer,
            clock: self.clock,
            _io: PhantomData,
            _pwm: PhantomData,
            _enc: PhantomData,
        }
    }
}

impl<Io, Pwm> DriveBuilder<Io, Pwm, Missing> {
    pub fn with_pulse_counter(
        self,
        encoder: impl PulseCounter + 'static,
    ) -> DriveBuilder<Io, Pwm, Set> {
        DriveBuilder {
            dio: self.dio,
            pwm: self.pwm,
            encoder: Some(Box::new(encoder)),
            pins: self.pins,
            geometry: self.geometry,
            control: self.control,
            safety: self.safety,
            timer: self.timer,
            clock: self.clock,
            _io: PhantomData,
            _pwm: PhantomData,
            _enc: PhantomData,
        }
    }
}

impl DriveBuilder<Set, Set, Set> {
    /// Validate and build. Only available once all three peripherals are set.
    pub fn build(self) -> Result<Drive> {
        self.try_build()
    }
}

/// Generic, statically-dispatched alias using the unified core.
pub type DriveG<D, W, P> = DriveCore<D, W, P>;

/// Build a generic, statically-dispatched `DriveG` from concrete peripherals.
///
/// Delegates to the shared `validate_and_build` — no duplicated validation.
#[allow(clippy::too_many_arguments)]
pub fn build_drive<D, W, P>(
    dio: D,
    pwm: W,
    encoder: P,
    pins: PinMap,
    geometry: GeometryCfg,
    control: ControlCfg,
    safety: SafetyCfg,
    timer: TimerCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<DriveG<D, W, P>>
where
    D: DigitalIo + 'static,
    W: PwmOut + 'static,
    P: PulseCounter + 'static,
{
    validate_and_build(dio, pwm, encoder, pins, geometry, control, safety, timer, clock)
}

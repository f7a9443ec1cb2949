//! The unified drive control loop (`DriveCore`).
//!
//! Holds the movement state machine, the velocity estimator, the stop
//! evaluation, and the actuation path. One `tick()` is one control cycle:
//! stop-check, state actuation, PID update, PWM write, pacing sleep.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use rover_traits::clock::Clock;
use rover_traits::{DigitalIo, Level, PulseCounter, PwmOut};

use crate::command::Command;
use crate::config::{PinMap, SafetyCfg, TimerCfg};
use crate::error::{Result, StopReason};
use crate::estimator::FeedbackEstimator;
use crate::hw_error::map_hw_error;
use crate::movement::Movement;
use crate::pid::PidGains;
use crate::status::{Snapshot, TickStatus};

/// Upper bound of the gain scale: command payload 255 maps to this.
const MAX_GAIN: f32 = 10.0;

/// Unified core for both dynamic (boxed) and generic (static dispatch)
/// variants. All mutable controller state lives here, owned by the single
/// control thread; the encoder's interrupt-side counter is behind the
/// `PulseCounter` drain.
pub struct DriveCore<D: DigitalIo, W: PwmOut, P: PulseCounter> {
    pub(crate) dio: D,
    pub(crate) pwm: W,
    pub(crate) encoder: P,
    pub(crate) pins: PinMap,
    pub(crate) safety: SafetyCfg,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) period_us: u64,
    pub(crate) max_velocity_mps: f32,

    pub(crate) state: Movement,
    pub(crate) estimator: FeedbackEstimator,
    pub(crate) gains: PidGains,
    pub(crate) out_duty: f32,
    pub(crate) control_active: bool,
    pub(crate) manual_duty: u8,
    pub(crate) timer: TimerCfg,

    pub(crate) edge_hits: u8,
    pub(crate) move_start_ms: u64,
}

impl<D: DigitalIo, W: PwmOut, P: PulseCounter> core::fmt::Debug for DriveCore<D, W, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DriveCore")
            .field("state", &self.state)
            .field("target_mps", &self.estimator.target_mps())
            .field("velocity_mps", &self.estimator.velocity_mps())
            .field("out_duty", &self.out_duty)
            .finish()
    }
}

impl<D: DigitalIo, W: PwmOut, P: PulseCounter> DriveCore<D, W, P> {
    /// Apply one decoded command. Command handling only mutates
    /// configuration and requested state; actuation waits for the next tick.
    pub fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::GoRight => self.request(Movement::Right),
            Command::GoLeft => self.request(Movement::Left),
            Command::Stop => self.request(Movement::Stopped),
            Command::SetTargetVelocity(v) => {
                let target = self.max_velocity_mps * f32::from(v) / 255.0;
                self.estimator.set_target(target);
                tracing::debug!(target_mps = target, "target velocity updated");
            }
            Command::ToggleControl => {
                self.control_active = !self.control_active;
                tracing::debug!(active = self.control_active, "closed-loop control toggled");
            }
            Command::SetGain(axis, v) => {
                let gain = f32::from(v) * MAX_GAIN / 255.0;
                self.gains.set_axis(axis, gain);
                tracing::debug!(?axis, gain, "gain updated");
            }
            Command::SetManualDuty(v) => self.manual_duty = v,
            Command::SetTimerDuration(v) => self.timer.duration_s = f32::from(v),
            Command::ToggleTimer => {
                self.timer.enabled = !self.timer.enabled;
                tracing::debug!(enabled = self.timer.enabled, "move timer toggled");
            }
        }
    }

    /// Request a movement state.
    ///
    /// - Re-selecting the active direction is a no-op: `move_start_ms` and
    ///   `edge_hits` survive.
    /// - A direction change stamps the move start, clears the edge counter,
    ///   and re-arms the estimator.
    /// - `Stopped` always runs its entry action, even when already Stopped.
    pub fn request(&mut self, requested: Movement) {
        match requested {
            Movement::Stopped => {
                self.estimator.reset();
                self.edge_hits = 0;
            }
            _ if requested != self.state => {
                let now = self.clock.ms_since(self.epoch);
                self.move_start_ms = now;
                self.edge_hits = 0;
                self.estimator.init(now);
                tracing::info!(state = %requested, "movement started");
            }
            _ => {}
        }
        self.state = requested;
    }

    /// One control cycle. Paces itself with the configured tick period.
    pub fn tick(&mut self) -> Result<TickStatus> {
        let now = self.clock.ms_since(self.epoch);

        if self.state.is_moving()
            && let Some(reason) = self.evaluate_stop(now)?
        {
            tracing::info!(reason = %reason, state = %self.state, "stop condition tripped");
            self.request(Movement::Stopped);
            self.write_neutral()?;
            self.clock.sleep(Duration::from_micros(self.period_us));
            return Ok(TickStatus::Stopped(reason));
        }

        let status = match self.state {
            Movement::Stopped => {
                self.write_neutral()?;
                TickStatus::Idle
            }
            dir => {
                self.write_direction(dir)?;
                if self.estimator.is_initialized() {
                    let pulses = self.encoder.drain();
                    self.estimator.sample(pulses, now);
                    self.out_duty = self.gains.output(self.estimator.errors());
                }
                let duty = if self.control_active {
                    (self.out_duty * 255.0) as u8
                } else {
                    self.manual_duty
                };
                self.write_duty(duty)?;
                tracing::trace!(
                    duty,
                    velocity_mps = self.estimator.velocity_mps(),
                    "drive tick"
                );
                TickStatus::Moving(dir)
            }
        };

        self.clock.sleep(Duration::from_micros(self.period_us));
        Ok(status)
    }

    /// Park the vehicle: transition to Stopped and write the neutral pattern.
    pub fn halt(&mut self) -> Result<()> {
        self.request(Movement::Stopped);
        self.write_neutral()
    }

    #[inline]
    pub fn state(&self) -> Movement {
        self.state
    }

    /// Diagnostic view of the full controller state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            target_mps: self.estimator.target_mps(),
            velocity_mps: self.estimator.velocity_mps(),
            err: *self.estimator.errors(),
            out_duty: self.out_duty,
            gains: self.gains,
            control_active: self.control_active,
            manual_duty: self.manual_duty,
            timer_enabled: self.timer.enabled,
            timer_duration_s: self.timer.duration_s,
            edge_hits: self.edge_hits,
        }
    }

    // ── Private: stop evaluation and actuation ──────────────────────────────

    /// Evaluate the three stop conditions in order; first trip wins.
    fn evaluate_stop(&mut self, now: u64) -> Result<Option<StopReason>> {
        // 1) feedback staleness
        if self.estimator.time_reading_zero_s(now) > self.safety.max_zero_read_s {
            return Ok(Some(StopReason::Stall));
        }

        // 2) edge sensor on the side we are moving toward, debounced by
        //    cumulative count
        let edge_pin = match self.state {
            Movement::Left => Some(self.pins.edge_left),
            Movement::Right => Some(self.pins.edge_right),
            Movement::Stopped => None,
        };
        if let Some(pin) = edge_pin {
            let level = self
                .dio
                .read(pin)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("edge sensor read")?;
            if self.edge_active(level) {
                self.edge_hits = self.edge_hits.saturating_add(1);
            }
        }
        if self.edge_hits > self.safety.edge_hits_to_stop {
            return Ok(Some(StopReason::EdgeDetected));
        }

        // 3) optional move-duration limit
        if self.timer.enabled {
            let elapsed_s = now.saturating_sub(self.move_start_ms) as f32 * 1e-3;
            if elapsed_s >= self.timer.duration_s {
                return Ok(Some(StopReason::TimerElapsed));
            }
        }

        Ok(None)
    }

    #[inline]
    fn edge_active(&self, level: Level) -> bool {
        if self.safety.edge_active_low {
            level.is_low()
        } else {
            !level.is_low()
        }
    }

    fn write_direction(&mut self, dir: Movement) -> Result<()> {
        let (a, b, c, d) = match dir {
            Movement::Right => (Level::Low, Level::High, Level::High, Level::Low),
            Movement::Left => (Level::High, Level::Low, Level::Low, Level::High),
            Movement::Stopped => (Level::Low, Level::Low, Level::Low, Level::Low),
        };
        let writes = [
            (self.pins.in1, a),
            (self.pins.in2, b),
            (self.pins.in3, c),
            (self.pins.in4, d),
        ];
        for (pin, level) in writes {
            self.dio
                .write(pin, level)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("direction pin write")?;
        }
        Ok(())
    }

    fn write_duty(&mut self, duty: u8) -> Result<()> {
        for channel in [self.pins.pwm_a, self.pins.pwm_b] {
            self.pwm
                .set_duty(channel, duty)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("pwm write")?;
        }
        Ok(())
    }

    /// Neutral/off pattern: all direction pins low, both channels at zero.
    fn write_neutral(&mut self) -> Result<()> {
        self.write_direction(Movement::Stopped)?;
        self.write_duty(0)
    }
}

//! Runtime configuration for the drive core.
//!
//! These are the structs `DriveCore` is built from; the TOML-facing schema
//! lives in `rover_config` and converts into these via `conversions`.
//! Defaults are the firmware's power-on state.

use crate::pid::PidGains;

/// GPIO assignment used by the actuation path. The encoder pin is owned by
/// the `PulseCounter` implementation and never appears here.
#[derive(Debug, Clone, Copy)]
pub struct PinMap {
    pub in1: u8,
    pub in2: u8,
    pub in3: u8,
    pub in4: u8,
    pub pwm_a: u8,
    pub pwm_b: u8,
    pub edge_left: u8,
    pub edge_right: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            in1: 25,
            in2: 26,
            in3: 27,
            in4: 14,
            pwm_a: 0,
            pwm_b: 1,
            edge_left: 34,
            edge_right: 35,
        }
    }
}

/// Wheel and encoder geometry for the pulse-to-distance conversion.
#[derive(Debug, Clone, Copy)]
pub struct GeometryCfg {
    pub wheel_radius_m: f32,
    pub pulses_per_rev: f32,
    /// Full-scale velocity; command payload 255 maps to this.
    pub max_velocity_mps: f32,
}

impl GeometryCfg {
    #[inline]
    pub fn wheel_circumference_m(&self) -> f32 {
        2.0 * core::f32::consts::PI * self.wheel_radius_m
    }
}

impl Default for GeometryCfg {
    fn default() -> Self {
        Self {
            wheel_radius_m: 0.00325,
            pulses_per_rev: 20.0,
            max_velocity_mps: 1.0,
        }
    }
}

/// Controller configuration (gains, target, duty source, tick rate).
#[derive(Debug, Clone, Copy)]
pub struct ControlCfg {
    pub gains: PidGains,
    pub target_velocity_mps: f32,
    /// When false the PID output is ignored and `manual_duty` drives the PWM.
    pub control_active: bool,
    pub manual_duty: u8,
    /// Control loop rate; 20 Hz is a 50 ms tick.
    pub tick_rate_hz: u32,
}

impl Default for ControlCfg {
    fn default() -> Self {
        Self {
            gains: PidGains::default(),
            target_velocity_mps: 0.1,
            control_active: true,
            manual_duty: 255,
            tick_rate_hz: 20,
        }
    }
}

/// Stop-condition thresholds.
#[derive(Debug, Clone, Copy)]
pub struct SafetyCfg {
    /// Seconds of zero encoder feedback tolerated while a move is active.
    pub max_zero_read_s: f32,
    /// Cumulative edge-sensor hits tolerated; the trip is strictly above this,
    /// so the default of 2 stops on the third hit.
    pub edge_hits_to_stop: u8,
    /// Treat a low level as the sensor's active state.
    pub edge_active_low: bool,
}

impl Default for SafetyCfg {
    fn default() -> Self {
        Self {
            max_zero_read_s: 0.5,
            edge_hits_to_stop: 2,
            edge_active_low: true,
        }
    }
}

/// Optional move-duration limit.
#[derive(Debug, Clone, Copy)]
pub struct TimerCfg {
    pub enabled: bool,
    pub duration_s: f32,
}

impl Default for TimerCfg {
    fn default() -> Self {
        Self {
            enabled: false,
            duration_s: 12.0,
        }
    }
}

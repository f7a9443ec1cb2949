#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the drive controller.
//!
//! `Config` and its sub-structs are deserialized from TOML and validated.
//! Every field has a default matching the firmware's power-on state, so an
//! empty file is a valid configuration.

use serde::Deserialize;

/// GPIO assignment for the motor bridge, sensors, and encoder.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Pins {
    /// H-bridge direction inputs, left motor.
    pub in1: u8,
    pub in2: u8,
    /// H-bridge direction inputs, right motor.
    pub in3: u8,
    pub in4: u8,
    /// PWM channel ids for the two enable lines.
    pub pwm_a: u8,
    pub pwm_b: u8,
    /// GPIO pins carrying the PWM channels (enable lines of the bridge).
    pub ena: u8,
    pub enb: u8,
    /// Edge sensor digital outputs, one per side.
    pub edge_left: u8,
    pub edge_right: u8,
    /// Encoder pulse input.
    pub encoder: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            in1: 25,
            in2: 26,
            in3: 27,
            in4: 14,
            pwm_a: 0,
            pwm_b: 1,
            ena: 4,
            enb: 5,
            edge_left: 34,
            edge_right: 35,
            encoder: 32,
        }
    }
}

/// Wheel and encoder geometry used for the pulse-to-distance conversion.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Geometry {
    pub wheel_radius_m: f32,
    pub pulses_per_rev: f32,
    /// Full-scale velocity; command payload 255 maps to this.
    pub max_velocity_mps: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            wheel_radius_m: 0.00325,
            pulses_per_rev: 20.0,
            max_velocity_mps: 1.0,
        }
    }
}

/// Controller gains and drive defaults.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Control {
    pub gain_p: f32,
    pub gain_i: f32,
    pub gain_d: f32,
    pub target_velocity_mps: f32,
    /// When false the PID output is ignored and `manual_duty` drives the PWM.
    pub control_active: bool,
    pub manual_duty: u8,
    /// Control loop rate; 20 Hz is a 50 ms tick.
    pub tick_rate_hz: u32,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            gain_p: 2.0,
            gain_i: 1.0,
            gain_d: 0.0,
            target_velocity_mps: 0.1,
            control_active: true,
            manual_duty: 255,
            tick_rate_hz: 20,
        }
    }
}

/// Stop-condition thresholds.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Safety {
    /// Seconds of zero encoder feedback tolerated while a move is active.
    pub max_zero_read_s: f32,
    /// Cumulative edge-sensor hits tolerated before stopping (trip is strictly above).
    pub edge_hits_to_stop: u8,
    /// Treat a low level as the sensor's active state.
    pub edge_active_low: bool,
}

impl Default for Safety {
    fn default() -> Self {
        Self {
            max_zero_read_s: 0.5,
            edge_hits_to_stop: 2,
            edge_active_low: true,
        }
    }
}

/// Optional move-duration limit.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Timer {
    pub enabled: bool,
    pub duration_s: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            enabled: false,
            duration_s: 12.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub geometry: Geometry,
    pub control: Control,
    pub safety: Safety,
    pub timer: Timer,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Geometry
        if !(self.geometry.wheel_radius_m.is_finite() && self.geometry.wheel_radius_m > 0.0) {
            eyre::bail!("geometry.wheel_radius_m must be > 0");
        }
        if !(self.geometry.pulses_per_rev.is_finite() && self.geometry.pulses_per_rev > 0.0) {
            eyre::bail!("geometry.pulses_per_rev must be > 0");
        }
        if !(self.geometry.max_velocity_mps.is_finite() && self.geometry.max_velocity_mps > 0.0) {
            eyre::bail!("geometry.max_velocity_mps must be > 0");
        }

        // Control
        for (name, g) in [
            ("gain_p", self.control.gain_p),
            ("gain_i", self.control.gain_i),
            ("gain_d", self.control.gain_d),
        ] {
            if !g.is_finite() || g < 0.0 {
                eyre::bail!("control.{name} must be finite and >= 0");
            }
        }
        if !self.control.target_velocity_mps.is_finite()
            || self.control.target_velocity_mps < 0.0
            || self.control.target_velocity_mps > self.geometry.max_velocity_mps
        {
            eyre::bail!("control.target_velocity_mps must be in [0, geometry.max_velocity_mps]");
        }
        if self.control.tick_rate_hz == 0 {
            eyre::bail!("control.tick_rate_hz must be > 0");
        }
        if self.control.tick_rate_hz > 1000 {
            eyre::bail!("control.tick_rate_hz is unreasonably high (>1kHz)");
        }

        // Safety
        if !(self.safety.max_zero_read_s.is_finite() && self.safety.max_zero_read_s > 0.0) {
            eyre::bail!("safety.max_zero_read_s must be > 0");
        }

        // Timer
        if !(self.timer.duration_s.is_finite() && self.timer.duration_s >= 0.0) {
            eyre::bail!("timer.duration_s must be >= 0");
        }

        // Pins: the PWM channels must differ, as must the edge sensors.
        if self.pins.pwm_a == self.pins.pwm_b {
            eyre::bail!("pins.pwm_a and pins.pwm_b must differ");
        }
        if self.pins.edge_left == self.pins.edge_right {
            eyre::bail!("pins.edge_left and pins.edge_right must differ");
        }

        Ok(())
    }
}

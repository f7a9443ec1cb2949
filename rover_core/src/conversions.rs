//! `From` implementations bridging `rover_config` types to `rover_core` types.

use crate::config::{ControlCfg, GeometryCfg, PinMap, SafetyCfg, TimerCfg};
use crate::pid::PidGains;

impl From<&rover_config::Pins> for PinMap {
    fn from(c: &rover_config::Pins) -> Self {
        Self {
            in1: c.in1,
            in2: c.in2,
            in3: c.in3,
            in4: c.in4,
            pwm_a: c.pwm_a,
            pwm_b: c.pwm_b,
            edge_left: c.edge_left,
            edge_right: c.edge_right,
        }
    }
}

impl From<&rover_config::Geometry> for GeometryCfg {
    fn from(c: &rover_config::Geometry) -> Self {
        Self {
            wheel_radius_m: c.wheel_radius_m,
            pulses_per_rev: c.pulses_per_rev,
            max_velocity_mps: c.max_velocity_mps,
        }
    }
}

impl From<&rover_config::Control> for ControlCfg {
    fn from(c: &rover_config::Control) -> Self {
        Self {
            gains: PidGains {
                p: c.gain_p,
                i: c.gain_i,
                d: c.gain_d,
            },
            target_velocity_mps: c.target_velocity_mps,
            control_active: c.control_active,
            manual_duty: c.manual_duty,
            tick_rate_hz: c.tick_rate_hz,
        }
    }
}

impl From<&rover_config::Safety> for SafetyCfg {
    fn from(c: &rover_config::Safety) -> Self {
        Self {
            max_zero_read_s: c.max_zero_read_s,
            edge_hits_to_stop: c.edge_hits_to_stop,
            edge_active_low: c.edge_active_low,
        }
    }
}

impl From<&rover_config::Timer> for TimerCfg {
    fn from(c: &rover_config::Timer) -> Self {
        Self {
            enabled: c.enabled,
            duration_s: c.duration_s,
        }
    }
}

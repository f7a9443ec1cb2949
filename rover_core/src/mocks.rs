//! Test and helper mocks for rover_core.

use rover_traits::{DigitalIo, Level, PulseCounter, PwmOut};

/// A pulse counter that never reports pulses; useful when exercising the
/// actuation path without encoder feedback.
pub struct NoopPulseCounter;

impl PulseCounter for NoopPulseCounter {
    fn drain(&mut self) -> u32 {
        0
    }
}

/// Digital I/O that accepts every write and reads every pin as inactive
/// (high, matching pulled-up sensors).
pub struct NoopDigitalIo;

impl DigitalIo for NoopDigitalIo {
    fn read(&mut self, _pin: u8) -> Result<Level, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Level::High)
    }
    fn write(
        &mut self,
        _pin: u8,
        _level: Level,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// PWM sink that discards writes.
pub struct NoopPwm;

impl PwmOut for NoopPwm {
    fn set_duty(
        &mut self,
        _channel: u8,
        _duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

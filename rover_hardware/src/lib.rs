//! I/O backends for the drive controller.
//!
//! Two variants of the capability traits in `rover_traits`, chosen at
//! composition time: an in-memory simulated board (always available) and a
//! Raspberry Pi GPIO backend behind the `hardware` feature.

pub mod error;
#[cfg(feature = "hardware")]
pub mod pi;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rover_traits::{DigitalIo, Level, PulseCounter, PwmOut};

/// Simulated pin bank: 256 latched digital levels, readable and writable.
///
/// Inputs the controller only reads (edge sensors) are scripted with
/// `set_input`; outputs it writes (direction pins) can be inspected with
/// `level`.
pub struct SimulatedPins {
    levels: [Level; 256],
}

impl Default for SimulatedPins {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPins {
    /// All pins start high, matching pulled-up inactive sensors.
    pub fn new() -> Self {
        Self {
            levels: [Level::High; 256],
        }
    }

    /// Script an input pin (e.g. drive an edge sensor low).
    pub fn set_input(&mut self, pin: u8, level: Level) {
        self.levels[pin as usize] = level;
    }

    /// Last level written to or scripted on a pin.
    pub fn level(&self, pin: u8) -> Level {
        self.levels[pin as usize]
    }
}

impl DigitalIo for SimulatedPins {
    fn read(&mut self, pin: u8) -> Result<Level, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.levels[pin as usize])
    }

    fn write(
        &mut self,
        pin: u8,
        level: Level,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.levels[pin as usize] = level;
        Ok(())
    }
}

/// Simulated PWM bank recording the last duty byte per channel.
pub struct SimulatedPwm {
    duty: [u8; 8],
}

impl Default for SimulatedPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPwm {
    pub fn new() -> Self {
        Self { duty: [0; 8] }
    }

    pub fn duty(&self, channel: u8) -> u8 {
        self.duty[channel as usize]
    }
}

impl PwmOut for SimulatedPwm {
    fn set_duty(
        &mut self,
        channel: u8,
        duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.duty[channel as usize] = duty;
        tracing::trace!(channel, duty, "pwm write (simulated)");
        Ok(())
    }
}

/// Simulated encoder counter.
///
/// Clones share one atomic count, so a test (or a simulated wheel on another
/// thread) feeds pulses through one handle while the control loop drains
/// through the other. `drain` is the same fetch-and-reset the interrupt
/// backend uses, so the concurrency discipline is identical in both variants.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEncoder {
    count: Arc<AtomicU32>,
}

impl SimulatedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate pulses as the interrupt handler would.
    pub fn feed(&self, pulses: u32) {
        self.count.fetch_add(pulses, Ordering::AcqRel);
    }
}

impl PulseCounter for SimulatedEncoder {
    fn drain(&mut self) -> u32 {
        self.count.swap(0, Ordering::AcqRel)
    }
}

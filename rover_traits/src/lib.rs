pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Logic level on a digital pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Active-low inputs report `Low` when asserted.
    #[inline]
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

/// Numbered digital pin access (direction outputs, edge-sensor inputs).
pub trait DigitalIo {
    fn read(&mut self, pin: u8) -> Result<Level, Box<dyn std::error::Error + Send + Sync>>;
    fn write(
        &mut self,
        pin: u8,
        level: Level,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// PWM duty output per motor channel, as a raw duty byte (0 = off, 255 = full).
pub trait PwmOut {
    fn set_duty(
        &mut self,
        channel: u8,
        duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Encoder pulse accumulator fed by an interrupt source.
pub trait PulseCounter {
    /// Return the pulses accumulated since the previous drain and reset the
    /// count to zero. The read-and-reset must be atomic with respect to the
    /// interrupt source; a lost or doubled increment skews one velocity
    /// sample.
    fn drain(&mut self) -> u32;
}

impl<T: DigitalIo + ?Sized> DigitalIo for Box<T> {
    fn read(&mut self, pin: u8) -> Result<Level, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read(pin)
    }
    fn write(
        &mut self,
        pin: u8,
        level: Level,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).write(pin, level)
    }
}

impl<T: PwmOut + ?Sized> PwmOut for Box<T> {
    fn set_duty(
        &mut self,
        channel: u8,
        duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_duty(channel, duty)
    }
}

impl<T: PulseCounter + ?Sized> PulseCounter for Box<T> {
    fn drain(&mut self) -> u32 {
        (**self).drain()
    }
}

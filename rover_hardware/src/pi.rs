//! Raspberry Pi GPIO backend (feature `hardware`).
//!
//! Direction pins are plain outputs, edge sensors are pulled-up inputs, the
//! motor duty goes out as software PWM, and the encoder feeds an atomic
//! counter from a rising-edge interrupt. The control loop drains that counter
//! with a fetch-and-reset; nothing else may touch it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rppal::gpio::{Gpio, InputPin, OutputPin, Trigger};

use crate::error::HwError;
use rover_traits::{DigitalIo, Level, PulseCounter, PwmOut};

/// Motor driver PWM carrier frequency.
const PWM_FREQ_HZ: f64 = 20_000.0;

fn gpio() -> Result<Gpio, HwError> {
    Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))
}

/// Digital pin bank over the Pi's GPIO header.
pub struct PiPins {
    outputs: HashMap<u8, OutputPin>,
    inputs: HashMap<u8, InputPin>,
}

impl PiPins {
    /// Claim `outputs` as push-pull outputs and `inputs` as pulled-up inputs.
    pub fn new(outputs: &[u8], inputs: &[u8]) -> Result<Self, HwError> {
        let gpio = gpio()?;
        let mut out_map = HashMap::new();
        for &pin in outputs {
            let p = gpio
                .get(pin)
                .map_err(|e| HwError::Gpio(format!("claim output {pin}: {e}")))?
                .into_output();
            out_map.insert(pin, p);
        }
        let mut in_map = HashMap::new();
        for &pin in inputs {
            let p = gpio
                .get(pin)
                .map_err(|e| HwError::Gpio(format!("claim input {pin}: {e}")))?
                .into_input_pullup();
            in_map.insert(pin, p);
        }
        Ok(Self {
            outputs: out_map,
            inputs: in_map,
        })
    }
}

impl DigitalIo for PiPins {
    fn read(&mut self, pin: u8) -> Result<Level, Box<dyn std::error::Error + Send + Sync>> {
        let p = self.inputs.get(&pin).ok_or(HwError::UnmappedPin(pin))?;
        Ok(if p.is_low() { Level::Low } else { Level::High })
    }

    fn write(
        &mut self,
        pin: u8,
        level: Level,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let p = self
            .outputs
            .get_mut(&pin)
            .ok_or(HwError::UnmappedPin(pin))?;
        match level {
            Level::Low => p.set_low(),
            Level::High => p.set_high(),
        }
        Ok(())
    }
}

/// Software PWM on one GPIO pin per motor channel.
pub struct PiPwm {
    channels: HashMap<u8, OutputPin>,
}

impl PiPwm {
    /// `channels` maps a logical channel id to the GPIO pin driving it.
    pub fn new(channels: &[(u8, u8)]) -> Result<Self, HwError> {
        let gpio = gpio()?;
        let mut map = HashMap::new();
        for &(channel, pin) in channels {
            let p = gpio
                .get(pin)
                .map_err(|e| HwError::Gpio(format!("claim pwm pin {pin}: {e}")))?
                .into_output_low();
            map.insert(channel, p);
        }
        Ok(Self { channels: map })
    }
}

impl PwmOut for PiPwm {
    fn set_duty(
        &mut self,
        channel: u8,
        duty: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let p = self
            .channels
            .get_mut(&channel)
            .ok_or(HwError::UnmappedPin(channel))?;
        p.set_pwm_frequency(PWM_FREQ_HZ, f64::from(duty) / 255.0)
            .map_err(|e| HwError::Pwm(e.to_string()))?;
        Ok(())
    }
}

/// Encoder counter incremented from a rising-edge interrupt.
pub struct PiEncoder {
    // Held so the interrupt stays registered for the counter's lifetime.
    _pin: InputPin,
    count: Arc<AtomicU32>,
}

impl PiEncoder {
    pub fn new(pin: u8) -> Result<Self, HwError> {
        let gpio = gpio()?;
        let mut p = gpio
            .get(pin)
            .map_err(|e| HwError::Gpio(format!("claim encoder pin {pin}: {e}")))?
            .into_input_pullup();
        let count = Arc::new(AtomicU32::new(0));
        let isr_count = count.clone();
        p.set_async_interrupt(Trigger::RisingEdge, move |_| {
            isr_count.fetch_add(1, Ordering::AcqRel);
        })
        .map_err(|e| HwError::Gpio(format!("encoder interrupt: {e}")))?;
        tracing::debug!(pin, "encoder interrupt armed");
        Ok(Self { _pin: p, count })
    }
}

impl PulseCounter for PiEncoder {
    fn drain(&mut self) -> u32 {
        self.count.swap(0, Ordering::AcqRel)
    }
}

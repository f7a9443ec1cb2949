use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DriveError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Why the stop evaluator parked the vehicle. A normal, safe outcome
/// reported through `TickStatus`, not an error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    #[error("no encoder feedback while moving")]
    Stall,
    #[error("edge sensor hit threshold")]
    EdgeDetected,
    #[error("move duration limit elapsed")]
    TimerElapsed,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing digital io")]
    MissingDigitalIo,
    #[error("missing pwm output")]
    MissingPwm,
    #[error("missing pulse counter")]
    MissingPulseCounter,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core drive-control logic (hardware-agnostic).
//!
//! This crate is the closed-loop motion controller for a small wheeled
//! vehicle: it turns a target velocity and a directional command into a
//! motor duty cycle using encoder pulse feedback, while enforcing three
//! independent stop conditions (feedback staleness, edge-sensor hits, move
//! duration). All hardware interaction goes through the capability traits
//! in `rover_traits`.
//!
//! ## Architecture
//!
//! - **Commands**: byte-protocol decoder (`command` module)
//! - **Estimation**: pulses → distance → velocity + PID error terms
//!   (`estimator` module)
//! - **Control**: saturated PID duty output (`pid` module)
//! - **State**: Right/Left/Stopped machine with reset-on-transition
//!   (`movement` + `DriveCore::request`)
//! - **Safety**: composite stop evaluation, first trip wins (`DriveCore`)
//! - **Orchestration**: fixed-period tick loop (`runner` module)

pub mod builder;
pub mod command;
pub mod config;
pub mod conversions;
pub mod core;
pub mod error;
pub mod estimator;
pub mod hw_error;
pub mod mocks;
pub mod movement;
pub mod pid;
pub mod runner;
pub mod status;
pub mod util;

pub use builder::{Drive, DriveBuilder, DriveG, build_drive};
pub use command::Command;
pub use config::{ControlCfg, GeometryCfg, PinMap, SafetyCfg, TimerCfg};
pub use crate::core::DriveCore;
pub use error::{BuildError, DriveError, Result, StopReason};
pub use estimator::FeedbackEstimator;
pub use movement::Movement;
pub use pid::{ErrorTerms, GainAxis, PidGains, clamp01};
pub use status::{Snapshot, TickStatus};

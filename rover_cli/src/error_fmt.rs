//! Human-readable error descriptions and structured JSON error formatting.

use rover_core::{BuildError, DriveError};

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingDigitalIo => {
                "What happened: No digital I/O was provided to the drive controller.\nLikely causes: GPIO backend failed to initialize or was not wired into the builder.\nHow to fix: Ensure the pin bank is created successfully and passed via with_digital_io(...).".to_string()
            }
            BuildError::MissingPwm => {
                "What happened: No PWM output was provided to the drive controller.\nLikely causes: PWM backend failed to initialize or was not wired into the builder.\nHow to fix: Ensure the PWM channels are created successfully and passed via with_pwm(...).".to_string()
            }
            BuildError::MissingPulseCounter => {
                "What happened: No encoder pulse counter was provided.\nLikely causes: Encoder interrupt failed to arm or was not wired into the builder.\nHow to fix: Ensure the encoder is created successfully and passed via with_pulse_counter(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(de) = err.downcast_ref::<DriveError>() {
        if let DriveError::Config(msg) = de {
            return format!(
                "What happened: Configuration problem ({msg}).\nLikely causes: Pin numbers in the config do not match the claimed pins.\nHow to fix: Check the [pins] section against the wiring."
            );
        }
        return format!(
            "What happened: {de}.\nLikely causes: Wiring or GPIO permission problems.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open direction") || lower.contains("open pwm") || lower.contains("encoder")
    {
        return "What happened: Failed to initialize hardware pins.\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO.".to_string();
    }

    if lower.contains("invalid configuration") || lower.contains("parse config") {
        return "What happened: Configuration is invalid or incomplete.\nLikely causes: Malformed TOML or out-of-range values.\nHow to fix: Edit the config file and try again.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: configuration problems return 2, everything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    if matches!(err.downcast_ref::<DriveError>(), Some(DriveError::Config(_))) {
        return 2;
    }
    let lower = err.to_string().to_ascii_lowercase();
    if lower.contains("invalid configuration") || lower.contains("parse config") {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    let reason = if err.downcast_ref::<BuildError>().is_some() {
        "BuildError"
    } else if err.downcast_ref::<DriveError>().is_some() {
        "DriveError"
    } else {
        "Error"
    };
    serde_json::json!({ "reason": reason, "message": humanize(err) }).to_string()
}

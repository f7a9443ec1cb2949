//! Maps `Box<dyn Error>` from trait boundaries to typed `DriveError`.
//!
//! The traits in `rover_traits` use `Box<dyn Error + Send + Sync>` for
//! maximum flexibility; this module converts those to our typed error enum,
//! with an optional feature-gated path for `rover_hardware::HwError`
//! downcasting.

use crate::error::DriveError;

/// Map a trait-boundary error to a typed `DriveError`.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> DriveError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<rover_hardware::error::HwError>() {
            return match hw {
                rover_hardware::error::HwError::UnmappedPin(_) => {
                    DriveError::Config(hw.to_string())
                }
                other => DriveError::HardwareFault(other.to_string()),
            };
        }
    }

    DriveError::Hardware(e.to_string())
}

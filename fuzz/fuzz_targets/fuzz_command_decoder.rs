#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed frames must be silent no-ops, never panics.
    let _ = rover_core::Command::decode(data);
});

//! Fuzz target for reading expression attributes out of Rust source.
//!
//! Goal: the scanner should **never panic** on any input.
//! Text that is not valid Rust is an error, never a crash.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_attribute_scan
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = exprguard_repo::fuzz::scan_source(text);
    }
});

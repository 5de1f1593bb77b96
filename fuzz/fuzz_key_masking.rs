//! Fuzz target for the API-key masking routine.
//!
//! Run with: cargo +nightly fuzz run fuzz_key_masking
//!
//! Masking runs on every outbound log line and on transport error text, so
//! it must never panic and must never let a key through once `?key=` is
//! present.

#![no_main]

use frostlink_core::protocol::mask_key;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let masked = mask_key(s);

        // Inputs without a key marker pass through untouched.
        if !s.contains("?key=") {
            assert_eq!(masked, s);
        }

        // Synthesized worst case: the whole input is a secret.
        let url = format!("https://h:1/system?key={s}");
        let masked = mask_key(&url);
        if !s.contains(' ') && !s.contains('?') && !s.is_empty() {
            assert!(!masked.contains(s));
        }
    }
});

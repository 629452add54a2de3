//! Fuzz target for value normalization.
//!
//! Checks that every normalizer is idempotent on arbitrary text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use utthan::normalize::{canonical_attendance, normalize_code, normalize_level, normalize_name};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let attendance = canonical_attendance(&input);
    assert_eq!(canonical_attendance(&attendance), attendance);

    let name = normalize_name(&input);
    assert_eq!(normalize_name(&name), name);

    let code = normalize_code(&input);
    assert_eq!(normalize_code(&code), code);

    let level = normalize_level(&input);
    assert_eq!(normalize_level(&level), level);
    assert!(!level.contains("LEVEL"));
});

//! Fuzz target for the sheet loader.
//!
//! The loader must return an error, never panic, on malformed CSV and
//! workbook bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use utthan::{Dataset, UtthanConfig};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let config = UtthanConfig::default().lenient();
    for suffix in [".csv", ".xlsx"] {
        if let Ok(mut temp_file) = tempfile::Builder::new().suffix(suffix).tempfile() {
            if temp_file.write_all(data).is_ok() {
                let _ = Dataset::load(temp_file.path(), &config);
            }
        }
    }
});

//! Fuzz target for the delimited reader.
//!
//! The reader must never panic on malformed input, whatever the delimiter.

#![no_main]

use designspace::Parser;
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = Parser::new().parse_file(temp_file.path());
        }
    }

    for delimiter in [b',', b'\t', b';', b'|'] {
        let _ = Parser::new().parse_bytes(data, delimiter);
    }
});

//! Fuzz target for locale-aware number parsing.
//!
//! Parsing must never panic, and anything accepted must be finite.

#![no_main]

use arbitrary::Arbitrary;
use designspace::{NumberLocale, NumberParser};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    decimal_separator: char,
    grouping_separator: char,
    grouping_size: u8,
    text: String,
}

fuzz_target!(|input: Input| {
    for locale in [NumberLocale::en_us(), NumberLocale::de_de(), NumberLocale::fr_fr()] {
        let parser = NumberParser::new(locale).unwrap();
        if let Some(value) = parser.parse(&input.text) {
            assert!(value.is_finite());
        }
    }

    let custom = NumberLocale {
        decimal_separator: input.decimal_separator,
        grouping_separator: input.grouping_separator,
        grouping_size: input.grouping_size as usize,
    };
    if let Ok(parser) = NumberParser::new(custom) {
        if let Some(value) = parser.parse(&input.text) {
            assert!(value.is_finite());
        }
    }
});

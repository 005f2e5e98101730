//! Fuzz target for importing and editing a data sheet.
//!
//! Arbitrary tables and cell edits must keep every design's discrete values
//! resolvable through the parameter's levels.

#![no_main]

use arbitrary::Arbitrary;
use designspace::{CellValue, DataSheet, DataTable, DesignId, ImportConfig, NoProgress};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    edits: Vec<(u8, u8, String)>,
}

fuzz_target!(|input: Input| {
    if input.headers.is_empty() || input.headers.len() > 16 || input.rows.len() > 256 {
        return;
    }
    let table = DataTable::new(input.headers, input.rows, b',');
    let Ok(mut sheet) = DataSheet::import(&table, &ImportConfig::default(), &mut NoProgress)
    else {
        return;
    };

    for (row, column, text) in input.edits.iter().take(32) {
        let count = sheet.design_count() as u64;
        if count == 0 {
            break;
        }
        let design = DesignId(*row as u64 % count + 1);
        let parameter = sheet.parameters()[*column as usize % sheet.parameter_count()].id();
        let _ = sheet.set_cell(design, parameter, text);
    }

    for parameter in sheet.parameters() {
        for design in sheet.designs() {
            match design.value(parameter.id()) {
                Some(CellValue::Text(text)) => {
                    assert!(!parameter.is_numeric());
                    assert!(parameter.index_of(text).is_some());
                }
                Some(CellValue::Number(_)) => {}
                None => panic!("design {} has no value for {}", design.id(), parameter.name()),
            }
        }
    }
});

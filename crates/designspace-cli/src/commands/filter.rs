//! Filter command - narrow the design space and list active designs.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use designspace::{CellValue, DataSheet, NumberParser, Parameter, ParameterId};

use super::GlobalOptions;
use crate::cli::RangeArg;

#[derive(Serialize)]
struct FilterOutput<'a> {
    active: usize,
    total: usize,
    designs: Vec<DesignRow<'a>>,
}

#[derive(Serialize)]
struct DesignRow<'a> {
    id: u64,
    values: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster: Option<&'a str>,
}

/// Turn a bound into an axis value. On a discrete parameter a level name
/// wins over a number, so a level called `10` is addressed by name; other
/// numbers are level indices. Numbers are read in the data's locale.
fn resolve_bound(parameter: &Parameter, bound: &str, parser: &NumberParser) -> Result<f64, String> {
    if !parameter.is_numeric() {
        if let Some(index) = parameter.index_of(bound) {
            return Ok(index as f64);
        }
    }
    match parser.parse(bound) {
        Some(value) => Ok(value),
        None if parameter.is_numeric() => Err(format!(
            "'{}' is not a number (parameter '{}' is numeric)",
            bound,
            parameter.name()
        )),
        None => Err(format!(
            "'{}' is neither a level nor an index of '{}'",
            bound,
            parameter.name()
        )),
    }
}

fn parameter_id(sheet: &DataSheet, name: &str) -> Result<ParameterId, Box<dyn std::error::Error>> {
    Ok(sheet.parameter_by_name(name)?.id())
}

pub fn run(
    file: PathBuf,
    ranges: Vec<RangeArg>,
    invert_filter: Vec<String>,
    invert_axis: Vec<String>,
    limit: usize,
    json_output: bool,
    options: &GlobalOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut explorer = super::open(&file, options)?;
    let index = explorer.add_chart("cli")?;

    // Resolve everything against the sheet before touching any filter.
    let sheet = explorer.sheet();
    let mut windows = Vec::with_capacity(ranges.len());
    for range in &ranges {
        let parameter = sheet.parameter_by_name(&range.name)?;
        let low = resolve_bound(parameter, &range.low, sheet.number_parser())?;
        let high = resolve_bound(parameter, &range.high, sheet.number_parser())?;
        windows.push((parameter.id(), low.min(high), low.max(high)));
    }
    let axis_inversions = invert_axis
        .iter()
        .map(|name| parameter_id(sheet, name))
        .collect::<Result<Vec<_>, _>>()?;
    let filter_inversions = invert_filter
        .iter()
        .map(|name| parameter_id(sheet, name))
        .collect::<Result<Vec<_>, _>>()?;

    let (chart, sheet) = explorer.chart_mut(index).ok_or("chart was not created")?;
    for id in axis_inversions {
        chart.set_axis_inverted(id, true, sheet)?;
    }
    for (id, low, high) in windows {
        chart.set_window(id, low, high, sheet)?;
    }
    for id in filter_inversions {
        chart.set_filter_inverted(id, true, sheet)?;
    }

    let sheet: &DataSheet = sheet;
    let active = chart.active_count(sheet);
    let total = sheet.design_count();

    if json_output {
        let designs = chart
            .active_designs(sheet)
            .map(|design| DesignRow {
                id: design.id().0,
                values: sheet
                    .parameters()
                    .iter()
                    .map(|p| {
                        let value = match design.value(p.id()) {
                            Some(CellValue::Number(v)) => serde_json::json!(v),
                            Some(CellValue::Text(s)) => serde_json::json!(s),
                            None => serde_json::Value::Null,
                        };
                        (p.name().to_string(), value)
                    })
                    .collect(),
                cluster: design
                    .cluster()
                    .and_then(|c| sheet.clusters().get(c))
                    .map(|c| c.name()),
            })
            .collect();
        let output = FilterOutput {
            active,
            total,
            designs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} of {} designs active",
        "Filter:".cyan().bold(),
        active.to_string().white().bold(),
        total
    );
    println!();

    let headers: Vec<String> = sheet
        .parameters()
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    println!("  {:>6}  {}", "id".dimmed(), headers.join("  ").yellow());
    for design in chart.active_designs(sheet).take(limit) {
        let row: Vec<String> = sheet
            .parameters()
            .iter()
            .map(|p| design.string_value(p.id()).into_owned())
            .collect();
        println!("  {:>6}  {}", design.id().to_string().cyan(), row.join("  "));
    }
    if active > limit {
        println!(
            "  {}",
            format!("... {} more (use --limit or --json)", active - limit).dimmed()
        );
    }

    Ok(())
}

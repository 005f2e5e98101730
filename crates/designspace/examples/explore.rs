//! Example: load a design table and narrow it down with filters.
//!
//! Usage:
//!   cargo run --example explore -- <file_path> <parameter> <low> <high>
//!
//! Example:
//!   cargo run --example explore -- designs.csv speed 0 4

use std::env;
use std::process;

use designspace::{DesignSpaceError, Explorer, ExplorerConfig};

fn main() -> designspace::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!("Usage: cargo run --example explore -- <file_path> <parameter> <low> <high>");
        process::exit(1);
    }

    let (low, high) = match (args[3].parse::<f64>(), args[4].parse::<f64>()) {
        (Ok(low), Ok(high)) => (low, high),
        _ => {
            eprintln!("Error: <low> and <high> must be numbers");
            process::exit(1);
        }
    };

    let mut explorer = Explorer::open(&args[1], ExplorerConfig::default())?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Design space: {}", args[1]);
    println!("{}", separator);

    for parameter in explorer.summary().parameters {
        let kind = if parameter.numeric { "numeric" } else { "discrete" };
        match (parameter.min, parameter.max) {
            (Some(min), Some(max)) => {
                println!("  {:<20} {:<9} {} .. {}", parameter.name, kind, min, max)
            }
            _ => println!("  {:<20} {:<9} (no values)", parameter.name, kind),
        }
    }

    let index = explorer.add_chart("main")?;
    let parameter = explorer.sheet().parameter_by_name(&args[2])?.id();
    let (chart, sheet) = explorer
        .chart_mut(index)
        .ok_or_else(|| DesignSpaceError::Config("chart missing".to_string()))?;
    chart.set_window(parameter, low, high, sheet)?;

    println!();
    println!(
        "{} of {} designs have {} in {} .. {}:",
        chart.active_count(sheet),
        sheet.design_count(),
        args[2],
        low,
        high
    );
    for design in chart.active_designs(sheet) {
        let row: Vec<String> = design.values().map(|(_, v)| v.to_string()).collect();
        println!("  #{:<6} {}", design.id(), row.join(", "));
    }

    Ok(())
}

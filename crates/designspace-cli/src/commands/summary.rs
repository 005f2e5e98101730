//! Summary command - show parameters, types and ranges.

use std::path::PathBuf;

use colored::Colorize;

use super::GlobalOptions;

pub fn run(
    file: PathBuf,
    json_output: bool,
    options: &GlobalOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let explorer = super::open(&file, options)?;
    let summary = explorer.summary();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Design space".cyan().bold(),
        file.display().to_string().white()
    );
    if let Some(source) = &summary.source {
        println!(
            "  Format: {}  Loaded: {}",
            source.format,
            source
                .loaded_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        );
        if options.verbose {
            println!("  Size:   {} bytes", source.size_bytes);
            println!("  Hash:   {}", source.hash.dimmed());
        }
    }
    println!(
        "  {} designs, {} parameters",
        summary.design_count.to_string().white().bold(),
        summary.parameter_count.to_string().white().bold()
    );
    println!();

    println!("{}", "Parameters:".yellow().bold());
    let width = summary
        .parameters
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    for parameter in &summary.parameters {
        let name = format!("{:<width$}", parameter.name, width = width);
        if parameter.numeric {
            let range = match (parameter.min, parameter.max) {
                (Some(min), Some(max)) => format!("{} .. {}", min, max),
                _ => "(no values)".to_string(),
            };
            println!("  {}  {}  {}", name.white(), "numeric ".green(), range);
        } else {
            println!(
                "  {}  {}  {} levels",
                name.white(),
                "discrete".blue(),
                parameter.levels.len()
            );
        }
    }

    Ok(())
}

//! Levels command - list discrete levels and their indices.

use std::path::PathBuf;

use colored::Colorize;
use designspace::Parameter;

use super::GlobalOptions;

pub fn run(
    file: PathBuf,
    parameter: Option<String>,
    json_output: bool,
    options: &GlobalOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let explorer = super::open(&file, options)?;
    let sheet = explorer.sheet();

    let parameters: Vec<&Parameter> = match &parameter {
        Some(name) => vec![sheet.parameter_by_name(name)?],
        None => sheet.parameters().iter().filter(|p| !p.is_numeric()).collect(),
    };

    if json_output {
        let levels: serde_json::Map<String, serde_json::Value> = parameters
            .iter()
            .map(|p| {
                let levels: Vec<&str> = p.discrete_levels().iter().collect();
                (p.name().to_string(), serde_json::json!(levels))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&levels)?);
        return Ok(());
    }

    if parameters.is_empty() {
        println!("{}", "No discrete parameters.".dimmed());
        return Ok(());
    }

    for parameter in parameters {
        println!("{}", parameter.name().yellow().bold());
        if parameter.is_numeric() {
            println!("  {}", "numeric, no levels".dimmed());
            continue;
        }
        for (index, level) in parameter.discrete_levels().iter().enumerate() {
            let count = sheet
                .designs()
                .filter(|d| parameter.index_of(&d.string_value(parameter.id())) == Some(index))
                .count();
            println!(
                "  {:>4}  {}  {}",
                index.to_string().cyan(),
                level.white(),
                format!("({} designs)", count).dimmed()
            );
        }
    }

    Ok(())
}

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use designspace::NumberLocale;

/// designspace: explore and filter tables of evaluated designs
#[derive(Parser)]
#[command(name = "designspace")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number format of the data (en-US, de-DE, fr-FR, de-CH)
    #[arg(long, global = true)]
    pub locale: Option<NumberLocale>,

    /// Field delimiter (default: auto-detect)
    #[arg(short, long, global = true)]
    pub delimiter: Option<char>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show parameters, their types and value ranges
    Summary {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the levels of discrete parameters with their indices
    Levels {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only show this parameter
        #[arg(short, long)]
        parameter: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter designs by parameter ranges and list the active ones
    Filter {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep designs with NAME between LOW and HIGH; discrete parameters
        /// accept level names or indices (repeatable)
        #[arg(short, long = "range", value_name = "NAME=LOW:HIGH")]
        ranges: Vec<RangeArg>,

        /// Keep designs outside the range of NAME instead (repeatable)
        #[arg(long = "invert-filter", value_name = "NAME")]
        invert_filter: Vec<String>,

        /// Invert the axis of NAME (repeatable)
        #[arg(long = "invert-axis", value_name = "NAME")]
        invert_axis: Vec<String>,

        /// Maximum number of designs to print
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A `NAME=LOW:HIGH` filter window. Bounds stay text until the parameter
/// type is known.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeArg {
    pub name: String,
    pub low: String,
    pub high: String,
}

impl std::str::FromStr for RangeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, bounds) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("Invalid range '{}'. Use NAME=LOW:HIGH.", s))?;
        let (low, high) = bounds
            .split_once(':')
            .ok_or_else(|| format!("Invalid range '{}'. Use NAME=LOW:HIGH.", s))?;

        if name.trim().is_empty() || low.trim().is_empty() || high.trim().is_empty() {
            return Err(format!("Invalid range '{}'. Use NAME=LOW:HIGH.", s));
        }

        Ok(RangeArg {
            name: name.trim().to_string(),
            low: low.trim().to_string(),
            high: high.trim().to_string(),
        })
    }
}

//! Configuration for import and axis construction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DesignSpaceError, Result};
use crate::input::{NumberLocale, ParserConfig};

/// How delimited text becomes a data sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Tokenizer settings.
    pub parser: ParserConfig,
    /// Number format of the cells.
    pub locale: NumberLocale,
    /// Digits shown on tick labels of new parameters.
    pub tic_label_digit_count: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            locale: NumberLocale::en_us(),
            tic_label_digit_count: 3,
        }
    }
}

/// Settings read once when an axis is created; the axis owns its copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisDefaults {
    /// Lower bound of a numeric axis that does not autofit.
    pub min: f64,
    /// Upper bound of a numeric axis that does not autofit.
    pub max: f64,
    /// Tick count of numeric axes.
    pub tick_count: usize,
    /// Fit numeric bounds to the data on creation and on data changes.
    pub autofit: bool,
    pub axis_inverted: bool,
    pub filter_inverted: bool,
}

impl Default for AxisDefaults {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            tick_count: 11,
            autofit: true,
            axis_inverted: false,
            filter_inverted: false,
        }
    }
}

impl AxisDefaults {
    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(DesignSpaceError::Config(
                "axis bounds must be finite".to_string(),
            ));
        }
        if self.tick_count < 2 {
            return Err(DesignSpaceError::Config(format!(
                "tick count must be at least 2, got {}",
                self.tick_count
            )));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub import: ImportConfig,
    pub axis: AxisDefaults,
}

impl ExplorerConfig {
    /// Load a JSON configuration file; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DesignSpaceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ExplorerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.import.locale.validate()?;
        self.axis.validate()
    }

    pub fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.import.locale = locale;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.import.parser.delimiter = Some(delimiter);
        self
    }

    pub fn with_axis_defaults(mut self, axis: AxisDefaults) -> Self {
        self.axis = axis;
        self
    }
}

//! CLI command implementations.

pub mod filter;
pub mod levels;
pub mod summary;

use std::path::{Path, PathBuf};

use designspace::{CancelFlag, Explorer, ExplorerConfig, NumberLocale, ProgressMonitor};

/// Options shared by every command.
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub locale: Option<NumberLocale>,
    pub delimiter: Option<char>,
    pub verbose: bool,
}

impl GlobalOptions {
    /// Build the explorer configuration: the config file if given, then
    /// command-line overrides.
    pub fn explorer_config(&self) -> Result<ExplorerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ExplorerConfig::load(path)?,
            None => ExplorerConfig::default(),
        };
        if let Some(locale) = &self.locale {
            config = config.with_locale(locale.clone());
        }
        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err(format!("Delimiter must be an ASCII character, got '{}'", delimiter).into());
            }
            config = config.with_delimiter(delimiter as u8);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Reports import progress in the log and stops when Ctrl-C is pressed.
struct ImportProgress {
    cancel: CancelFlag,
    total: usize,
    step: usize,
}

impl ProgressMonitor for ImportProgress {
    fn start(&mut self, total_rows: usize) {
        self.total = total_rows;
        self.step = (total_rows / 10).max(1);
        log::info!("importing {} rows", total_rows);
    }

    fn advance(&mut self, rows_done: usize) {
        if rows_done % self.step == 0 {
            log::debug!("{}/{} rows", rows_done, self.total);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_set()
    }
}

/// Open a data file with Ctrl-C cancelling the import.
pub fn open(file: &Path, options: &GlobalOptions) -> Result<Explorer, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    let config = options.explorer_config()?;

    let cancel = CancelFlag::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || handler.cancel())?;

    let mut progress = ImportProgress {
        cancel,
        total: 0,
        step: 1,
    };
    Ok(Explorer::open_with_progress(file, config, &mut progress)?)
}

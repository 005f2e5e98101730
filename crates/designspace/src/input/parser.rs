//! Delimited text reader with delimiter detection.

use std::cmp::Reverse;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::source::{DataTable, SourceMetadata, default_headers};
use crate::error::{DesignSpaceError, Result};

/// Candidate delimiters, in order of preference on a tie.
const DELIMITERS: &[u8] = &[b',', b';', b'|', b'\t'];

/// Lines inspected when guessing the delimiter.
const SAMPLE_LINES: usize = 10;

/// How a delimited file is tokenized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field separator; detected from the first lines when unset.
    pub delimiter: Option<u8>,
    /// First non-blank line names the columns.
    pub has_header: bool,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Reads delimited text files into a [`DataTable`].
///
/// Rows are returned as split by the tokenizer: short or long rows are left
/// alone so that the data sheet can decide how to treat them.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read a whole file, returning its rows and a description of the file
    /// including a content hash used to detect changes on reload.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|source| DesignSpaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };
        let table = self.parse_bytes(&contents, delimiter)?;

        log::debug!(
            "read {} rows x {} columns from {} (delimiter {:?})",
            table.row_count(),
            table.column_count(),
            path.display(),
            delimiter as char
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            content_hash(&contents),
            contents.len() as u64,
            format_name(delimiter).to_string(),
            table.row_count(),
            table.column_count(),
        );
        Ok((table, metadata))
    }

    /// Tokenize `bytes` with a known delimiter. Blank lines are skipped.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader
            .records()
            .filter(|record| !matches!(record, Ok(r) if r.iter().all(|f| f.trim().is_empty())))
            .map(|record| {
                record
                    .map(|r| r.iter().map(|f| f.trim().to_string()).collect::<Vec<_>>())
                    .map_err(DesignSpaceError::from)
            });

        let headers = if self.config.has_header {
            records.next().transpose()?
        } else {
            None
        };
        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let rows = records.take(limit).collect::<Result<Vec<_>>>()?;

        let headers = headers
            .unwrap_or_else(|| default_headers(rows.iter().map(Vec::len).max().unwrap_or(0)));
        if headers.is_empty() {
            return Err(DesignSpaceError::EmptyData("No columns found".to_string()));
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

/// SHA-256 of the raw file contents, prefixed with the algorithm name.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(bytes))
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b',' => "csv",
        b'\t' => "tsv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Guess the delimiter from the first non-blank lines.
///
/// A candidate must split the first line into at least two fields. Among
/// those, one that gives every sampled line the same width wins, then the
/// smallest spread of widths, then the most fields. Files where no candidate
/// splits the first line are read as a single comma-separated column.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let sample: Vec<&[u8]> = bytes
        .split(|&b| b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .take(SAMPLE_LINES)
        .collect();
    if sample.is_empty() {
        return Err(DesignSpaceError::EmptyData("No lines to analyze".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .rev()
        .filter_map(|&delimiter| {
            let widths: Vec<usize> = sample.iter().map(|line| field_count(line, delimiter)).collect();
            let first = widths[0];
            if first < 2 {
                return None;
            }
            let spread = widths.iter().max()? - widths.iter().min()?;
            Some((delimiter, (spread == 0, Reverse(spread), first)))
        })
        .max_by_key(|(_, score)| *score)
        .map(|(delimiter, _)| delimiter);

    Ok(best.unwrap_or(b','))
}

/// Fields on one line, ignoring delimiters inside double quotes.
fn field_count(line: &[u8], delimiter: u8) -> usize {
    let mut quoted = false;
    let separators = line
        .iter()
        .filter(|&&b| {
            if b == b'"' {
                quoted = !quoted;
            }
            b == delimiter && !quoted
        })
        .count();
    separators + 1
}

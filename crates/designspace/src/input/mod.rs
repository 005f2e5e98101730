//! Input parsing: delimited files, number formats and import progress.

mod number;
mod parser;
mod progress;
mod source;

pub use number::{NumberLocale, NumberParser};
pub use parser::{Parser, ParserConfig, content_hash};
pub use progress::{CancelFlag, NoProgress, ProgressMonitor};
pub use source::{DataTable, MISSING_VALUE, SourceMetadata, default_headers};

pub(crate) use source::cell_text;

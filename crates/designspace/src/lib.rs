//! designspace: a data model and filtering engine for exploring design spaces.
//!
//! A design space is a table where each row is a *design* (one evaluated
//! configuration) and each column a *parameter*. Columns are typed at import:
//! a column whose values all parse as numbers is numeric, anything else is
//! discrete and its values are encoded as indices into a sorted level set.
//!
//! # Core Concepts
//!
//! - **DataSheet**: owns parameters and designs and keeps them consistent
//!   through edits, re-imports and type changes
//! - **Axis / Filter**: every parameter axis carries an upper and a lower
//!   threshold; designs outside the window become inactive
//! - **Chart**: the axes over one data sheet, kept in sync with data changes
//! - **ClusterSet**: named groups of designs
//!
//! # Example
//!
//! ```no_run
//! use designspace::{Explorer, ExplorerConfig, FilterKind};
//!
//! let mut explorer = Explorer::open("designs.csv", ExplorerConfig::default()).unwrap();
//! let chart = explorer.add_chart("main").unwrap();
//!
//! let speed = explorer.sheet().parameter_by_name("speed").unwrap().id();
//! let (chart, sheet) = explorer.chart_mut(chart).unwrap();
//! chart.set_filter_value(speed, FilterKind::Upper, 4.0, sheet).unwrap();
//!
//! println!("{} designs active", chart.active_count(sheet));
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod sheet;

mod explorer;

pub use crate::explorer::{Explorer, ExplorerSummary, ParameterSummary};
pub use cluster::{Cluster, ClusterId, ClusterSet};
pub use config::{AxisDefaults, ExplorerConfig, ImportConfig};
pub use error::{DesignSpaceError, Result};
pub use filter::{Axis, AxisId, Chart, Filter, FilterId, FilterKind};
pub use input::{
    CancelFlag, DataTable, NoProgress, NumberLocale, NumberParser, Parser, ParserConfig,
    ProgressMonitor, SourceMetadata,
};
pub use sheet::{
    CellValue, ChangeSet, DataSheet, DataSheetEvent, DataSheetListener, Design, DesignId,
    Parameter, ParameterChange, ParameterId, ParameterKind, TypeChangeReport,
};

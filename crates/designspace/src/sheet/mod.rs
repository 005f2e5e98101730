//! The data sheet and its rows and columns.

mod datasheet;
mod design;
mod events;
mod parameter;

pub use datasheet::{DataSheet, unique_name};
pub use design::{CellValue, Design, DesignId};
pub use events::{ChangeSet, DataSheetEvent, DataSheetListener, ParameterChange, TypeChangeReport};
pub use parameter::{
    DiscreteLevels, Parameter, ParameterId, ParameterKind, classify_values, compare_levels,
};

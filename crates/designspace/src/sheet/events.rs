//! Change reports and notifications emitted by the data sheet.

use serde::{Deserialize, Serialize};

use super::design::{CellValue, DesignId};
use super::parameter::ParameterId;

/// What consumers of one parameter need to redo after a data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub parameter: ParameterId,
    /// The column switched between numeric and discrete.
    pub type_changed: bool,
    /// The data range moved; axes that autofit should refit.
    pub autofit_required: bool,
    /// Filter values no longer mean what they did (e.g. discrete indices
    /// shifted) and should be reset.
    pub filter_reset_required: bool,
    /// Values changed; filters should be re-applied.
    pub filter_apply_required: bool,
}

impl ParameterChange {
    pub fn unchanged(parameter: ParameterId) -> Self {
        Self {
            parameter,
            type_changed: false,
            autofit_required: false,
            filter_reset_required: false,
            filter_apply_required: false,
        }
    }

    /// Everything must be redone.
    pub fn retyped(parameter: ParameterId) -> Self {
        Self {
            parameter,
            type_changed: true,
            autofit_required: true,
            filter_reset_required: true,
            filter_apply_required: true,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        !(self.type_changed
            || self.autofit_required
            || self.filter_reset_required
            || self.filter_apply_required)
    }
}

/// The per-parameter outcome of one bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// One entry per parameter that still exists, in column order.
    pub changes: Vec<ParameterChange>,
    /// Parameters that were added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<ParameterId>,
    /// Parameters that were removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<ParameterId>,
    /// Designs were added, removed or replaced.
    pub designs_changed: bool,
}

impl ChangeSet {
    pub fn change(&self, parameter: ParameterId) -> Option<&ParameterChange> {
        self.changes.iter().find(|c| c.parameter == parameter)
    }

    /// Whether any parameter needs work.
    pub fn is_empty(&self) -> bool {
        self.changes.iter().all(ParameterChange::is_unchanged)
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.designs_changed
    }
}

/// Outcome of editing a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeChangeReport {
    pub design: DesignId,
    pub parameter: ParameterId,
    /// What ended up stored in the cell.
    pub stored: CellValue,
    pub was_numeric: bool,
    pub is_numeric: bool,
    /// The edit added a discrete level, shifting level indices.
    pub level_inserted: bool,
}

impl TypeChangeReport {
    pub fn type_changed(&self) -> bool {
        self.was_numeric != self.is_numeric
    }

    /// The change consumers of the edited parameter must process.
    pub fn parameter_change(&self) -> ParameterChange {
        if self.type_changed() {
            ParameterChange::retyped(self.parameter)
        } else {
            ParameterChange {
                parameter: self.parameter,
                type_changed: false,
                autofit_required: true,
                filter_reset_required: self.level_inserted,
                filter_apply_required: true,
            }
        }
    }

    /// The report as a change set, for code that handles bulk changes.
    pub fn change_set(&self) -> ChangeSet {
        ChangeSet {
            changes: vec![self.parameter_change()],
            ..Default::default()
        }
    }
}

/// Notifications sent to [`DataSheetListener`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSheetEvent {
    /// Data was imported, updated, edited or removed.
    DataChanged(ChangeSet),
    /// Clusters were added, removed, renamed or reassigned.
    ClustersChanged,
    /// Something shown in a tabular view changed (names, selection).
    DataPanelUpdateRequired,
}

/// Receives data sheet notifications, one per operation.
///
/// Closures taking `&DataSheetEvent` are listeners too.
pub trait DataSheetListener {
    fn on_event(&mut self, event: &DataSheetEvent);
}

impl<F> DataSheetListener for F
where
    F: FnMut(&DataSheetEvent),
{
    fn on_event(&mut self, event: &DataSheetEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_without_type_change() {
        let report = TypeChangeReport {
            design: DesignId(1),
            parameter: ParameterId(0),
            stored: CellValue::Number(2.0),
            was_numeric: true,
            is_numeric: true,
            level_inserted: false,
        };
        let change = report.parameter_change();
        assert!(!report.type_changed());
        assert!(change.filter_apply_required);
        assert!(!change.filter_reset_required);
    }

    #[test]
    fn test_report_with_type_change() {
        let report = TypeChangeReport {
            design: DesignId(1),
            parameter: ParameterId(0),
            stored: CellValue::Text("n/a".into()),
            was_numeric: true,
            is_numeric: false,
            level_inserted: true,
        };
        assert_eq!(report.parameter_change(), ParameterChange::retyped(ParameterId(0)));
        assert!(!report.change_set().is_empty());
    }

    #[test]
    fn test_empty_change_set() {
        let set = ChangeSet {
            changes: vec![ParameterChange::unchanged(ParameterId(0))],
            ..Default::default()
        };
        assert!(set.is_empty());
    }
}

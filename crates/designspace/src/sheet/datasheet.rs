//! The data sheet: owner of all parameters and designs.

use std::fmt;

use indexmap::IndexMap;

use super::design::{CellValue, Design, DesignId};
use super::events::{
    ChangeSet, DataSheetEvent, DataSheetListener, ParameterChange, TypeChangeReport,
};
use super::parameter::{Parameter, ParameterId, ParameterKind};
use crate::cluster::{Cluster, ClusterId, ClusterSet};
use crate::config::ImportConfig;
use crate::error::{DesignSpaceError, Result};
use crate::filter::{Axis, AxisId};
use crate::input::{DataTable, NumberParser, ProgressMonitor, cell_text};

/// Ordered parameters and the designs holding a value for each of them.
///
/// All mutation goes through the sheet so that its invariants hold: every
/// design has a value for every parameter, parameter names are unique, and
/// every text value of a discrete parameter is one of its levels. Bulk
/// operations notify the registered listeners once, with per-parameter
/// flags describing what consumers must redo.
pub struct DataSheet {
    parameters: Vec<Parameter>,
    designs: IndexMap<DesignId, Design>,
    clusters: ClusterSet,
    parser: NumberParser,
    tic_label_digit_count: usize,
    delimiter: Option<u8>,
    next_parameter_id: u32,
    next_axis_id: u32,
    listeners: Vec<Box<dyn DataSheetListener>>,
}

impl DataSheet {
    /// Create an empty data sheet.
    pub fn new(config: &ImportConfig) -> Result<Self> {
        Ok(Self {
            parameters: Vec::new(),
            designs: IndexMap::new(),
            clusters: ClusterSet::new(),
            parser: NumberParser::new(config.locale.clone())?,
            tic_label_digit_count: config.tic_label_digit_count,
            delimiter: config.parser.delimiter,
            next_parameter_id: 0,
            next_axis_id: 0,
            listeners: Vec::new(),
        })
    }

    /// Build a data sheet from already-split rows.
    ///
    /// Header names are made unique by suffixing ` (n)`. Short rows are
    /// padded with the missing-value marker and long rows truncated. Each
    /// column becomes numeric when all its values parse, discrete otherwise.
    /// When `progress` cancels, nothing is returned and no state is kept.
    pub fn import(
        table: &DataTable,
        config: &ImportConfig,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Self> {
        let mut sheet = Self::new(config)?;
        sheet.delimiter = Some(table.delimiter);

        let mut names: Vec<String> = Vec::with_capacity(table.column_count());
        let mut parameters = Vec::with_capacity(table.column_count());
        for (column, header) in table.headers.iter().enumerate() {
            let base = match header.trim() {
                "" => format!("Parameter {}", column + 1),
                name => name.to_string(),
            };
            let name = unique_name(&base, &names);
            names.push(name.clone());

            let mut parameter = Parameter::new(sheet.allocate_parameter_id(), name);
            parameter.set_tic_label_digit_count(sheet.tic_label_digit_count);
            parameters.push(parameter);
        }

        let mut designs = read_rows(table, &parameters, progress, false)?;
        type_columns(&sheet.parser, &mut parameters, &mut designs);

        sheet.parameters = parameters;
        sheet.designs = designs;

        log::info!(
            "imported {} designs with {} parameters ({} numeric)",
            sheet.design_count(),
            sheet.parameter_count(),
            sheet.parameters.iter().filter(|p| p.is_numeric()).count()
        );
        Ok(sheet)
    }

    /// Replace all designs with the rows of `table`, keeping the parameters.
    ///
    /// The table must have exactly one field per parameter in every row.
    /// Parameters are re-typed from the new values. Designs keep their
    /// cluster, selection and filter results when a design with the same id
    /// existed, so filters of unchanged columns keep holding. On any
    /// error, including cancellation, the sheet is left untouched.
    pub fn update(
        &mut self,
        table: &DataTable,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<ChangeSet> {
        let expected = self.parameters.len();
        if table.column_count() != expected {
            return Err(DesignSpaceError::InconsistentImport {
                row: 0,
                expected,
                found: table.column_count(),
            });
        }

        let mut parameters = self.parameters.clone();
        let mut designs = read_rows(table, &parameters, progress, true)?;
        for (id, design) in designs.iter_mut() {
            if let Some(previous) = self.designs.get(id) {
                let cluster = previous
                    .cluster()
                    .filter(|c| self.clusters.get(*c).is_some());
                design.set_cluster(cluster);
                design.inherit_state(previous);
            }
        }
        type_columns(&self.parser, &mut parameters, &mut designs);

        let designs_changed = designs.len() != self.designs.len()
            || designs.keys().zip(self.designs.keys()).any(|(a, b)| a != b);

        let changes = parameters
            .iter()
            .zip(&self.parameters)
            .map(|(new, old)| {
                if new.is_numeric() != old.is_numeric() {
                    return ParameterChange::retyped(new.id());
                }
                let values_changed =
                    designs_changed || column_differs(&self.designs, &designs, new.id());
                ParameterChange {
                    parameter: new.id(),
                    type_changed: false,
                    autofit_required: values_changed,
                    filter_reset_required: new.discrete_levels() != old.discrete_levels(),
                    filter_apply_required: values_changed,
                }
            })
            .collect();

        self.parameters = parameters;
        self.designs = designs;

        let set = ChangeSet {
            changes,
            designs_changed,
            ..Default::default()
        };
        log::info!(
            "updated data sheet: {} designs, {} parameters changed",
            self.design_count(),
            set.changes.iter().filter(|c| !c.is_unchanged()).count()
        );
        self.notify(DataSheetEvent::DataChanged(set.clone()));
        self.notify(DataSheetEvent::DataPanelUpdateRequired);
        Ok(set)
    }

    /// Edit one cell.
    ///
    /// Text that does not parse as a number turns a numeric parameter
    /// discrete for every design. Conversely, a discrete parameter whose
    /// values all parse after the edit becomes numeric again. The returned
    /// report tells which of these happened.
    pub fn set_cell(
        &mut self,
        design_id: DesignId,
        parameter_id: ParameterId,
        text: &str,
    ) -> Result<TypeChangeReport> {
        let index = self.parameter_index(parameter_id)?;
        let text = cell_text(Some(text));

        let design = self
            .designs
            .get_mut(&design_id)
            .ok_or(DesignSpaceError::DesignNotFound(design_id.0))?;
        let stored_number = design.set_value(parameter_id, text, &self.parser);

        let parameter = &mut self.parameters[index];
        let was_numeric = parameter.is_numeric();
        let mut level_inserted = false;

        if !stored_number {
            if parameter.is_numeric() {
                parameter.set_numeric(false, self.designs.values());
                level_inserted = true;
            } else {
                level_inserted = parameter.value_to_index(text).1;
            }
        }

        if !parameter.is_numeric()
            && parameter.classify(self.designs.values(), &self.parser) == ParameterKind::Numeric
        {
            make_numeric(&self.parser, parameter, self.designs.values_mut());
            level_inserted = false;
        }

        let report = TypeChangeReport {
            design: design_id,
            parameter: parameter_id,
            stored: self.designs[&design_id]
                .value(parameter_id)
                .cloned()
                .unwrap_or_else(|| CellValue::Text(text.to_string())),
            was_numeric,
            is_numeric: self.parameters[index].is_numeric(),
            level_inserted,
        };

        log::debug!(
            "set design {} / {} to '{}'{}",
            design_id,
            self.parameters[index].name(),
            text,
            if report.type_changed() { " (type changed)" } else { "" }
        );
        self.notify(DataSheetEvent::DataChanged(report.change_set()));
        self.notify(DataSheetEvent::DataPanelUpdateRequired);
        Ok(report)
    }

    /// Explicitly switch a parameter between numeric and discrete.
    ///
    /// Making a parameter numeric fails with [`DesignSpaceError::InvalidType`]
    /// if any value does not parse. Making it discrete turns every stored
    /// number into text and rebuilds the levels.
    pub fn set_parameter_numeric(&mut self, id: ParameterId, numeric: bool) -> Result<ChangeSet> {
        let index = self.parameter_index(id)?;
        if self.parameters[index].is_numeric() == numeric {
            return Ok(ChangeSet {
                changes: vec![ParameterChange::unchanged(id)],
                ..Default::default()
            });
        }

        if numeric {
            if let Some(design) = self
                .designs
                .values()
                .find(|d| !self.parser.is_numeric(&d.string_value(id)))
            {
                return Err(DesignSpaceError::InvalidType {
                    parameter: self.parameters[index].name().to_string(),
                    message: format!(
                        "value '{}' of design {} is not a number",
                        design.string_value(id),
                        design.id()
                    ),
                });
            }
            make_numeric(&self.parser, &mut self.parameters[index], self.designs.values_mut());
        } else {
            for design in self.designs.values_mut() {
                if let Some(CellValue::Number(v)) = design.value(id).cloned() {
                    design.set_cell_value(id, CellValue::Text(v.to_string()));
                }
            }
            self.parameters[index].set_numeric(false, self.designs.values());
        }

        let set = ChangeSet {
            changes: vec![ParameterChange::retyped(id)],
            ..Default::default()
        };
        self.notify(DataSheetEvent::DataChanged(set.clone()));
        Ok(set)
    }

    /// Rename a parameter; the new name must not be used by another one.
    pub fn rename_parameter(&mut self, id: ParameterId, name: &str) -> Result<()> {
        let index = self.parameter_index(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DesignSpaceError::Config(
                "parameter name must not be empty".to_string(),
            ));
        }
        if self
            .parameters
            .iter()
            .any(|p| p.id() != id && p.name() == name)
        {
            return Err(DesignSpaceError::DuplicateName(name.to_string()));
        }
        self.parameters[index].set_name(name);
        self.notify(DataSheetEvent::DataPanelUpdateRequired);
        Ok(())
    }

    /// Remove a parameter and its value from every design.
    pub fn remove_parameter(&mut self, id: ParameterId) -> Result<ChangeSet> {
        let index = self.parameter_index(id)?;
        let removed = self.parameters.remove(index);
        for design in self.designs.values_mut() {
            design.remove_value(id);
        }
        log::debug!("removed parameter '{}'", removed.name());

        let set = ChangeSet {
            changes: self
                .parameters
                .iter()
                .map(|p| ParameterChange::unchanged(p.id()))
                .collect(),
            removed: vec![id],
            ..Default::default()
        };
        self.notify(DataSheetEvent::DataChanged(set.clone()));
        self.notify(DataSheetEvent::DataPanelUpdateRequired);
        Ok(set)
    }

    /// Remove designs. Fails without removing anything if an id is unknown.
    pub fn remove_designs(&mut self, ids: &[DesignId]) -> Result<ChangeSet> {
        if let Some(missing) = ids.iter().find(|id| !self.designs.contains_key(*id)) {
            return Err(DesignSpaceError::DesignNotFound(missing.0));
        }
        for id in ids {
            self.designs.shift_remove(id);
        }

        let set = ChangeSet {
            changes: self
                .parameters
                .iter()
                .map(|p| ParameterChange {
                    autofit_required: true,
                    ..ParameterChange::unchanged(p.id())
                })
                .collect(),
            designs_changed: true,
            ..Default::default()
        };
        self.notify(DataSheetEvent::DataChanged(set.clone()));
        self.notify(DataSheetEvent::DataPanelUpdateRequired);
        Ok(set)
    }

    // ------------------------------------------------------------------
    // Lookups and aggregates
    // ------------------------------------------------------------------

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter(&self, id: ParameterId) -> Result<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| DesignSpaceError::ParameterNotFound(id.to_string()))
    }

    pub fn parameter_mut(&mut self, id: ParameterId) -> Result<&mut Parameter> {
        self.parameters
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| DesignSpaceError::ParameterNotFound(id.to_string()))
    }

    pub fn parameter_by_name(&self, name: &str) -> Result<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| DesignSpaceError::ParameterNotFound(name.to_string()))
    }

    fn parameter_index(&self, id: ParameterId) -> Result<usize> {
        self.parameters
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| DesignSpaceError::ParameterNotFound(id.to_string()))
    }

    pub fn designs(&self) -> impl Iterator<Item = &Design> {
        self.designs.values()
    }

    pub fn design_count(&self) -> usize {
        self.designs.len()
    }

    pub fn design(&self, id: DesignId) -> Result<&Design> {
        self.designs
            .get(&id)
            .ok_or(DesignSpaceError::DesignNotFound(id.0))
    }

    /// Smallest and largest value of a parameter over all designs; discrete
    /// parameters report level indices. `None` when there are no values.
    pub fn value_range(&self, id: ParameterId) -> Result<Option<(f64, f64)>> {
        let parameter = self.parameter(id)?;
        let range = self
            .designs
            .values()
            .filter_map(|d| d.double_value(parameter))
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        Ok(range)
    }

    pub fn min_value(&self, id: ParameterId) -> Result<Option<f64>> {
        Ok(self.value_range(id)?.map(|(lo, _)| lo))
    }

    pub fn max_value(&self, id: ParameterId) -> Result<Option<f64>> {
        Ok(self.value_range(id)?.map(|(_, hi)| hi))
    }

    pub fn number_parser(&self) -> &NumberParser {
        &self.parser
    }

    /// The delimiter of the imported file, if known.
    pub fn delimiter(&self) -> Option<u8> {
        self.delimiter
    }

    // ------------------------------------------------------------------
    // Selection and clusters
    // ------------------------------------------------------------------

    pub fn set_selected(&mut self, ids: &[DesignId], selected: bool) -> Result<()> {
        if let Some(missing) = ids.iter().find(|id| !self.designs.contains_key(*id)) {
            return Err(DesignSpaceError::DesignNotFound(missing.0));
        }
        for id in ids {
            if let Some(design) = self.designs.get_mut(id) {
                design.set_selected(selected);
            }
        }
        self.notify(DataSheetEvent::DataPanelUpdateRequired);
        Ok(())
    }

    pub fn selected_designs(&self) -> impl Iterator<Item = &Design> {
        self.designs.values().filter(|d| d.is_selected())
    }

    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    /// Create a cluster named `Cluster N` with the lowest free N.
    pub fn add_cluster(&mut self) -> ClusterId {
        let id = self.clusters.new_cluster();
        self.notify(DataSheetEvent::ClustersChanged);
        id
    }

    /// Remove a cluster; designs that belonged to it belong to none.
    pub fn remove_cluster(&mut self, id: ClusterId) -> Result<Cluster> {
        let cluster = self.clusters.remove(id)?;
        for design in self.designs.values_mut() {
            if design.cluster() == Some(id) {
                design.set_cluster(None);
            }
        }
        self.notify(DataSheetEvent::ClustersChanged);
        Ok(cluster)
    }

    pub fn rename_cluster(&mut self, id: ClusterId, name: &str) -> Result<()> {
        self.clusters.rename(id, name)?;
        self.notify(DataSheetEvent::ClustersChanged);
        Ok(())
    }

    pub fn set_cluster_active(&mut self, id: ClusterId, active: bool) -> Result<()> {
        self.clusters.set_active(id, active)?;
        self.notify(DataSheetEvent::ClustersChanged);
        Ok(())
    }

    /// Put designs into a cluster, or take them out of any with `None`.
    pub fn assign_cluster(&mut self, ids: &[DesignId], cluster: Option<ClusterId>) -> Result<()> {
        if let Some(cluster) = cluster {
            if self.clusters.get(cluster).is_none() {
                return Err(DesignSpaceError::ClusterNotFound(cluster.to_string()));
            }
        }
        if let Some(missing) = ids.iter().find(|id| !self.designs.contains_key(*id)) {
            return Err(DesignSpaceError::DesignNotFound(missing.0));
        }
        for id in ids {
            if let Some(design) = self.designs.get_mut(id) {
                design.set_cluster(cluster);
            }
        }
        self.notify(DataSheetEvent::ClustersChanged);
        Ok(())
    }

    pub fn designs_in_cluster(&self, id: ClusterId) -> impl Iterator<Item = &Design> {
        self.designs.values().filter(move |d| d.cluster() == Some(id))
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn add_listener(&mut self, listener: impl DataSheetListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Move the listeners of a sheet that is being replaced by this one and
    /// tell them that everything changed.
    pub fn take_listeners_from(&mut self, previous: &mut DataSheet) {
        self.listeners.append(&mut previous.listeners);
        let set = ChangeSet {
            changes: self
                .parameters
                .iter()
                .map(|p| ParameterChange::retyped(p.id()))
                .collect(),
            designs_changed: true,
            ..Default::default()
        };
        self.notify(DataSheetEvent::DataChanged(set));
        self.notify(DataSheetEvent::ClustersChanged);
        self.notify(DataSheetEvent::DataPanelUpdateRequired);
    }

    fn notify(&mut self, event: DataSheetEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    // ------------------------------------------------------------------
    // Crate-internal access for axes and filters
    // ------------------------------------------------------------------

    pub(crate) fn split_mut(&mut self) -> (&mut [Parameter], &mut IndexMap<DesignId, Design>) {
        (&mut self.parameters, &mut self.designs)
    }

    pub(crate) fn allocate_axis_id(&mut self) -> AxisId {
        let id = AxisId(self.next_axis_id);
        self.next_axis_id += 1;
        id
    }

    pub(crate) fn clear_activation(&mut self, axis: &Axis) {
        for design in self.designs.values_mut() {
            design.clear_activation(axis);
        }
    }

    fn allocate_parameter_id(&mut self) -> ParameterId {
        let id = ParameterId(self.next_parameter_id);
        self.next_parameter_id += 1;
        id
    }
}

impl fmt::Debug for DataSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSheet")
            .field("parameters", &self.parameters)
            .field("designs", &self.designs.len())
            .field("clusters", &self.clusters.len())
            .field("locale", self.parser.locale())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// `base`, or `base (n)` with the lowest n >= 2 that is not taken.
pub fn unique_name(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{} ({})", base, n))
        .find(|candidate| !taken.iter().any(|t| t == candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Turn table rows into designs holding raw text.
fn read_rows(
    table: &DataTable,
    parameters: &[Parameter],
    progress: &mut dyn ProgressMonitor,
    strict: bool,
) -> Result<IndexMap<DesignId, Design>> {
    let width = parameters.len();
    progress.start(table.row_count());

    let mut designs = IndexMap::with_capacity(table.row_count());
    let mut ragged = 0usize;

    for (index, row) in table.rows.iter().enumerate() {
        if progress.is_cancelled() {
            log::warn!("import cancelled after {} of {} rows", index, table.row_count());
            return Err(DesignSpaceError::Cancelled {
                rows_processed: index,
            });
        }
        if row.len() != width {
            if strict {
                return Err(DesignSpaceError::InconsistentImport {
                    row: index + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            ragged += 1;
        }

        let id = DesignId(index as u64 + 1);
        let mut design = Design::new(id);
        for (column, parameter) in parameters.iter().enumerate() {
            let text = cell_text(row.get(column).map(String::as_str));
            design.set_cell_value(parameter.id(), CellValue::Text(text.to_string()));
        }
        designs.insert(id, design);
        progress.advance(index + 1);
    }

    if ragged > 0 {
        log::warn!(
            "{} rows did not have {} fields and were padded or truncated",
            ragged,
            width
        );
    }
    Ok(designs)
}

/// Decide the type of every column from its text and store values
/// accordingly.
fn type_columns(
    parser: &NumberParser,
    parameters: &mut [Parameter],
    designs: &mut IndexMap<DesignId, Design>,
) {
    for parameter in parameters.iter_mut() {
        match parameter.classify(designs.values(), parser) {
            ParameterKind::Numeric => make_numeric(parser, parameter, designs.values_mut()),
            ParameterKind::NonNumeric | ParameterKind::Mixed => {
                for design in designs.values_mut() {
                    if let Some(CellValue::Number(v)) = design.value(parameter.id()).cloned() {
                        design.set_cell_value(parameter.id(), CellValue::Text(v.to_string()));
                    }
                }
                parameter.set_numeric(false, designs.values());
            }
        }
    }
}

/// Parse every text value of `parameter` and mark it numeric. Values that do
/// not parse are left as text.
fn make_numeric<'a, I>(parser: &NumberParser, parameter: &mut Parameter, designs: I)
where
    I: IntoIterator<Item = &'a mut Design>,
{
    let id = parameter.id();
    for design in designs {
        if let Some(CellValue::Text(text)) = design.value(id) {
            if let Some(number) = parser.parse(text) {
                design.set_cell_value(id, CellValue::Number(number));
            }
        }
    }
    parameter.set_numeric(true, std::iter::empty());
}

fn column_differs(
    old: &IndexMap<DesignId, Design>,
    new: &IndexMap<DesignId, Design>,
    parameter: ParameterId,
) -> bool {
    new.iter().any(|(id, design)| {
        old.get(id).map(|o| o.value(parameter)) != Some(design.value(parameter))
    })
}

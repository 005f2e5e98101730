//! Designs (rows): cell storage, filter activation and bounds state.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::{Parameter, ParameterId};
use crate::cluster::ClusterId;
use crate::filter::{Axis, FilterId, FilterKind};
use crate::input::{MISSING_VALUE, NumberParser};

/// Stable identity of a design, assigned at import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DesignId(pub u64);

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored cell: either a parsed number or the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// The value as text; numbers use their shortest round-trip form.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Number(v) => Cow::Owned(v.to_string()),
            CellValue::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// One row of the data sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    id: DesignId,
    values: IndexMap<ParameterId, CellValue>,
    activation: HashMap<FilterId, bool>,
    inside_bounds: bool,
    cluster: Option<ClusterId>,
    selected: bool,
}

impl Design {
    pub fn new(id: DesignId) -> Self {
        Self {
            id,
            values: IndexMap::new(),
            activation: HashMap::new(),
            inside_bounds: true,
            cluster: None,
            selected: false,
        }
    }

    pub fn id(&self) -> DesignId {
        self.id
    }

    pub fn value(&self, parameter: ParameterId) -> Option<&CellValue> {
        self.values.get(&parameter)
    }

    pub fn values(&self) -> impl Iterator<Item = (ParameterId, &CellValue)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    /// The cell as text, [`MISSING_VALUE`] when nothing is stored.
    pub fn string_value(&self, parameter: ParameterId) -> Cow<'_, str> {
        match self.values.get(&parameter) {
            Some(value) => value.as_text(),
            None => Cow::Borrowed(MISSING_VALUE),
        }
    }

    /// Store `raw` for `parameter`: as a number if it parses, as text
    /// otherwise. Returns whether a number was stored.
    ///
    /// Storing text in a numeric column makes that column discrete, which
    /// affects every design; [`DataSheet::set_cell`] performs that retyping.
    ///
    /// [`DataSheet::set_cell`]: super::DataSheet::set_cell
    pub fn set_value(&mut self, parameter: ParameterId, raw: &str, parser: &NumberParser) -> bool {
        match parser.parse(raw) {
            Some(number) => {
                self.values.insert(parameter, CellValue::Number(number));
                true
            }
            None => {
                self.values
                    .insert(parameter, CellValue::Text(raw.trim().to_string()));
                false
            }
        }
    }

    pub(crate) fn set_cell_value(&mut self, parameter: ParameterId, value: CellValue) {
        self.values.insert(parameter, value);
    }

    pub(crate) fn remove_value(&mut self, parameter: ParameterId) -> Option<CellValue> {
        self.values.shift_remove(&parameter)
    }

    /// The value used for filtering and plotting.
    ///
    /// Text is mapped through the parameter's discrete levels, inserting it
    /// as a level if needed. A stored number is returned as is, even when the
    /// parameter has become discrete since it was stored. A design without a
    /// value for `parameter` yields NaN, which no filter keeps.
    pub fn get_double_value(&self, parameter: &mut Parameter) -> f64 {
        match self.values.get(&parameter.id()) {
            Some(CellValue::Number(v)) => *v,
            Some(CellValue::Text(s)) => parameter.value_to_index(s).0 as f64,
            None => f64::NAN,
        }
    }

    /// Like [`get_double_value`](Self::get_double_value) but never modifies
    /// the level set; `None` for text that is not a level.
    pub fn double_value(&self, parameter: &Parameter) -> Option<f64> {
        match self.values.get(&parameter.id())? {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => parameter.index_of(s).map(|i| i as f64),
        }
    }

    /// The last result of `filter` for this design, if it has run.
    pub fn activation(&self, filter: FilterId) -> Option<bool> {
        self.activation.get(&filter).copied()
    }

    pub(crate) fn set_activation(&mut self, filter: FilterId, active: bool) {
        self.activation.insert(filter, active);
    }

    /// Forget every filter result of one axis.
    pub(crate) fn clear_activation(&mut self, axis: &Axis) {
        self.activation.remove(&axis.filter_id(FilterKind::Upper));
        self.activation.remove(&axis.filter_id(FilterKind::Lower));
    }

    /// Take over the filter results and selection of the design this one
    /// replaces. Results of columns whose values changed are stale until
    /// their filters run again.
    pub(crate) fn inherit_state(&mut self, previous: &Design) {
        self.activation.clone_from(&previous.activation);
        self.selected = previous.selected;
    }

    /// Whether this design passes the filters of every axis.
    ///
    /// Filters that have not evaluated this design count as passing. On an
    /// axis with inverted filters one passing filter is enough, otherwise
    /// both must pass.
    pub fn is_active(&self, axes: &[Axis]) -> bool {
        axes.iter().all(|axis| {
            let upper = self
                .activation(axis.filter_id(FilterKind::Upper))
                .unwrap_or(true);
            let lower = self
                .activation(axis.filter_id(FilterKind::Lower))
                .unwrap_or(true);
            if axis.is_filter_inverted() {
                upper || lower
            } else {
                upper && lower
            }
        })
    }

    /// Recompute and cache whether every axis' value lies within that
    /// axis' bounds. Axes whose parameter is not in `parameters` are skipped.
    pub fn evaluate_bounds(&mut self, axes: &[Axis], parameters: &mut [Parameter]) -> bool {
        let mut inside = true;
        for axis in axes {
            let Some(parameter) = parameters
                .iter_mut()
                .find(|p| p.id() == axis.parameter_id())
            else {
                continue;
            };
            let value = self.get_double_value(parameter);
            if !(axis.min(parameter) <= value && value <= axis.max(parameter)) {
                inside = false;
                break;
            }
        }
        self.inside_bounds = inside;
        inside
    }

    /// The cached result of the last [`evaluate_bounds`](Self::evaluate_bounds).
    pub fn is_inside_bounds(&self) -> bool {
        self.inside_bounds
    }

    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }

    pub(crate) fn set_cluster(&mut self, cluster: Option<ClusterId>) {
        self.cluster = cluster;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

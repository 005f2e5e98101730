use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Filter, FilterId, FilterKind, tolerance};
use crate::config::AxisDefaults;
use crate::error::{DesignSpaceError, Result};
use crate::sheet::{DataSheet, Parameter, ParameterId};

/// Identity of an axis, allocated by the data sheet it was built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(pub u32);

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis#{}", self.0)
    }
}

/// A plotted parameter with its bounds and two filters.
///
/// Numeric axes store their bounds. Discrete axes span the level indices of
/// their parameter, `0..=level_count - 1`, and ignore the stored bounds.
/// When the axis is inverted the lower filter holds the maximum of the
/// filtered window and the upper filter the minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    id: AxisId,
    parameter: ParameterId,
    min: f64,
    max: f64,
    tick_count: usize,
    autofit: bool,
    axis_inverted: bool,
    filter_inverted: bool,
    upper: Filter,
    lower: Filter,
}

impl Axis {
    /// Build an axis for `parameter` from the configured defaults, fit it to
    /// the data if `autofit` is set, and reset both filters to the bounds.
    pub fn new(sheet: &mut DataSheet, parameter: ParameterId, defaults: &AxisDefaults) -> Result<Self> {
        sheet.parameter(parameter)?;
        let mut axis = Self {
            id: sheet.allocate_axis_id(),
            parameter,
            min: defaults.min,
            max: defaults.max,
            tick_count: defaults.tick_count,
            autofit: defaults.autofit,
            axis_inverted: defaults.axis_inverted,
            filter_inverted: defaults.filter_inverted,
            upper: Filter::new(FilterKind::Upper, defaults.max),
            lower: Filter::new(FilterKind::Lower, defaults.min),
        };
        if axis.autofit {
            axis.autofit(sheet)?;
        }
        axis.reset_filters(sheet)?;
        Ok(axis)
    }

    pub fn id(&self) -> AxisId {
        self.id
    }

    pub fn parameter_id(&self) -> ParameterId {
        self.parameter
    }

    pub fn filter_id(&self, kind: FilterKind) -> FilterId {
        FilterId {
            axis: self.id,
            kind,
        }
    }

    pub fn min(&self, parameter: &Parameter) -> f64 {
        if parameter.is_numeric() { self.min } else { 0.0 }
    }

    pub fn max(&self, parameter: &Parameter) -> f64 {
        if parameter.is_numeric() {
            self.max
        } else {
            parameter.discrete_level_count().saturating_sub(1) as f64
        }
    }

    pub fn range(&self, parameter: &Parameter) -> f64 {
        self.max(parameter) - self.min(parameter)
    }

    /// Number of ticks: the configured count on numeric axes, one per level
    /// on discrete ones.
    pub fn tick_count(&self, parameter: &Parameter) -> usize {
        if parameter.is_numeric() {
            self.tick_count
        } else {
            parameter.discrete_level_count()
        }
    }

    pub fn tolerance(&self, parameter: &Parameter) -> f64 {
        tolerance(self.range(parameter))
    }

    pub fn is_autofit(&self) -> bool {
        self.autofit
    }

    pub fn set_autofit(&mut self, autofit: bool) {
        self.autofit = autofit;
    }

    pub fn is_axis_inverted(&self) -> bool {
        self.axis_inverted
    }

    pub fn is_filter_inverted(&self) -> bool {
        self.filter_inverted
    }

    pub fn filter(&self, kind: FilterKind) -> &Filter {
        match kind {
            FilterKind::Upper => &self.upper,
            FilterKind::Lower => &self.lower,
        }
    }

    fn filter_mut(&mut self, kind: FilterKind) -> &mut Filter {
        match kind {
            FilterKind::Upper => &mut self.upper,
            FilterKind::Lower => &mut self.lower,
        }
    }

    pub fn upper_filter(&self) -> &Filter {
        &self.upper
    }

    pub fn lower_filter(&self) -> &Filter {
        &self.lower
    }

    /// Which filter bounds the window from above.
    pub fn maximum_kind(&self) -> FilterKind {
        if self.axis_inverted {
            FilterKind::Lower
        } else {
            FilterKind::Upper
        }
    }

    pub fn maximum_filter(&self) -> &Filter {
        self.filter(self.maximum_kind())
    }

    pub fn minimum_filter(&self) -> &Filter {
        self.filter(self.maximum_kind().other())
    }

    /// Set numeric bounds and stop fitting them to the data.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<()> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(DesignSpaceError::Config(format!(
                "axis bounds must be finite, got {}..{}",
                min, max
            )));
        }
        self.min = min;
        self.max = max;
        self.autofit = false;
        Ok(())
    }

    /// Set the bounds of a numeric axis to the smallest and largest value of
    /// its parameter. Discrete axes and parameters without values are left
    /// alone. Bounds flags of the designs are not recomputed here; see
    /// [`Chart::autofit_axis`](super::Chart::autofit_axis).
    pub fn autofit(&mut self, sheet: &DataSheet) -> Result<()> {
        let parameter = sheet.parameter(self.parameter)?;
        if !parameter.is_numeric() {
            return Ok(());
        }
        if let Some((min, max)) = sheet.value_range(self.parameter)? {
            log::debug!("autofit '{}' to {}..{}", parameter.name(), min, max);
            self.min = min;
            self.max = max;
        }
        Ok(())
    }

    /// Evaluate one filter against every design and store the result.
    pub fn apply_filter(&self, kind: FilterKind, sheet: &mut DataSheet) -> Result<()> {
        let (parameters, designs) = sheet.split_mut();
        let parameter = parameters
            .iter_mut()
            .find(|p| p.id() == self.parameter)
            .ok_or_else(|| DesignSpaceError::ParameterNotFound(self.parameter.to_string()))?;

        let tolerance = self.tolerance(parameter);
        let filter = self.filter(kind);
        let id = self.filter_id(kind);

        let mut kept = 0usize;
        for design in designs.values_mut() {
            let value = design.get_double_value(parameter);
            let keep = filter.keeps(value, tolerance, self.axis_inverted, self.filter_inverted);
            kept += usize::from(keep);
            design.set_activation(id, keep);
        }
        log::debug!(
            "{:?} filter of '{}' at {}: {} of {} designs kept",
            kind,
            parameter.name(),
            filter.value(),
            kept,
            designs.len()
        );
        Ok(())
    }

    pub fn apply_filters(&self, sheet: &mut DataSheet) -> Result<()> {
        self.apply_filter(FilterKind::Upper, sheet)?;
        self.apply_filter(FilterKind::Lower, sheet)
    }

    /// Move a filter and re-apply it.
    pub fn set_filter_value(&mut self, kind: FilterKind, value: f64, sheet: &mut DataSheet) -> Result<()> {
        self.filter_mut(kind).set_value(value);
        self.apply_filter(kind, sheet)
    }

    /// Move the maximum filter to the axis maximum and the minimum filter to
    /// the axis minimum, then apply it.
    pub fn reset_filter(&mut self, kind: FilterKind, sheet: &mut DataSheet) -> Result<()> {
        let parameter = sheet.parameter(self.parameter)?;
        let value = if kind == self.maximum_kind() {
            self.max(parameter)
        } else {
            self.min(parameter)
        };
        self.set_filter_value(kind, value, sheet)
    }

    pub fn reset_filters(&mut self, sheet: &mut DataSheet) -> Result<()> {
        self.reset_filter(FilterKind::Upper, sheet)?;
        self.reset_filter(FilterKind::Lower, sheet)
    }

    /// Flip the axis direction. The filter values are swapped so the filtered
    /// window stays the same.
    pub fn set_axis_inverted(&mut self, inverted: bool, sheet: &mut DataSheet) -> Result<()> {
        if self.axis_inverted == inverted {
            return Ok(());
        }
        let upper = self.upper.value();
        self.upper.set_value(self.lower.value());
        self.lower.set_value(upper);
        self.axis_inverted = inverted;
        self.apply_filters(sheet)
    }

    /// Keep the designs outside the window instead of inside.
    pub fn set_filter_inverted(&mut self, inverted: bool, sheet: &mut DataSheet) -> Result<()> {
        if self.filter_inverted == inverted {
            return Ok(());
        }
        self.filter_inverted = inverted;
        self.apply_filters(sheet)
    }
}

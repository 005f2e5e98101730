use serde::Serialize;

use super::{Axis, AxisId, FilterKind};
use crate::config::AxisDefaults;
use crate::error::{DesignSpaceError, Result};
use crate::sheet::{ChangeSet, DataSheet, Design, ParameterId};

/// An ordered set of axes over one data sheet, one per parameter.
///
/// Axes hold ids into the sheet they were built on. A chart must be rebuilt
/// when its sheet is replaced.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    name: String,
    axes: Vec<Axis>,
    #[serde(skip)]
    defaults: AxisDefaults,
}

impl Chart {
    /// Create a chart with an axis for every parameter of `sheet`.
    pub fn new(name: impl Into<String>, sheet: &mut DataSheet, defaults: &AxisDefaults) -> Result<Self> {
        defaults.validate()?;
        let ids: Vec<ParameterId> = sheet.parameters().iter().map(|p| p.id()).collect();
        let axes = ids
            .into_iter()
            .map(|id| Axis::new(sheet, id, defaults))
            .collect::<Result<Vec<_>>>()?;

        let chart = Self {
            name: name.into(),
            axes,
            defaults: defaults.clone(),
        };
        chart.evaluate_bounds(sheet);
        Ok(chart)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, id: AxisId) -> Result<&Axis> {
        self.axes
            .iter()
            .find(|a| a.id() == id)
            .ok_or_else(|| DesignSpaceError::AxisNotFound(id.to_string()))
    }

    /// The axis plotting `parameter`.
    pub fn axis_for(&self, parameter: ParameterId) -> Result<&Axis> {
        Ok(&self.axes[self.axis_index(parameter)?])
    }

    /// The axis plotting the parameter called `name`.
    pub fn axis_by_name(&self, sheet: &DataSheet, name: &str) -> Result<&Axis> {
        let parameter = sheet.parameter_by_name(name)?;
        self.axes
            .iter()
            .find(|a| a.parameter_id() == parameter.id())
            .ok_or_else(|| DesignSpaceError::AxisNotFound(name.to_string()))
    }

    fn axis_index(&self, parameter: ParameterId) -> Result<usize> {
        self.axes
            .iter()
            .position(|a| a.parameter_id() == parameter)
            .ok_or_else(|| DesignSpaceError::AxisNotFound(parameter.to_string()))
    }

    pub fn set_filter_value(
        &mut self,
        parameter: ParameterId,
        kind: FilterKind,
        value: f64,
        sheet: &mut DataSheet,
    ) -> Result<()> {
        let index = self.axis_index(parameter)?;
        self.axes[index].set_filter_value(kind, value, sheet)
    }

    /// Set the filtered window of an axis. `low` goes to the minimum filter
    /// and `high` to the maximum filter, whatever the axis direction.
    pub fn set_window(
        &mut self,
        parameter: ParameterId,
        low: f64,
        high: f64,
        sheet: &mut DataSheet,
    ) -> Result<()> {
        let index = self.axis_index(parameter)?;
        let axis = &mut self.axes[index];
        let maximum = axis.maximum_kind();
        axis.set_filter_value(maximum, high, sheet)?;
        axis.set_filter_value(maximum.other(), low, sheet)
    }

    pub fn reset_filters(&mut self, parameter: ParameterId, sheet: &mut DataSheet) -> Result<()> {
        let index = self.axis_index(parameter)?;
        self.axes[index].reset_filters(sheet)
    }

    pub fn reset_all_filters(&mut self, sheet: &mut DataSheet) -> Result<()> {
        for axis in &mut self.axes {
            axis.reset_filters(sheet)?;
        }
        Ok(())
    }

    pub fn set_axis_inverted(
        &mut self,
        parameter: ParameterId,
        inverted: bool,
        sheet: &mut DataSheet,
    ) -> Result<()> {
        let index = self.axis_index(parameter)?;
        self.axes[index].set_axis_inverted(inverted, sheet)
    }

    pub fn set_filter_inverted(
        &mut self,
        parameter: ParameterId,
        inverted: bool,
        sheet: &mut DataSheet,
    ) -> Result<()> {
        let index = self.axis_index(parameter)?;
        self.axes[index].set_filter_inverted(inverted, sheet)
    }

    /// Fix the bounds of a numeric axis and recompute bounds flags.
    pub fn set_axis_bounds(
        &mut self,
        parameter: ParameterId,
        min: f64,
        max: f64,
        sheet: &mut DataSheet,
    ) -> Result<()> {
        let index = self.axis_index(parameter)?;
        self.axes[index].set_bounds(min, max)?;
        self.evaluate_bounds(sheet);
        Ok(())
    }

    /// Fit an axis to its data and recompute bounds flags.
    pub fn autofit_axis(&mut self, parameter: ParameterId, sheet: &mut DataSheet) -> Result<()> {
        let index = self.axis_index(parameter)?;
        let axis = &mut self.axes[index];
        axis.set_autofit(true);
        axis.autofit(sheet)?;
        self.evaluate_bounds(sheet);
        Ok(())
    }

    /// Recompute the inside-bounds flag of every design; returns how many
    /// designs are inside.
    pub fn evaluate_bounds(&self, sheet: &mut DataSheet) -> usize {
        let (parameters, designs) = sheet.split_mut();
        designs
            .values_mut()
            .map(|d| d.evaluate_bounds(&self.axes, parameters))
            .filter(|inside| *inside)
            .count()
    }

    /// Designs passing the filters of every axis.
    pub fn active_designs<'a>(&'a self, sheet: &'a DataSheet) -> impl Iterator<Item = &'a Design> {
        sheet.designs().filter(|d| d.is_active(&self.axes))
    }

    pub fn active_count(&self, sheet: &DataSheet) -> usize {
        self.active_designs(sheet).count()
    }

    /// Bring the axes up to date after the sheet reported `changes`.
    ///
    /// Axes of removed parameters are dropped along with their activation
    /// bits, axes are added for parameters that have none, and each changed
    /// axis is refit, reset or re-applied as its flags ask.
    pub fn apply_changes(&mut self, changes: &ChangeSet, sheet: &mut DataSheet) -> Result<()> {
        let mut index = 0;
        while index < self.axes.len() {
            if sheet.parameter(self.axes[index].parameter_id()).is_ok() {
                index += 1;
            } else {
                let axis = self.axes.remove(index);
                sheet.clear_activation(&axis);
            }
        }

        for change in &changes.changes {
            let Ok(index) = self.axis_index(change.parameter) else {
                continue;
            };
            let axis = &mut self.axes[index];
            if change.autofit_required && axis.is_autofit() {
                axis.autofit(sheet)?;
            }
            if change.filter_reset_required {
                axis.reset_filters(sheet)?;
            } else if change.filter_apply_required {
                axis.apply_filters(sheet)?;
            }
        }

        let missing: Vec<ParameterId> = sheet
            .parameters()
            .iter()
            .map(|p| p.id())
            .filter(|id| self.axis_index(*id).is_err())
            .collect();
        for id in missing {
            let axis = Axis::new(sheet, id, &self.defaults)?;
            self.axes.push(axis);
        }

        let inside = self.evaluate_bounds(sheet);
        log::debug!(
            "chart '{}' updated: {} of {} designs inside bounds",
            self.name,
            inside,
            sheet.design_count()
        );
        Ok(())
    }
}

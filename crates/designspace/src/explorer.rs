//! The explorer: a loaded file, its data sheet and the charts over it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::error::{DesignSpaceError, Result};
use crate::filter::Chart;
use crate::input::{DataTable, NoProgress, Parser, ProgressMonitor, SourceMetadata};
use crate::sheet::{ChangeSet, DataSheet, DesignId, ParameterId, TypeChangeReport};

/// Overview of a loaded data set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerSummary {
    /// Metadata about the source file, if the data came from one.
    pub source: Option<SourceMetadata>,
    pub design_count: usize,
    pub parameter_count: usize,
    pub cluster_count: usize,
    pub parameters: Vec<ParameterSummary>,
}

/// Statistics of one parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub name: String,
    pub numeric: bool,
    /// Smallest value; the lowest level index for discrete parameters.
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Discrete levels in index order; empty for numeric parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
}

/// Owns a [`DataSheet`], the [`Chart`]s built on it and where it came from.
///
/// Data edits made through the explorer are forwarded to every chart, so
/// filters and bounds stay consistent with the data.
#[derive(Debug)]
pub struct Explorer {
    config: ExplorerConfig,
    parser: Parser,
    sheet: DataSheet,
    charts: Vec<Chart>,
    source: Option<SourceMetadata>,
}

impl Explorer {
    /// Create an explorer around an already-split table.
    pub fn from_table(table: &DataTable, config: ExplorerConfig) -> Result<Self> {
        config.validate()?;
        let sheet = DataSheet::import(table, &config.import, &mut NoProgress)?;
        Ok(Self {
            parser: Parser::with_config(config.import.parser.clone()),
            config,
            sheet,
            charts: Vec::new(),
            source: None,
        })
    }

    /// Open a delimited file.
    pub fn open(path: impl AsRef<Path>, config: ExplorerConfig) -> Result<Self> {
        Self::open_with_progress(path, config, &mut NoProgress)
    }

    /// Open a delimited file, reporting progress and honouring cancellation.
    pub fn open_with_progress(
        path: impl AsRef<Path>,
        config: ExplorerConfig,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Self> {
        config.validate()?;
        let parser = Parser::with_config(config.import.parser.clone());
        let (table, source) = parser.parse_file(path)?;
        let sheet = DataSheet::import(&table, &config.import, progress)?;

        log::info!(
            "opened {} ({} designs, {} parameters)",
            source.file,
            sheet.design_count(),
            sheet.parameter_count()
        );
        Ok(Self {
            config,
            parser,
            sheet,
            charts: Vec::new(),
            source: Some(source),
        })
    }

    /// Replace the data with a new file. Listeners move to the new sheet and
    /// every chart is rebuilt on it with its previous name.
    pub fn reopen(&mut self, path: impl AsRef<Path>, progress: &mut dyn ProgressMonitor) -> Result<()> {
        let (table, source) = self.parser.parse_file(path)?;
        let mut sheet = DataSheet::import(&table, &self.config.import, progress)?;
        let charts = self
            .charts
            .iter()
            .map(|c| Chart::new(c.name(), &mut sheet, &self.config.axis))
            .collect::<Result<Vec<_>>>()?;

        sheet.take_listeners_from(&mut self.sheet);
        self.sheet = sheet;
        self.charts = charts;
        self.source = Some(source);
        Ok(())
    }

    /// Re-read the source file and update the data sheet in place.
    ///
    /// Returns `None` without touching anything when the file content hash is
    /// unchanged. A failed or cancelled update leaves the data as it was.
    pub fn reload(&mut self, progress: &mut dyn ProgressMonitor) -> Result<Option<ChangeSet>> {
        let Some(previous) = &self.source else {
            return Err(DesignSpaceError::Config(
                "no file has been opened".to_string(),
            ));
        };
        let (table, source) = self.parser.parse_file(&previous.path)?;
        if source.hash == previous.hash {
            log::info!("{} is unchanged, nothing to reload", source.file);
            return Ok(None);
        }

        let changes = self.sheet.update(&table, progress)?;
        self.forward(&changes)?;
        self.source = Some(source);
        Ok(Some(changes))
    }

    /// Edit one cell and update every chart.
    pub fn set_cell(
        &mut self,
        design: DesignId,
        parameter: ParameterId,
        text: &str,
    ) -> Result<TypeChangeReport> {
        let report = self.sheet.set_cell(design, parameter, text)?;
        self.forward(&report.change_set())?;
        Ok(report)
    }

    pub fn set_parameter_numeric(&mut self, parameter: ParameterId, numeric: bool) -> Result<ChangeSet> {
        let changes = self.sheet.set_parameter_numeric(parameter, numeric)?;
        self.forward(&changes)?;
        Ok(changes)
    }

    pub fn remove_parameter(&mut self, parameter: ParameterId) -> Result<ChangeSet> {
        let changes = self.sheet.remove_parameter(parameter)?;
        self.forward(&changes)?;
        Ok(changes)
    }

    pub fn remove_designs(&mut self, designs: &[DesignId]) -> Result<ChangeSet> {
        let changes = self.sheet.remove_designs(designs)?;
        self.forward(&changes)?;
        Ok(changes)
    }

    fn forward(&mut self, changes: &ChangeSet) -> Result<()> {
        for chart in &mut self.charts {
            chart.apply_changes(changes, &mut self.sheet)?;
        }
        Ok(())
    }

    /// Add a chart with one axis per parameter; returns its index.
    pub fn add_chart(&mut self, name: impl Into<String>) -> Result<usize> {
        let chart = Chart::new(name, &mut self.sheet, &self.config.axis)?;
        self.charts.push(chart);
        Ok(self.charts.len() - 1)
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    pub fn chart(&self, index: usize) -> Option<&Chart> {
        self.charts.get(index)
    }

    /// A chart together with the sheet its operations need.
    pub fn chart_mut(&mut self, index: usize) -> Option<(&mut Chart, &mut DataSheet)> {
        self.charts.get_mut(index).map(|c| (c, &mut self.sheet))
    }

    pub fn sheet(&self) -> &DataSheet {
        &self.sheet
    }

    /// Mutable access for clusters, selection, renames and listeners. Data
    /// edits should go through the explorer so the charts follow.
    pub fn sheet_mut(&mut self) -> &mut DataSheet {
        &mut self.sheet
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn summary(&self) -> ExplorerSummary {
        let parameters = self
            .sheet
            .parameters()
            .iter()
            .map(|p| {
                let range = self.sheet.value_range(p.id()).ok().flatten();
                ParameterSummary {
                    name: p.name().to_string(),
                    numeric: p.is_numeric(),
                    min: range.map(|(lo, _)| lo),
                    max: range.map(|(_, hi)| hi),
                    levels: p.discrete_levels().iter().map(str::to_string).collect(),
                }
            })
            .collect();

        ExplorerSummary {
            source: self.source.clone(),
            design_count: self.sheet.design_count(),
            parameter_count: self.sheet.parameter_count(),
            cluster_count: self.sheet.clusters().len(),
            parameters,
        }
    }
}

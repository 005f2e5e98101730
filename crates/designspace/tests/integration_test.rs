//! Integration tests for designspace.

use std::io::Write;
use tempfile::NamedTempFile;

use designspace::{
    CellValue, ChangeSet, DataSheet, DataSheetEvent, DataTable, DesignId, DesignSpaceError,
    Explorer, ExplorerConfig, FilterKind, ImportConfig, NoProgress, NumberLocale, ParameterId,
    ProgressMonitor,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
    DataTable::new(
        headers.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
        b',',
    )
}

fn import(headers: &[&str], rows: &[&[&str]]) -> DataSheet {
    DataSheet::import(&table(headers, rows), &ImportConfig::default(), &mut NoProgress)
        .expect("Import failed")
}

/// Cancels once `limit` rows have been processed.
struct CancelAfter {
    limit: usize,
    done: usize,
}

impl ProgressMonitor for CancelAfter {
    fn advance(&mut self, rows_done: usize) {
        self.done = rows_done;
    }

    fn is_cancelled(&self) -> bool {
        self.done >= self.limit
    }
}

// =============================================================================
// File Import Tests
// =============================================================================

#[test]
fn test_open_csv_file() {
    let content = "speed,gear,weight\n\
                   1.0,low,12\n\
                   5.0,high,15.5\n\
                   3.0,low,9\n";
    let file = create_test_file(content);

    let explorer = Explorer::open(file.path(), ExplorerConfig::default()).expect("Open failed");
    let sheet = explorer.sheet();
    let source = explorer.source().expect("No source metadata");

    assert_eq!(source.format, "csv");
    assert_eq!(source.row_count, 3);
    assert_eq!(sheet.design_count(), 3);
    assert!(sheet.parameter_by_name("speed").unwrap().is_numeric());
    assert!(!sheet.parameter_by_name("gear").unwrap().is_numeric());
    assert_eq!(
        sheet.max_value(sheet.parameter_by_name("weight").unwrap().id()).unwrap(),
        Some(15.5)
    );
}

#[test]
fn test_open_tsv_with_german_numbers() {
    let content = "Länge\tTyp\n\
                   1.234,5\tA\n\
                   2,25\tB\n";
    let file = create_test_file(content);
    let config = ExplorerConfig::default().with_locale(NumberLocale::de_de());

    let explorer = Explorer::open(file.path(), config).expect("Open failed");
    let sheet = explorer.sheet();
    let length = sheet.parameter_by_name("Länge").unwrap();

    assert!(length.is_numeric());
    assert_eq!(
        sheet.design(DesignId(1)).unwrap().value(length.id()),
        Some(&CellValue::Number(1234.5))
    );
    assert_eq!(explorer.source().unwrap().format, "tsv");
}

#[test]
fn test_open_ragged_file_pads_rows() {
    let content = "a,b,c\n1,2,3\n4,5\n6,7,8,9\n";
    let file = create_test_file(content);

    let explorer = Explorer::open(file.path(), ExplorerConfig::default()).expect("Open failed");
    let sheet = explorer.sheet();
    let c = sheet.parameter_by_name("c").unwrap();

    assert_eq!(sheet.parameter_count(), 3);
    assert_eq!(sheet.design(DesignId(2)).unwrap().string_value(c.id()), "-");
    assert!(!c.is_numeric());
}

#[test]
fn test_open_missing_file() {
    let result = Explorer::open("/nonexistent/designs.csv", ExplorerConfig::default());
    assert!(matches!(result, Err(DesignSpaceError::Io { .. })));
}

#[test]
fn test_open_empty_file() {
    let file = create_test_file("");
    let result = Explorer::open(file.path(), ExplorerConfig::default());
    assert!(matches!(result, Err(DesignSpaceError::EmptyData(_))));
}

#[test]
fn test_import_split_rows_without_header() {
    let records = vec![
        vec!["1".to_string(), "low".to_string()],
        vec!["2".to_string(), "high".to_string(), "extra".to_string()],
    ];
    let table = DataTable::from_records(records, false);
    let sheet = DataSheet::import(&table, &ImportConfig::default(), &mut NoProgress).unwrap();

    let names: Vec<&str> = sheet.parameters().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["Parameter 1", "Parameter 2", "Parameter 3"]);
    assert!(sheet.parameter_by_name("Parameter 1").unwrap().is_numeric());
    let third = sheet.parameter_by_name("Parameter 3").unwrap().id();
    assert_eq!(sheet.design(DesignId(1)).unwrap().string_value(third), "-");
}

// =============================================================================
// Filtering Scenario
// =============================================================================

#[test]
fn test_speed_gear_scenario() {
    let content = "speed,gear\n1.0,low\n5.0,high\n3.0,low\n";
    let file = create_test_file(content);

    let mut explorer = Explorer::open(file.path(), ExplorerConfig::default()).unwrap();
    let index = explorer.add_chart("main").unwrap();
    let speed = explorer.sheet().parameter_by_name("speed").unwrap().id();

    let (chart, sheet) = explorer.chart_mut(index).unwrap();
    chart.set_filter_value(speed, FilterKind::Upper, 4.0, sheet).unwrap();
    chart.set_filter_value(speed, FilterKind::Lower, 0.0, sheet).unwrap();

    let active: Vec<u64> = chart.active_designs(sheet).map(|d| d.id().0).collect();
    assert_eq!(active, vec![1, 3]);

    chart.set_filter_inverted(speed, true, sheet).unwrap();
    let active: Vec<u64> = chart.active_designs(sheet).map(|d| d.id().0).collect();
    assert_eq!(active, vec![2]);
}

#[test]
fn test_discrete_filter_by_level_index() {
    let mut sheet = import(&["gear"], &[&["low"], &["high"], &["medium"]]);
    let gear = sheet.parameter_by_name("gear").unwrap().id();
    let mut chart =
        designspace::Chart::new("main", &mut sheet, &Default::default()).unwrap();

    // Levels in index order: medium, low, high.
    assert_eq!(sheet.parameter(gear).unwrap().index_to_value(0).unwrap(), "medium");
    chart.set_filter_value(gear, FilterKind::Upper, 1.0, &mut sheet).unwrap();

    let active: Vec<u64> = chart.active_designs(&sheet).map(|d| d.id().0).collect();
    assert_eq!(active, vec![1, 3]);
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_update_cancel_restores_sheet() {
    let mut sheet = import(&["a", "b"], &[&["1", "x"], &["2", "y"]]);
    let cluster = sheet.add_cluster();
    sheet.assign_cluster(&[DesignId(1)], Some(cluster)).unwrap();

    let parameters_before = sheet.parameters().to_vec();
    let designs_before: Vec<_> = sheet.designs().cloned().collect();

    let update = table(&["a", "b"], &[&["7", "7"], &["8", "8"], &["9", "9"]]);
    let mut monitor = CancelAfter { limit: 2, done: 0 };
    let result = sheet.update(&update, &mut monitor);

    assert!(matches!(
        result,
        Err(DesignSpaceError::Cancelled { rows_processed: 2 })
    ));
    assert_eq!(sheet.parameters(), parameters_before.as_slice());
    assert_eq!(sheet.designs().cloned().collect::<Vec<_>>(), designs_before);
}

#[test]
fn test_update_inconsistent_rows_rejected() {
    let mut sheet = import(&["a", "b"], &[&["1", "2"]]);
    let update = table(&["a", "b"], &[&["1", "2"], &["3", "4", "5"]]);

    let err = sheet.update(&update, &mut NoProgress).unwrap_err();
    assert!(matches!(
        err,
        DesignSpaceError::InconsistentImport {
            row: 2,
            expected: 2,
            found: 3
        }
    ));
    assert!(err.to_string().contains("row 2"));
    assert_eq!(sheet.design_count(), 1);
}

#[test]
fn test_reload_updates_filters() {
    let file = create_test_file("x\n1\n2\n3\n");
    let mut explorer = Explorer::open(file.path(), ExplorerConfig::default()).unwrap();
    let index = explorer.add_chart("main").unwrap();
    let x = explorer.sheet().parameter_by_name("x").unwrap().id();
    {
        let (chart, sheet) = explorer.chart_mut(index).unwrap();
        chart.set_filter_value(x, FilterKind::Upper, 2.0, sheet).unwrap();
        assert_eq!(chart.active_count(sheet), 2);
    }

    std::fs::write(file.path(), "x\n1\n20\n30\n").unwrap();
    let changes = explorer.reload(&mut NoProgress).unwrap().expect("File changed");
    assert!(changes.change(x).unwrap().filter_apply_required);

    let chart = explorer.chart(index).unwrap();
    assert_eq!(chart.active_count(explorer.sheet()), 1);
}

#[test]
fn test_reload_keeps_filters_of_unchanged_columns() {
    let file = create_test_file("a,b\n1,x\n2,y\n3,z\n");
    let mut explorer = Explorer::open(file.path(), ExplorerConfig::default()).unwrap();
    let index = explorer.add_chart("main").unwrap();
    let a = explorer.sheet().parameter_by_name("a").unwrap().id();
    {
        let (chart, sheet) = explorer.chart_mut(index).unwrap();
        chart.set_filter_value(a, FilterKind::Upper, 2.0, sheet).unwrap();
        assert_eq!(chart.active_count(sheet), 2);
    }

    std::fs::write(file.path(), "a,b\n1,x\n2,y\n3,w\n").unwrap();
    let changes = explorer.reload(&mut NoProgress).unwrap().expect("File changed");
    assert!(changes.change(a).unwrap().is_unchanged());

    let chart = explorer.chart(index).unwrap();
    let active: Vec<u64> = chart.active_designs(explorer.sheet()).map(|d| d.id().0).collect();
    assert_eq!(active, vec![1, 2]);
}

#[test]
fn test_listener_receives_one_event_per_operation() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut sheet = import(&["a"], &[&["1"], &["2"]]);
    let received: Rc<RefCell<Vec<ChangeSet>>> = Rc::default();
    let sink = Rc::clone(&received);
    sheet.add_listener(move |event: &DataSheetEvent| {
        if let DataSheetEvent::DataChanged(changes) = event {
            sink.borrow_mut().push(changes.clone());
        }
    });

    sheet
        .update(&table(&["a"], &[&["1"], &["3"]]), &mut NoProgress)
        .unwrap();
    sheet.remove_designs(&[DesignId(1)]).unwrap();

    assert_eq!(received.borrow().len(), 2);
    assert!(received.borrow()[1].designs_changed);
}

// =============================================================================
// Cell Edit Tests
// =============================================================================

#[test]
fn test_set_cell_retypes_and_updates_charts() {
    let file = create_test_file("speed\n1\n5\n3\n");
    let mut explorer = Explorer::open(file.path(), ExplorerConfig::default()).unwrap();
    explorer.add_chart("main").unwrap();
    let speed = explorer.sheet().parameter_by_name("speed").unwrap().id();

    let report = explorer.set_cell(DesignId(2), speed, "n/a").unwrap();
    assert!(report.type_changed());
    assert_eq!(report.stored, CellValue::Text("n/a".into()));

    let sheet = explorer.sheet();
    let parameter = sheet.parameter(speed).unwrap();
    let axis = explorer.chart(0).unwrap().axis_for(speed).unwrap();
    assert!(!parameter.is_numeric());
    assert_eq!(axis.tick_count(parameter), 3);
}

#[test]
fn test_stored_float_survives_discrete_retype() {
    let mut sheet = import(&["v"], &[&["10"], &["20"]]);
    let v = sheet.parameter_by_name("v").unwrap().id();
    sheet.set_cell(DesignId(1), v, "abc").unwrap();

    let mut parameter = sheet.parameter(v).unwrap().clone();
    let design = sheet.design(DesignId(2)).unwrap();

    // "20" is a level, but the design still holds the number 20.
    assert!(parameter.index_of("20").is_some());
    assert_eq!(design.get_double_value(&mut parameter), 20.0);
}

#[test]
fn test_unknown_lookups() {
    let sheet = import(&["a"], &[&["1"]]);
    assert!(matches!(
        sheet.parameter_by_name("nope"),
        Err(DesignSpaceError::ParameterNotFound(_))
    ));
    assert!(matches!(
        sheet.parameter(ParameterId(99)),
        Err(DesignSpaceError::ParameterNotFound(_))
    ));
    assert!(matches!(
        sheet.design(DesignId(99)),
        Err(DesignSpaceError::DesignNotFound(99))
    ));
}

// =============================================================================
// Cluster Tests
// =============================================================================

#[test]
fn test_cluster_lifecycle() {
    let mut sheet = import(&["a"], &[&["1"], &["2"], &["3"]]);
    let first = sheet.add_cluster();
    let second = sheet.add_cluster();
    sheet
        .assign_cluster(&[DesignId(1), DesignId(2)], Some(first))
        .unwrap();
    sheet.assign_cluster(&[DesignId(3)], Some(second)).unwrap();

    assert_eq!(sheet.designs_in_cluster(first).count(), 2);

    sheet.remove_cluster(first).unwrap();
    assert!(sheet.designs().filter(|d| d.cluster().is_none()).count() == 2);

    let third = sheet.add_cluster();
    assert_eq!(sheet.clusters().get(third).unwrap().name(), "Cluster 1");
    assert_ne!(third, first);
}

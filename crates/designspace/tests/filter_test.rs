//! Filter semantics across axis and filter inversion.

use designspace::{
    AxisDefaults, Chart, DataSheet, DataTable, DesignId, FilterKind, ImportConfig, NoProgress,
    ParameterId,
};

/// A numeric column spanning 0..=100000, so the filter tolerance is exactly
/// 1.0, plus sample values around a threshold of 4.
fn probe_sheet() -> (DataSheet, ParameterId) {
    let values = ["0", "100000", "5", "5.5", "3", "2.5"];
    let table = DataTable::new(
        vec!["x".to_string()],
        values.iter().map(|v| vec![v.to_string()]).collect(),
        b',',
    );
    let sheet = DataSheet::import(&table, &ImportConfig::default(), &mut NoProgress)
        .expect("Import failed");
    let x = sheet.parameter_by_name("x").unwrap().id();
    (sheet, x)
}

const FIVE: DesignId = DesignId(3);
const FIVE_AND_A_HALF: DesignId = DesignId(4);
const THREE: DesignId = DesignId(5);
const TWO_AND_A_HALF: DesignId = DesignId(6);

fn filter_keeps(
    kind: FilterKind,
    axis_inverted: bool,
    filter_inverted: bool,
) -> (bool, bool, bool, bool) {
    let (mut sheet, x) = probe_sheet();
    let mut chart = Chart::new("window", &mut sheet, &AxisDefaults::default()).unwrap();
    chart.set_axis_inverted(x, axis_inverted, &mut sheet).unwrap();
    chart.set_filter_inverted(x, filter_inverted, &mut sheet).unwrap();
    chart.set_filter_value(x, kind, 4.0, &mut sheet).unwrap();

    let axis = chart.axis_for(x).unwrap();
    let parameter = sheet.parameter(x).unwrap();
    assert_eq!(axis.tolerance(parameter), 1.0);

    let id = axis.filter_id(kind);
    let bit = |design| sheet.design(design).unwrap().activation(id).unwrap();
    (
        bit(FIVE),
        bit(FIVE_AND_A_HALF),
        bit(THREE),
        bit(TWO_AND_A_HALF),
    )
}

/// Kept when `d - tol <= value`.
const FROM_ABOVE: (bool, bool, bool, bool) = (true, false, true, true);
/// Kept when `d + tol >= value`.
const FROM_BELOW: (bool, bool, bool, bool) = (true, true, true, false);

#[test]
fn test_upper_plain() {
    assert_eq!(filter_keeps(FilterKind::Upper, false, false), FROM_ABOVE);
}

#[test]
fn test_lower_plain() {
    assert_eq!(filter_keeps(FilterKind::Lower, false, false), FROM_BELOW);
}

#[test]
fn test_upper_axis_inverted() {
    assert_eq!(filter_keeps(FilterKind::Upper, true, false), FROM_BELOW);
}

#[test]
fn test_lower_axis_inverted() {
    assert_eq!(filter_keeps(FilterKind::Lower, true, false), FROM_ABOVE);
}

#[test]
fn test_upper_filter_inverted() {
    assert_eq!(filter_keeps(FilterKind::Upper, false, true), FROM_BELOW);
}

#[test]
fn test_lower_filter_inverted() {
    assert_eq!(filter_keeps(FilterKind::Lower, false, true), FROM_ABOVE);
}

#[test]
fn test_upper_both_inverted() {
    assert_eq!(filter_keeps(FilterKind::Upper, true, true), FROM_ABOVE);
}

#[test]
fn test_lower_both_inverted() {
    assert_eq!(filter_keeps(FilterKind::Lower, true, true), FROM_BELOW);
}

#[test]
fn test_axis_inversion_preserves_window() {
    let (mut sheet, x) = probe_sheet();
    let mut chart = Chart::new("window", &mut sheet, &AxisDefaults::default()).unwrap();
    chart.set_filter_value(x, FilterKind::Upper, 8.0, &mut sheet).unwrap();
    chart.set_filter_value(x, FilterKind::Lower, 2.0, &mut sheet).unwrap();
    let before: Vec<DesignId> = chart.active_designs(&sheet).map(|d| d.id()).collect();

    chart.set_axis_inverted(x, true, &mut sheet).unwrap();
    let axis = chart.axis_for(x).unwrap();
    assert_eq!(axis.maximum_filter().value(), 8.0);
    assert_eq!(axis.minimum_filter().value(), 2.0);

    let after: Vec<DesignId> = chart.active_designs(&sheet).map(|d| d.id()).collect();
    assert_eq!(before, after);
    assert_eq!(after, vec![FIVE, FIVE_AND_A_HALF, THREE, TWO_AND_A_HALF]);
}

#[test]
fn test_reset_is_idempotent() {
    let (mut sheet, x) = probe_sheet();
    let mut chart = Chart::new("window", &mut sheet, &AxisDefaults::default()).unwrap();
    chart.set_axis_inverted(x, true, &mut sheet).unwrap();
    chart.set_filter_value(x, FilterKind::Upper, 3.0, &mut sheet).unwrap();

    chart.reset_filters(x, &mut sheet).unwrap();
    let axis = chart.axis_for(x).unwrap().clone();
    let designs: Vec<_> = sheet.designs().cloned().collect();

    chart.reset_filters(x, &mut sheet).unwrap();
    let again = chart.axis_for(x).unwrap();
    assert_eq!(again.upper_filter(), axis.upper_filter());
    assert_eq!(again.lower_filter(), axis.lower_filter());
    assert_eq!(sheet.designs().cloned().collect::<Vec<_>>(), designs);
    assert_eq!(chart.active_count(&sheet), sheet.design_count());
}

#[test]
fn test_filter_inversion_with_configured_default() {
    let (mut sheet, x) = probe_sheet();
    let defaults = AxisDefaults {
        filter_inverted: true,
        ..Default::default()
    };
    let mut chart = Chart::new("window", &mut sheet, &defaults).unwrap();
    assert!(chart.axis_for(x).unwrap().is_filter_inverted());

    chart.set_window(x, 1.0, 10.0, &mut sheet).unwrap();
    let active: Vec<DesignId> = chart.active_designs(&sheet).map(|d| d.id()).collect();
    // Only the values outside 1..10 by more than the tolerance are kept.
    assert_eq!(active, vec![DesignId(1), DesignId(2)]);
}

//! Axes, their two threshold filters, and charts grouping axes.
//!
//! Every axis carries an upper and a lower [`Filter`]. Applying a filter
//! writes one activation bit per design, keyed by [`FilterId`]; a design is
//! active when the bits of every axis of a chart pass (see
//! [`Design::is_active`](crate::sheet::Design::is_active)).

mod axis;
mod chart;

use serde::{Deserialize, Serialize};

pub use axis::{Axis, AxisId};
pub use chart::Chart;

/// Relative tolerance applied to filter comparisons, as a share of the
/// axis range.
pub const RELATIVE_TOLERANCE: f64 = 1e-5;

/// Lower limit of the tolerance, for axes with a tiny or empty range.
pub const MIN_TOLERANCE: f64 = 1e-5;

/// Tolerance used when comparing design values with filter values.
pub fn tolerance(range: f64) -> f64 {
    (range * RELATIVE_TOLERANCE).max(MIN_TOLERANCE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Upper,
    Lower,
}

impl FilterKind {
    pub fn other(self) -> Self {
        match self {
            FilterKind::Upper => FilterKind::Lower,
            FilterKind::Lower => FilterKind::Upper,
        }
    }
}

/// Key of a filter's result in a design's activation map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterId {
    pub axis: AxisId,
    pub kind: FilterKind,
}

/// One threshold of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    kind: FilterKind,
    value: f64,
}

impl Filter {
    pub fn new(kind: FilterKind, value: f64) -> Self {
        Self { kind, value }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Whether a design with value `d` passes this filter.
    ///
    /// An upper filter keeps values below it and a lower filter values above
    /// it; each of the two inversion flags flips that direction once. NaN is
    /// never kept.
    pub fn keeps(&self, d: f64, tolerance: f64, axis_inverted: bool, filter_inverted: bool) -> bool {
        let from_above = (self.kind == FilterKind::Upper) ^ axis_inverted ^ filter_inverted;
        if from_above {
            d - tolerance <= self.value
        } else {
            d + tolerance >= self.value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_floor() {
        assert_eq!(tolerance(0.0), MIN_TOLERANCE);
        assert_eq!(tolerance(100_000.0), 1.0);
    }

    #[test]
    fn test_keeps_all_combinations() {
        // (kind, axis_inverted, filter_inverted, keeps values from above)
        let table = [
            (FilterKind::Upper, false, false, true),
            (FilterKind::Lower, false, false, false),
            (FilterKind::Upper, true, false, false),
            (FilterKind::Lower, true, false, true),
            (FilterKind::Upper, false, true, false),
            (FilterKind::Lower, false, true, true),
            (FilterKind::Upper, true, true, true),
            (FilterKind::Lower, true, true, false),
        ];
        for (kind, axis_inverted, filter_inverted, from_above) in table {
            let filter = Filter::new(kind, 4.0);
            let keeps = |d| filter.keeps(d, 1.0, axis_inverted, filter_inverted);
            if from_above {
                assert!(keeps(5.0), "{kind:?} {axis_inverted} {filter_inverted}");
                assert!(!keeps(5.5), "{kind:?} {axis_inverted} {filter_inverted}");
            } else {
                assert!(keeps(3.0), "{kind:?} {axis_inverted} {filter_inverted}");
                assert!(!keeps(2.5), "{kind:?} {axis_inverted} {filter_inverted}");
            }
        }
    }

    #[test]
    fn test_nan_never_kept() {
        let filter = Filter::new(FilterKind::Upper, 1.0);
        assert!(!filter.keeps(f64::NAN, 1.0, false, false));
        assert!(!filter.keeps(f64::NAN, 1.0, false, true));
    }
}

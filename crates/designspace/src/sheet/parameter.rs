//! Parameters (columns), their type inference and discrete level encoding.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::design::Design;
use crate::error::{DesignSpaceError, Result};
use crate::input::NumberParser;

/// Stable identity of a parameter within its data sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterId(pub u32);

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of scanning the values of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Every value parses as a number (or there are no values).
    Numeric,
    /// No value parses as a number.
    NonNumeric,
    /// Both numeric and non-numeric values were seen.
    Mixed,
}

impl ParameterKind {
    /// Returns true if the column can be stored as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ParameterKind::Numeric)
    }
}

/// Classify raw cell texts, stopping as soon as the column is known to be
/// mixed.
pub fn classify_values<I>(values: I, parser: &NumberParser) -> ParameterKind
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen_numeric = false;
    let mut seen_text = false;

    for value in values {
        if parser.is_numeric(value.as_ref()) {
            seen_numeric = true;
        } else {
            seen_text = true;
        }
        if seen_numeric && seen_text {
            return ParameterKind::Mixed;
        }
    }

    if seen_text {
        ParameterKind::NonNumeric
    } else {
        ParameterKind::Numeric
    }
}

/// Order of discrete levels: case-insensitive, descending.
pub fn compare_levels(a: &str, b: &str) -> Ordering {
    let a = a.chars().flat_map(char::to_lowercase);
    let b = b.chars().flat_map(char::to_lowercase);
    b.cmp(a)
}

/// The ordered set of values of a discrete parameter.
///
/// A level's index is its position in [`compare_levels`] order, so inserting
/// a level can shift the index of every level sorted after it. Levels that
/// differ only in case are the same level; the first spelling seen is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteLevels {
    levels: Vec<String>,
}

impl DiscreteLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the level set from arbitrary values, dropping duplicates.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut levels = Self::new();
        for value in values {
            levels.insert(value.as_ref());
        }
        levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Index of `value`, compared case-insensitively.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.levels
            .binary_search_by(|level| compare_levels(level, value))
            .ok()
    }

    /// Index of `value`, inserting it first if it is not a level yet.
    /// The flag tells whether an insert happened.
    pub fn insert(&mut self, value: &str) -> (usize, bool) {
        match self
            .levels
            .binary_search_by(|level| compare_levels(level, value))
        {
            Ok(index) => (index, false),
            Err(index) => {
                self.levels.insert(index, value.to_string());
                (index, true)
            }
        }
    }

    /// The level at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.levels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

/// One column of the data sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    id: ParameterId,
    name: String,
    numeric: bool,
    levels: DiscreteLevels,
    tic_label_digit_count: usize,
}

impl Parameter {
    /// Create a numeric parameter with no levels.
    pub fn new(id: ParameterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            numeric: true,
            levels: DiscreteLevels::new(),
            tic_label_digit_count: 3,
        }
    }

    pub fn id(&self) -> ParameterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names are kept unique by the owning data sheet.
    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    pub fn discrete_levels(&self) -> &DiscreteLevels {
        &self.levels
    }

    pub fn discrete_level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn tic_label_digit_count(&self) -> usize {
        self.tic_label_digit_count
    }

    pub fn set_tic_label_digit_count(&mut self, count: usize) {
        self.tic_label_digit_count = count;
    }

    /// Scan the raw value of every design for this parameter.
    pub fn classify<'a, I>(&self, designs: I, parser: &NumberParser) -> ParameterKind
    where
        I: IntoIterator<Item = &'a Design>,
    {
        classify_values(designs.into_iter().map(|d| d.string_value(self.id)), parser)
    }

    /// Switch between numeric and discrete.
    ///
    /// Turning a parameter discrete rebuilds its levels from the distinct
    /// values currently held by `designs`; turning it numeric drops them.
    /// Stored cell values are not converted here.
    pub fn set_numeric<'a, I>(&mut self, numeric: bool, designs: I)
    where
        I: IntoIterator<Item = &'a Design>,
    {
        self.numeric = numeric;
        self.levels.clear();
        if !numeric {
            for design in designs {
                self.levels.insert(&design.string_value(self.id));
            }
        }
    }

    /// Index of a discrete value without modifying the level set.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.levels.index_of(value)
    }

    /// Index of a discrete value, inserting it as a new level if needed.
    ///
    /// Inserting can move other levels, so indices obtained before a call
    /// that returns `true` must not be reused.
    pub fn value_to_index(&mut self, value: &str) -> (usize, bool) {
        self.levels.insert(value)
    }

    /// The discrete value at `index`.
    pub fn index_to_value(&self, index: usize) -> Result<&str> {
        self.levels
            .get(index)
            .ok_or_else(|| DesignSpaceError::CorruptData {
                parameter: self.name.clone(),
                index,
                level_count: self.levels.len(),
            })
    }
}

//! Locale-aware number parsing for cell values.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DesignSpaceError, Result};

/// Separators used when reading numbers written for a particular locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    /// Character between the integer and the fractional part.
    pub decimal_separator: char,
    /// Character between digit groups of the integer part.
    pub grouping_separator: char,
    /// Number of digits in a complete group.
    pub grouping_size: usize,
}

impl NumberLocale {
    /// `1,234.5`
    pub fn en_us() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
            grouping_size: 3,
        }
    }

    /// `1.234,5`
    pub fn de_de() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: '.',
            grouping_size: 3,
        }
    }

    /// `1 234,5` with a no-break space.
    pub fn fr_fr() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: '\u{a0}',
            grouping_size: 3,
        }
    }

    /// `1'234.5`
    pub fn ch() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: '\'',
            grouping_size: 3,
        }
    }

    /// Check that the separators can be told apart.
    pub fn validate(&self) -> Result<()> {
        if self.decimal_separator == self.grouping_separator {
            return Err(DesignSpaceError::Config(format!(
                "decimal and grouping separator are both '{}'",
                self.decimal_separator
            )));
        }
        if self.grouping_size == 0 {
            return Err(DesignSpaceError::Config(
                "grouping size must be at least 1".to_string(),
            ));
        }
        if self.decimal_separator.is_ascii_digit() || self.grouping_separator.is_ascii_digit() {
            return Err(DesignSpaceError::Config(
                "separators must not be digits".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl FromStr for NumberLocale {
    type Err = DesignSpaceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" | "c" => Ok(Self::en_us()),
            "de" | "de-de" | "de-at" | "it-it" | "es-es" => Ok(Self::de_de()),
            "fr" | "fr-fr" => Ok(Self::fr_fr()),
            "ch" | "de-ch" => Ok(Self::ch()),
            _ => Err(DesignSpaceError::Config(format!(
                "Unknown locale: {}. Use en-US, de-DE, fr-FR or de-CH.",
                s
            ))),
        }
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decimal '{}', grouping '{}' every {}",
            self.decimal_separator, self.grouping_separator, self.grouping_size
        )
    }
}

/// Parses cell text into numbers using a [`NumberLocale`].
///
/// A cell is numeric only when the whole text is consumed. Grouping
/// separators are accepted in the integer part, but two separators closer
/// together than the grouping size (`1,23,456` for `en-US`) make the text
/// ambiguous and it is rejected.
#[derive(Debug, Clone)]
pub struct NumberParser {
    locale: NumberLocale,
    short_group: Regex,
}

impl NumberParser {
    /// Create a parser for the given locale.
    pub fn new(locale: NumberLocale) -> Result<Self> {
        locale.validate()?;
        let sep = regex::escape(&locale.grouping_separator.to_string());
        let short_group = Regex::new(&format!(
            r"{sep}[0-9]{{0,{}}}{sep}",
            locale.grouping_size - 1
        ))?;
        Ok(Self {
            locale,
            short_group,
        })
    }

    /// The locale this parser reads.
    pub fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    /// Parse `text`, returning `None` when it is not a well-formed number.
    pub fn parse(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        if text.is_empty() || self.short_group.is_match(text) {
            return None;
        }

        let mut normalized = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        if let Some(&sign) = chars.peek() {
            if sign == '-' || sign == '+' {
                normalized.push(sign);
                chars.next();
            }
        }

        // Integer part with optional grouping.
        let mut integer_digits = 0;
        let mut previous_was_digit = false;
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                normalized.push(c);
                integer_digits += 1;
                previous_was_digit = true;
                chars.next();
            } else if c == self.locale.grouping_separator {
                if !previous_was_digit {
                    return None;
                }
                chars.next();
                match chars.peek() {
                    Some(next) if next.is_ascii_digit() => {}
                    _ => return None,
                }
                previous_was_digit = false;
            } else {
                break;
            }
        }

        // Fraction.
        let mut fraction_digits = 0;
        if chars.peek() == Some(&self.locale.decimal_separator) {
            chars.next();
            normalized.push('.');
            while let Some(&c) = chars.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                normalized.push(c);
                fraction_digits += 1;
                chars.next();
            }
        }

        if integer_digits + fraction_digits == 0 {
            return None;
        }

        // Exponent.
        if matches!(chars.peek(), Some('e') | Some('E')) {
            chars.next();
            normalized.push('e');
            if let Some(&sign) = chars.peek() {
                if sign == '-' || sign == '+' {
                    normalized.push(sign);
                    chars.next();
                }
            }
            let mut exponent_digits = 0;
            while let Some(&c) = chars.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                normalized.push(c);
                exponent_digits += 1;
                chars.next();
            }
            if exponent_digits == 0 {
                return None;
            }
        }

        // Trailing garbage.
        if chars.next().is_some() {
            return None;
        }

        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Whether `text` parses as a number.
    pub fn is_numeric(&self, text: &str) -> bool {
        self.parse(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> NumberParser {
        NumberParser::new(NumberLocale::en_us()).unwrap()
    }

    fn de() -> NumberParser {
        NumberParser::new(NumberLocale::de_de()).unwrap()
    }

    #[test]
    fn test_plain_numbers() {
        let p = en();
        assert_eq!(p.parse("42"), Some(42.0));
        assert_eq!(p.parse("-3.5"), Some(-3.5));
        assert_eq!(p.parse(".5"), Some(0.5));
        assert_eq!(p.parse("  7 "), Some(7.0));
        assert_eq!(p.parse("1.5e3"), Some(1500.0));
        assert_eq!(p.parse("2E-2"), Some(0.02));
    }

    #[test]
    fn test_grouping() {
        let p = en();
        assert_eq!(p.parse("1,234"), Some(1234.0));
        assert_eq!(p.parse("1,234,567.25"), Some(1234567.25));
        assert_eq!(de().parse("1.234.567,25"), Some(1234567.25));
    }

    #[test]
    fn test_wrong_grouping_distance() {
        assert_eq!(en().parse("1,23,456"), None);
        assert_eq!(de().parse("1.2.345"), None);
        assert_eq!(en().parse("1,,234"), None);
    }

    #[test]
    fn test_trailing_garbage() {
        let p = en();
        assert_eq!(p.parse("12abc"), None);
        assert_eq!(p.parse("1.2.3"), None);
        assert_eq!(p.parse("1e"), None);
        assert_eq!(p.parse("1,"), None);
        assert_eq!(p.parse(",1"), None);
    }

    #[test]
    fn test_non_numbers() {
        let p = en();
        assert_eq!(p.parse(""), None);
        assert_eq!(p.parse("-"), None);
        assert_eq!(p.parse("high"), None);
        assert_eq!(p.parse("."), None);
        assert_eq!(p.parse("NaN"), None);
    }

    #[test]
    fn test_german_decimal_comma() {
        let p = de();
        assert_eq!(p.parse("3,25"), Some(3.25));
        // A single short group is read as grouping, not as a decimal point.
        assert_eq!(p.parse("3.25"), Some(325.0));
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("de-DE".parse::<NumberLocale>().unwrap(), NumberLocale::de_de());
        assert_eq!("en_us".parse::<NumberLocale>().unwrap(), NumberLocale::en_us());
        assert!("xx".parse::<NumberLocale>().is_err());
    }

    #[test]
    fn test_invalid_locale() {
        let locale = NumberLocale {
            decimal_separator: '.',
            grouping_separator: '.',
            grouping_size: 3,
        };
        assert!(NumberParser::new(locale).is_err());
    }
}

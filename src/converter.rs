//! Unit conversion for length, weight and temperature.
//!
//! Length and weight go through a table of factors relative to a base unit
//! (meter, kilogram). Temperature uses a formula per pair of units.

use crate::error::{Error, Result};
use crate::format::format_conversion;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Unit symbol to factor, relative to a base unit with factor 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionTable {
    name: &'static str,
    base_unit: &'static str,
    factors: &'static [(&'static str, f64)],
}

impl ConversionTable {
    /// Create a table. `factors[unit]` is how many `unit` make one
    /// `base_unit`.
    pub const fn new(
        name: &'static str,
        base_unit: &'static str,
        factors: &'static [(&'static str, f64)],
    ) -> Self {
        Self {
            name,
            base_unit,
            factors,
        }
    }

    /// Name of the quantity, e.g. `length`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Unit whose factor is 1.
    pub fn base_unit(&self) -> &'static str {
        self.base_unit
    }

    /// Factor of `unit` relative to the base unit.
    pub fn factor(&self, unit: &str) -> Result<f64> {
        self.factors
            .iter()
            .find(|(symbol, _)| *symbol == unit)
            .map(|&(_, factor)| factor)
            .ok_or_else(|| Error::unknown_unit(self.name, unit))
    }

    /// Unit symbols in table order.
    pub fn units(&self) -> impl Iterator<Item = &'static str> {
        self.factors.iter().map(|&(symbol, _)| symbol)
    }
}

/// Length units relative to the meter
pub const LENGTH: ConversionTable = ConversionTable::new(
    "length",
    "m",
    &[
        ("m", 1.0),
        ("cm", 100.0),
        ("mm", 1000.0),
        ("km", 0.001),
        ("in", 39.3701),
        ("ft", 3.28084),
        ("yd", 1.09361),
        ("mi", 0.000_621_371),
    ],
);

/// Weight units relative to the kilogram
pub const WEIGHT: ConversionTable = ConversionTable::new(
    "weight",
    "kg",
    &[
        ("kg", 1.0),
        ("g", 1000.0),
        ("lb", 2.20462),
        ("oz", 35.274),
        ("stone", 0.157_473),
        ("ton", 0.001),
    ],
);

/// Temperature unit symbols.
pub const TEMPERATURE_UNITS: [&str; 3] = ["c", "f", "k"];

/// Convert with a factor table: `value / table[from] * table[to]`.
///
/// ```
/// # use deskcalc::converter::{convert_linear, LENGTH};
/// assert_eq!(convert_linear(&LENGTH, 1000.0, "m", "km"), Ok(1.0));
/// ```
pub fn convert_linear(table: &ConversionTable, value: f64, from: &str, to: &str) -> Result<f64> {
    let base = value / table.factor(from)?;
    Ok(base * table.factor(to)?)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    fn parse(unit: &str) -> Result<Self> {
        match unit {
            "c" => Ok(Self::Celsius),
            "f" => Ok(Self::Fahrenheit),
            "k" => Ok(Self::Kelvin),
            other => Err(Error::unknown_unit(Category::Temperature.as_str(), other)),
        }
    }

    fn formula(from: Self, to: Self) -> fn(f64) -> f64 {
        use TemperatureUnit::{Celsius, Fahrenheit, Kelvin};
        match (from, to) {
            (Celsius, Fahrenheit) => |c: f64| c * 9.0 / 5.0 + 32.0,
            (Celsius, Kelvin) => |c: f64| c + 273.15,
            (Fahrenheit, Celsius) => |f: f64| (f - 32.0) * 5.0 / 9.0,
            (Fahrenheit, Kelvin) => |f: f64| (f - 32.0) * 5.0 / 9.0 + 273.15,
            (Kelvin, Celsius) => |k: f64| k - 273.15,
            (Kelvin, Fahrenheit) => |k: f64| (k - 273.15) * 9.0 / 5.0 + 32.0,
            _ => |same: f64| same,
        }
    }
}

/// Convert a temperature between `c`, `f` and `k`.
///
/// ```
/// # use deskcalc::converter::convert_temperature;
/// assert_eq!(convert_temperature(100.0, "c", "f"), Ok(212.0));
/// ```
pub fn convert_temperature(value: f64, from: &str, to: &str) -> Result<f64> {
    let from = TemperatureUnit::parse(from)?;
    let to = TemperatureUnit::parse(to)?;
    Ok(TemperatureUnit::formula(from, to)(value))
}

/// The quantity being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Metres, inches, miles and the like
    Length,
    /// Kilograms, pounds and the like
    Weight,
    /// Celsius, Fahrenheit and Kelvin
    Temperature,
}

impl Category {
    /// Every category, in menu order
    pub const ALL: [Category; 3] = [Self::Length, Self::Weight, Self::Temperature];

    /// Lower-case name, as accepted by `from_str`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Weight => "weight",
            Self::Temperature => "temperature",
        }
    }

    /// Unit symbols accepted by this category.
    pub fn units(self) -> Vec<&'static str> {
        match self {
            Self::Length => LENGTH.units().collect(),
            Self::Weight => WEIGHT.units().collect(),
            Self::Temperature => TEMPERATURE_UNITS.to_vec(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::invalid(format!("unknown conversion category {}", s)))
    }
}

/// Which of the two paired fields was edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `value` is in the `from` unit, the result in the `to` unit
    Forward,
    /// `value` is in the `to` unit, the result in the `from` unit
    Reverse,
}

/// Convert `value` and format the result for its field.
///
/// ```
/// # use deskcalc::converter::{convert, Category, Direction};
/// assert_eq!(convert(Category::Weight, 1.0, "kg", "g", Direction::Forward).unwrap(), "1000");
/// assert_eq!(convert(Category::Weight, 1.0, "kg", "g", Direction::Reverse).unwrap(), "0.001");
/// ```
pub fn convert(
    category: Category,
    value: f64,
    from: &str,
    to: &str,
    direction: Direction,
) -> Result<String> {
    let (source, target) = match direction {
        Direction::Forward => (from, to),
        Direction::Reverse => (to, from),
    };
    let result = match category {
        Category::Length => convert_linear(&LENGTH, value, source, target)?,
        Category::Weight => convert_linear(&WEIGHT, value, source, target)?,
        Category::Temperature => convert_temperature(value, source, target)?,
    };
    debug!(%category, value, source, target, result, "converted");
    Ok(format_conversion(result))
}

/// Like [`convert`], reading the value from field text. The number the text
/// starts with is used, so `12kg` reads as 12; text that does not start with
/// a number counts as 0.
pub fn convert_str(
    category: Category,
    input: &str,
    from: &str,
    to: &str,
    direction: Direction,
) -> Result<String> {
    let value = leading_number(input).unwrap_or(0.0);
    convert(category, value, from, to, direction)
}

fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .unwrap_or_else(|| text.len());
    let candidate = &text[..end];
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const METRIC: ConversionTable =
        ConversionTable::new("length", "m", &[("m", 1.0), ("km", 0.001)]);

    #[test]
    fn linear() {
        assert_eq!(convert_linear(&METRIC, 1000.0, "m", "km"), Ok(1.0));
        assert_eq!(convert_linear(&METRIC, 2.0, "km", "m"), Ok(2000.0));
        assert_eq!(convert_linear(&METRIC, 5.0, "km", "km"), Ok(5.0));
        assert_eq!(
            convert_linear(&METRIC, 1.0, "m", "mi"),
            Err(Error::UnknownUnit {
                category: "length".to_string(),
                unit: "mi".to_string()
            })
        );
    }

    #[test_case(0.0, "c", "f" => Ok(32.0) ; "freezing in fahrenheit")]
    #[test_case(212.0, "f", "c" => Ok(100.0) ; "boiling in celsius")]
    #[test_case(0.0, "c", "k" => Ok(273.15) ; "celsius to kelvin")]
    #[test_case(273.15, "k", "c" => Ok(0.0) ; "kelvin to celsius")]
    #[test_case(-40.0, "f", "c" => Ok(-40.0) ; "scales cross")]
    #[test_case(37.5, "k", "k" => Ok(37.5) ; "identity")]
    fn temperature(value: f64, from: &str, to: &str) -> Result<f64> {
        convert_temperature(value, from, to)
    }

    #[test]
    fn unknown_temperature_unit() {
        assert!(matches!(
            convert_temperature(1.0, "c", "r"),
            Err(Error::UnknownUnit { .. })
        ));
    }

    #[test]
    fn round_trips() {
        let tables = [LENGTH, WEIGHT];
        for table in &tables {
            for from in table.units() {
                for to in table.units() {
                    let there = convert_linear(table, 123.456, from, to).unwrap();
                    let back = convert_linear(table, there, to, from).unwrap();
                    assert!((back - 123.456).abs() < 1e-9, "{} -> {} -> {}", from, to, from);
                }
            }
        }
        for from in &TEMPERATURE_UNITS {
            for to in &TEMPERATURE_UNITS {
                let there = convert_temperature(-12.5, from, to).unwrap();
                let back = convert_temperature(there, to, from).unwrap();
                assert!((back + 12.5).abs() < 1e-9, "{} -> {} -> {}", from, to, from);
            }
        }
    }

    #[test_case(Category::Length, "1", "mi", "m", Direction::Forward => "1609.34449789" ; "miles to meters")]
    #[test_case(Category::Length, "1", "mi", "m", Direction::Reverse => "0.00062137" ; "reverse field")]
    #[test_case(Category::Length, "5000", "km", "mm", Direction::Forward => "5.000000e+9" ; "large result")]
    #[test_case(Category::Weight, "abc", "kg", "lb", Direction::Forward => "0" ; "text counts as zero")]
    #[test_case(Category::Weight, "12abc", "kg", "g", Direction::Forward => "12000" ; "number prefix is read")]
    #[test_case(Category::Length, "2.5e1m", "m", "cm", Direction::Forward => "2500" ; "exponent prefix")]
    #[test_case(Category::Length, "3-4", "m", "cm", Direction::Forward => "300" ; "stops at the first bad sign")]
    #[test_case(Category::Length, "-", "m", "cm", Direction::Forward => "0" ; "lone sign")]
    #[test_case(Category::Temperature, " 100 ", "c", "f", Direction::Forward => "212" ; "trimmed input")]
    #[test_case(Category::Temperature, "32", "c", "f", Direction::Reverse => "0" ; "reverse temperature")]
    fn field_conversion(
        category: Category,
        input: &str,
        from: &str,
        to: &str,
        direction: Direction,
    ) -> String {
        convert_str(category, input, from, to, direction).unwrap()
    }

    #[test]
    fn categories() {
        assert_eq!("weight".parse::<Category>(), Ok(Category::Weight));
        assert!("volume".parse::<Category>().is_err());
        assert_eq!(Category::Length.units().len(), 8);
        assert_eq!(Category::Temperature.units(), vec!["c", "f", "k"]);
        assert_eq!(LENGTH.base_unit(), "m");
        assert_eq!(WEIGHT.name(), "weight");
    }
}

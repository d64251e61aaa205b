//! Text rendering of numbers for the display, the history view and the unit
//! converter.

use crate::util::round_to;

/// Display text for a failed computation.
pub const ERROR: &str = "Error";
/// Display text for positive infinity.
pub const INFINITY: &str = "Infinity";
/// Display text for negative infinity.
pub const NEG_INFINITY: &str = "-Infinity";

/// Values above this magnitude are shown in exponential notation.
const DISPLAY_MAX: f64 = 999_999_999.0;
/// Converted values above this magnitude are shown in exponential notation.
const CONVERSION_MAX: f64 = 999_999.0;
/// Nonzero values below this magnitude are shown in exponential notation.
const SMALLEST_PLAIN: f64 = 0.000_001;

/// Check if `text` is one of the display sentinels.
pub fn is_sentinel(text: &str) -> bool {
    text == ERROR || text == INFINITY || text == NEG_INFINITY
}

/// Canonical decimal text for `value`, as stored in the display.
///
/// ```
/// # use deskcalc::format::format_number;
/// assert_eq!(format_number(10.0), "10");
/// assert_eq!(format_number(-0.25), "-0.25");
/// assert_eq!(format_number(f64::INFINITY), "Infinity");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        ERROR.to_string()
    } else if value.is_infinite() {
        let sentinel = if value > 0.0 { INFINITY } else { NEG_INFINITY };
        sentinel.to_string()
    } else if value == 0.0 {
        // no negative zero on the display
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Exponential notation with `digits` fractional digits and a signed
/// exponent, e.g. `1.234568e+9`.
pub fn to_exponential(value: f64, digits: usize) -> String {
    let text = format!("{:.*e}", digits, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

fn needs_exponent(value: f64, max: f64) -> bool {
    value.abs() > max || (value != 0.0 && value.abs() < SMALLEST_PLAIN)
}

/// Render the raw display text for output.
///
/// Sentinels and expressions under composition are shown as they are. Numbers
/// too large or too small switch to exponential notation; any other number
/// keeps the text the user typed, so `"12."` stays `"12."` while typing.
pub fn format_display(raw: &str) -> String {
    if is_sentinel(raw) {
        return raw.to_string();
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() && needs_exponent(number, DISPLAY_MAX) => {
            to_exponential(number, 6)
        }
        _ => raw.to_string(),
    }
}

/// Render a converted value: exponential beyond the converter thresholds,
/// otherwise rounded to 8 decimal places with trailing zeros trimmed.
pub fn format_conversion(value: f64) -> String {
    if !value.is_finite() {
        return format_number(value);
    }
    if needs_exponent(value, CONVERSION_MAX) {
        to_exponential(value, 6)
    } else {
        format_number(round_to(value, 8))
    }
}

use hashbrown::HashMap;

/// Names of the functions understood by the evaluator, in keypad order.
pub const FUNCTION_NAMES: [&str; 6] = ["sin", "cos", "tan", "log", "ln", "sqrt"];

lazy_static! {
    /// Unary functions available in expressions. Trigonometric functions take
    /// their argument in degrees.
    pub static ref FUNCTIONS: HashMap<&'static str, fn(f64) -> f64> = {
        let mut map = HashMap::<&'static str, fn(f64) -> f64>::new();
        map.insert("sin", sin_degrees);
        map.insert("cos", cos_degrees);
        map.insert("tan", tan_degrees);
        map.insert("log", libm::log10);
        map.insert("ln", libm::log);
        map.insert("sqrt", libm::sqrt);
        map.shrink_to_fit();
        map
    };
}

fn sin_degrees(angle: f64) -> f64 {
    libm::sin(angle.to_radians())
}

fn cos_degrees(angle: f64) -> f64 {
    libm::cos(angle.to_radians())
}

fn tan_degrees(angle: f64) -> f64 {
    libm::tan(angle.to_radians())
}

/// Round `value` to `places` decimal places, the way a fixed-point print
/// followed by a re-parse would.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn every_name_has_a_function() {
        for name in &FUNCTION_NAMES {
            assert!(FUNCTIONS.contains_key(name), "{} is missing", name);
        }
        assert_eq!(FUNCTIONS.len(), FUNCTION_NAMES.len());
    }

    #[test_case(0.1 + 0.2, 10 => 0.3 ; "floating point noise is dropped")]
    #[test_case(2.0 / 3.0, 4 => 0.6667 ; "rounds half up")]
    #[test_case(-1.25e-12, 10 => 0.0 ; "tiny values collapse to zero")]
    #[test_case(42.0, 10 => 42.0 ; "integers are unchanged")]
    fn rounding(value: f64, places: usize) -> f64 {
        round_to(value, places)
    }

    #[test]
    fn trigonometry_uses_degrees() {
        assert_eq!(round_to(FUNCTIONS["sin"](90.0), 10), 1.0);
        assert_eq!(round_to(FUNCTIONS["cos"](180.0), 10), -1.0);
        assert_eq!(round_to(FUNCTIONS["tan"](45.0), 10), 1.0);
    }
}

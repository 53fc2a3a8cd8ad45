//! Pure helper functions for extracting typed options from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value is not the expected type, the default is returned.
//! These never fail -- they always produce a usable value. Used by the
//! embedding layers (WASM options string) to configure the pipeline.

use serde_json::Value;

/// Extracts an `f64` from `options[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn option_f64(options: &Value, name: &str, default: f64) -> f64 {
    options.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `options[name]`, returning `default` if missing or wrong type.
///
/// Only succeeds if the JSON value is a non-negative integer that fits in `u64`,
/// then converts to `usize`.
pub fn option_usize(options: &Value, name: &str, default: usize) -> usize {
    options
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `String` from `options[name]`, returning `default` if missing or wrong type.
pub fn option_string(options: &Value, name: &str, default: &str) -> String {
    options
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- option_f64 --

    #[test]
    fn option_f64_extracts_existing_float() {
        let options = json!({"angular_velocity": 0.8});
        assert!((option_f64(&options, "angular_velocity", 1.0) - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn option_f64_extracts_integer_as_float() {
        let options = json!({"angular_velocity": 2});
        assert!((option_f64(&options, "angular_velocity", 0.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn option_f64_returns_default_when_key_missing() {
        let options = json!({"other": 1.0});
        assert!((option_f64(&options, "angular_velocity", 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn option_f64_returns_default_when_wrong_type() {
        let options = json!({"angular_velocity": "fast"});
        assert!((option_f64(&options, "angular_velocity", 1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn option_f64_returns_default_for_non_object() {
        let options = json!("not an object");
        assert!((option_f64(&options, "angular_velocity", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    // -- option_usize --

    #[test]
    fn option_usize_extracts_existing_integer() {
        let options = json!({"lut_size": 32});
        assert_eq!(option_usize(&options, "lut_size", 16), 32);
    }

    #[test]
    fn option_usize_returns_default_when_key_missing() {
        let options = json!({});
        assert_eq!(option_usize(&options, "lut_size", 16), 16);
    }

    #[test]
    fn option_usize_returns_default_for_float_value() {
        // 2.5 is not a valid u64, so should fall back to default
        let options = json!({"lut_size": 2.5});
        assert_eq!(option_usize(&options, "lut_size", 99), 99);
    }

    #[test]
    fn option_usize_returns_default_for_negative_integer() {
        let options = json!({"lut_size": -1});
        assert_eq!(option_usize(&options, "lut_size", 5), 5);
    }

    // -- option_string --

    #[test]
    fn option_string_extracts_existing_string() {
        let options = json!({"lut": "grayscale"});
        assert_eq!(option_string(&options, "lut", "identity"), "grayscale");
    }

    #[test]
    fn option_string_returns_default_when_key_missing() {
        let options = json!({});
        assert_eq!(option_string(&options, "lut", "identity"), "identity");
    }

    #[test]
    fn option_string_returns_default_for_wrong_type() {
        let options = json!({"lut": 42});
        assert_eq!(option_string(&options, "lut", "identity"), "identity");
    }

    #[test]
    fn option_string_handles_empty_string_value() {
        let options = json!({"lut": ""});
        assert_eq!(option_string(&options, "lut", "identity"), "");
    }
}

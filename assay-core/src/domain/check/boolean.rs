// assay-core/src/domain/check/boolean.rs

use crate::domain::error::DomainError;

const TRUTHY: [&str; 6] = ["y", "yes", "t", "true", "on", "1"];
const FALSY: [&str; 6] = ["n", "no", "f", "false", "off", "0"];

/// Parses a boolean-like string (case-insensitive).
///
/// Accepts `y, yes, t, true, on, 1` and `n, no, f, false, off, 0`.
/// Anything else is a conversion error, never a default.
pub fn parse_loose_boolean(value: &str) -> Result<bool, DomainError> {
    let lowered = value.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        return Ok(true);
    }
    if FALSY.contains(&lowered.as_str()) {
        return Ok(false);
    }
    Err(DomainError::conversion(format!(
        "'{}' is not a boolean-like string value",
        lowered
    )))
}

//! Environment defaults.
//!
//! `FITINT_SUBDIVISIONS` and `FITINT_PRECISION` may be set in the process
//! environment or a `.env` file. Command-line flags take precedence.

use crate::domain::DEFAULT_SUBDIVISIONS;
use crate::error::AppError;
use crate::expr::{DEFAULT_SIGNIFICANT_DIGITS, MAX_SIGNIFICANT_DIGITS};

pub const ENV_SUBDIVISIONS: &str = "FITINT_SUBDIVISIONS";
pub const ENV_PRECISION: &str = "FITINT_PRECISION";

/// Defaults used when a flag is not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvDefaults {
    pub subdivisions: usize,
    pub significant_digits: usize,
}

impl Default for EnvDefaults {
    fn default() -> Self {
        Self {
            subdivisions: DEFAULT_SUBDIVISIONS,
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

impl EnvDefaults {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve defaults from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut defaults = Self::default();

        if let Some(raw) = lookup(ENV_SUBDIVISIONS) {
            defaults.subdivisions = parse_subdivisions(&raw)
                .map_err(|msg| AppError::input(format!("Invalid {ENV_SUBDIVISIONS}='{raw}': {msg}")))?;
        }
        if let Some(raw) = lookup(ENV_PRECISION) {
            defaults.significant_digits = parse_precision(&raw)
                .map_err(|msg| AppError::input(format!("Invalid {ENV_PRECISION}='{raw}': {msg}")))?;
        }

        Ok(defaults)
    }
}

/// A positive even integer.
pub fn parse_subdivisions(raw: &str) -> Result<usize, String> {
    let n: usize = raw
        .trim()
        .parse()
        .map_err(|_| "expected a positive even integer".to_string())?;
    if n < 2 || n % 2 != 0 {
        return Err(format!("expected a positive even integer, got {n}"));
    }
    Ok(n)
}

/// Significant digits in `1..=17`.
pub fn parse_precision(raw: &str) -> Result<usize, String> {
    let d: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected an integer in 1..={MAX_SIGNIFICANT_DIGITS}"))?;
    check_precision(d)
}

pub fn check_precision(d: usize) -> Result<usize, String> {
    if !(1..=MAX_SIGNIFICANT_DIGITS).contains(&d) {
        return Err(format!("expected an integer in 1..={MAX_SIGNIFICANT_DIGITS}, got {d}"));
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_builtin_defaults() {
        let d = EnvDefaults::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(d, EnvDefaults::default());
        assert_eq!(d.subdivisions, 1000);
        assert_eq!(d.significant_digits, 10);
    }

    #[test]
    fn variables_override_defaults() {
        let d = EnvDefaults::from_lookup(lookup_in(&[(ENV_SUBDIVISIONS, "200"), (ENV_PRECISION, " 6 ")])).unwrap();
        assert_eq!(d.subdivisions, 200);
        assert_eq!(d.significant_digits, 6);
    }

    #[test]
    fn invalid_values_are_input_errors() {
        for (key, value) in [
            (ENV_SUBDIVISIONS, "7"),
            (ENV_SUBDIVISIONS, "0"),
            (ENV_SUBDIVISIONS, "lots"),
            (ENV_PRECISION, "0"),
            (ENV_PRECISION, "18"),
            (ENV_PRECISION, "-3"),
        ] {
            let err = EnvDefaults::from_lookup(lookup_in(&[(key, value)])).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{key}={value}");
            assert!(err.to_string().contains(key));
        }
    }
}

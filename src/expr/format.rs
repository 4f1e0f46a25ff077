//! Number and term rendering for model expressions.
//!
//! Fitted coefficients are written with a fixed number of significant digits.
//! The output must stay inside the expression grammar, so we never emit
//! exponent notation and never emit `NaN`/`inf`.

/// Default significant digits used when rendering coefficients.
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 10;

/// Largest meaningful precision for an `f64`.
pub const MAX_SIGNIFICANT_DIGITS: usize = 17;

/// Round `v` to `digits` significant digits.
///
/// `digits` is clamped into `1..=MAX_SIGNIFICANT_DIGITS`.
pub fn round_significant(v: f64, digits: usize) -> f64 {
    if v == 0.0 || !v.is_finite() {
        return v;
    }
    let digits = digits.clamp(1, MAX_SIGNIFICANT_DIGITS);
    // Scientific formatting does the decimal rounding for us.
    format!("{:.*e}", digits - 1, v).parse().unwrap_or(v)
}

/// Render a coefficient as plain decimal text.
///
/// Non-finite values become `(1/0)`, `-(1/0)` or `(0/0)`: still valid input,
/// and evaluating them is a division-by-zero error.
pub fn format_number(v: f64, digits: usize) -> String {
    if v.is_nan() {
        return "(0/0)".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "(1/0)".to_string() } else { "-(1/0)".to_string() };
    }
    let r = round_significant(v, digits);
    // Avoid "-0".
    if r == 0.0 { "0".to_string() } else { format!("{r}") }
}

/// Join signed terms into `t0 + t1 - t2 ...`.
///
/// Each entry is `(coefficient, body)` where `body` renders the term given the
/// absolute coefficient text, e.g. `|c| format!("{c}*x^2")`.
pub fn join_terms<F>(terms: &[(f64, F)], digits: usize) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::new();
    for (i, (coef, body)) in terms.iter().enumerate() {
        let rounded = round_significant(*coef, digits);
        let negative = rounded < 0.0;
        let text = body(format_number(rounded.abs(), digits).as_str());
        match (i, negative) {
            (0, false) => out.push_str(&text),
            (0, true) => {
                out.push('-');
                out.push_str(&text);
            }
            (_, false) => {
                out.push_str(" + ");
                out.push_str(&text);
            }
            (_, true) => {
                out.push_str(" - ");
                out.push_str(&text);
            }
        }
    }
    out
}

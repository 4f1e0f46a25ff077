//! Model evaluation for each regression family.
//!
//! The fitter relies on three primitive operations:
//! - build a design row for a given x (for OLS on the linearized problem)
//! - map an observed y onto the linearized response
//! - predict y(x) given the final coefficients (for residuals/plots/integration)
//!
//! Exponential and power models are linear after taking logs, so their
//! regression runs on `ln y` and the intercept is mapped back with `exp`.

use crate::domain::ModelFamily;
use crate::expr::{format_number, join_terms};

/// Fill a design row for the given family.
///
/// The row includes the constant term first (intercept).
///
/// # Panics
/// Panics if `out` does not have length `family.param_count()`. Callers should
/// size it correctly.
pub fn fill_design_row(family: ModelFamily, x: f64, out: &mut [f64]) {
    match family {
        ModelFamily::Linear | ModelFamily::Exponential => {
            out[0] = 1.0;
            out[1] = x;
        }
        ModelFamily::Logarithmic | ModelFamily::Power => {
            out[0] = 1.0;
            out[1] = x.ln();
        }
        ModelFamily::Polynomial(_) => {
            let mut p = 1.0;
            for slot in out.iter_mut() {
                *slot = p;
                p *= x;
            }
        }
    }
}

/// Response value used by the linearized regression.
pub fn linearized_response(family: ModelFamily, y: f64) -> f64 {
    if family.needs_positive_y() { y.ln() } else { y }
}

/// Convert linear-regression coefficients back to model coefficients.
pub fn coefficients_from_regression(family: ModelFamily, beta: &[f64]) -> Vec<f64> {
    match family {
        ModelFamily::Exponential | ModelFamily::Power => vec![beta[0].exp(), beta[1]],
        _ => beta.to_vec(),
    }
}

/// Predict `y(x)` for the given family.
pub fn predict(family: ModelFamily, x: f64, coefficients: &[f64]) -> f64 {
    match family {
        ModelFamily::Linear => coefficients[0] + coefficients[1] * x,
        ModelFamily::Exponential => coefficients[0] * (coefficients[1] * x).exp(),
        ModelFamily::Logarithmic => coefficients[0] + coefficients[1] * x.ln(),
        ModelFamily::Power => coefficients[0] * x.powf(coefficients[1]),
        // Horner, highest power first.
        ModelFamily::Polynomial(_) => coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c),
    }
}

/// Render the model as text in the expression language.
///
/// Coefficients are rounded to `digits` significant digits.
pub fn render_expression(family: ModelFamily, coefficients: &[f64], digits: usize) -> String {
    let terms: Vec<(f64, TermBody)> = match family {
        ModelFamily::Linear => vec![
            term(coefficients[1], |c| format!("{c}*x")),
            term(coefficients[0], |c| c.to_string()),
        ],
        ModelFamily::Logarithmic => vec![
            term(coefficients[0], |c| c.to_string()),
            term(coefficients[1], |c| format!("{c}*ln(x)")),
        ],
        ModelFamily::Exponential => {
            let rate = format_number(coefficients[1], digits);
            vec![term(coefficients[0], move |c| format!("{c}*e^({rate}*x)"))]
        }
        ModelFamily::Power => {
            let exponent = format_number(coefficients[1], digits);
            vec![term(coefficients[0], move |c| format!("{c}*x^({exponent})"))]
        }
        ModelFamily::Polynomial(_) => coefficients
            .iter()
            .enumerate()
            .rev()
            .map(|(power, &coef)| match power {
                0 => term(coef, |c| c.to_string()),
                1 => term(coef, |c| format!("{c}*x")),
                p => term(coef, move |c| format!("{c}*x^{p}")),
            })
            .collect(),
    };

    join_terms(&terms, digits)
}

type TermBody = Box<dyn Fn(&str) -> String>;

fn term(coef: f64, body: impl Fn(&str) -> String + 'static) -> (f64, TermBody) {
    (coef, Box::new(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    #[test]
    fn polynomial_design_row_is_vandermonde() {
        let mut row = [0.0; 4];
        fill_design_row(ModelFamily::Polynomial(3), 2.0, &mut row);
        assert_eq!(row, [1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn predict_each_family() {
        assert_eq!(predict(ModelFamily::Linear, 2.0, &[1.0, 3.0]), 7.0);
        assert!((predict(ModelFamily::Exponential, 1.0, &[2.0, 0.5]) - 2.0 * 0.5_f64.exp()).abs() < 1e-15);
        assert!((predict(ModelFamily::Logarithmic, 1.0, &[4.0, 9.0]) - 4.0).abs() < 1e-15);
        assert!((predict(ModelFamily::Power, 9.0, &[2.0, 0.5]) - 6.0).abs() < 1e-12);
        assert_eq!(predict(ModelFamily::Polynomial(2), 3.0, &[1.0, -2.0, 0.5]), 1.0 - 6.0 + 4.5);
    }

    #[test]
    fn renders_readable_forms() {
        assert_eq!(render_expression(ModelFamily::Linear, &[-1.5, 2.0], 6), "2*x - 1.5");
        assert_eq!(render_expression(ModelFamily::Logarithmic, &[3.0, -0.25], 6), "3 - 0.25*ln(x)");
        assert_eq!(render_expression(ModelFamily::Exponential, &[1.5, -0.2], 6), "1.5*e^(-0.2*x)");
        assert_eq!(render_expression(ModelFamily::Power, &[2.0, 1.5], 6), "2*x^(1.5)");
        assert_eq!(
            render_expression(ModelFamily::Polynomial(3), &[1.0, 0.0, -3.0, 0.5], 6),
            "0.5*x^3 - 3*x^2 + 0*x + 1"
        );
    }

    #[test]
    fn rendered_expressions_evaluate_like_predict() {
        let cases: [(ModelFamily, &[f64]); 5] = [
            (ModelFamily::Linear, &[-1.25, 0.75]),
            (ModelFamily::Exponential, &[0.8, -0.3]),
            (ModelFamily::Logarithmic, &[2.0, -1.5]),
            (ModelFamily::Power, &[3.0, -0.5]),
            (ModelFamily::Polynomial(4), &[1.0, -2.0, 0.5, -0.1, 0.01]),
        ];
        for (family, coefs) in cases {
            let text = render_expression(family, coefs, 12);
            let expr = parse(&text).unwrap_or_else(|e| panic!("{text}: {e}"));
            for &x in &[0.5, 1.0, 2.5, 7.0] {
                let a = expr.eval(x).unwrap();
                let b = predict(family, x, coefs);
                assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0), "{text} at {x}: {a} vs {b}");
            }
        }
    }
}

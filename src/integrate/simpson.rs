//! Composite Simpson rule with midpoint resampling.
//!
//! With `h = (b - a) / N`, breakpoints `x_n = a + h·n` and midpoints
//! `m_n = (x_{n-1} + x_n) / 2`:
//!
//! ```text
//! ∫ₐᵇ f ≈ h/6 · [ f(a) + f(b) + 4·Σ_{n=1..N} f(m_n) + 2·Σ_{n=1..N-1} f(x_n) ]
//! ```
//!
//! Each of the N subintervals gets its own Simpson panel, so f is sampled at
//! 2N + 1 nodes. Nodes are visited in a fixed order (endpoints, midpoints,
//! interior breakpoints) and the first failing node is the one reported.

use crate::error::IntegrationError;
use crate::expr::{EvalError, Expr, parse};

/// Something that can be integrated.
#[derive(Clone, Copy)]
pub enum Integrand<'a> {
    /// Text in the expression language, parsed before integration.
    Expression(&'a str),
    /// A plain function; non-finite values are domain errors.
    Function(&'a dyn Fn(f64) -> f64),
}

impl std::fmt::Debug for Integrand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Integrand::Expression(text) => f.debug_tuple("Expression").field(text).finish(),
            Integrand::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// A complete integration request.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationRequest<'a> {
    pub integrand: Integrand<'a>,
    pub lower: f64,
    pub upper: f64,
    pub subdivisions: usize,
}

impl IntegrationRequest<'_> {
    pub fn evaluate(&self) -> Result<f64, IntegrationError> {
        integrate(self.integrand, self.lower, self.upper, self.subdivisions)
    }
}

/// Approximate `∫ₐᵇ f(x) dx` with `n` subintervals.
///
/// `a > b` is allowed and yields the negated integral over `[b, a]`.
pub fn integrate(integrand: Integrand<'_>, a: f64, b: f64, n: usize) -> Result<f64, IntegrationError> {
    match integrand {
        Integrand::Expression(text) => integrate_expr(text, a, b, n),
        Integrand::Function(f) => integrate_fn(f, a, b, n),
    }
}

/// Parse `expression` and integrate it.
pub fn integrate_expr(expression: &str, a: f64, b: f64, n: usize) -> Result<f64, IntegrationError> {
    check_request(a, b, n)?;
    let expr = parse(expression)?;
    integrate_parsed(&expr, a, b, n)
}

/// Integrate an already parsed expression.
pub fn integrate_parsed(expr: &Expr, a: f64, b: f64, n: usize) -> Result<f64, IntegrationError> {
    composite_simpson(|x| expr.eval(x), a, b, n)
}

/// Integrate a plain function.
pub fn integrate_fn<F>(f: F, a: f64, b: f64, n: usize) -> Result<f64, IntegrationError>
where
    F: Fn(f64) -> f64,
{
    composite_simpson(
        |x| {
            let v = f(x);
            if v.is_finite() { Ok(v) } else { Err(EvalError::NonFinite) }
        },
        a,
        b,
        n,
    )
}

fn check_request(a: f64, b: f64, n: usize) -> Result<(), IntegrationError> {
    if n < 2 || n % 2 != 0 {
        return Err(IntegrationError::InvalidSubdivisionCount(n));
    }
    if !a.is_finite() {
        return Err(IntegrationError::NonFiniteBound { name: "lower", value: a });
    }
    if !b.is_finite() {
        return Err(IntegrationError::NonFiniteBound { name: "upper", value: b });
    }
    Ok(())
}

fn composite_simpson<F>(f: F, a: f64, b: f64, n: usize) -> Result<f64, IntegrationError>
where
    F: Fn(f64) -> Result<f64, EvalError>,
{
    check_request(a, b, n)?;

    let h = (b - a) / n as f64;
    let node = |i: usize| a + h * i as f64;
    let at = |x: f64| f(x).map_err(|reason| IntegrationError::EvaluationDomain { x, reason });

    let ends = at(a)? + at(b)?;

    let mut mids = 0.0;
    for i in 1..=n {
        mids += at((node(i - 1) + node(i)) / 2.0)?;
    }

    let mut interior = 0.0;
    for i in 1..n {
        interior += at(node(i))?;
    }

    let result = (ends + 4.0 * mids + 2.0 * interior) * h / 6.0;
    if result.is_finite() {
        Ok(result)
    } else {
        Err(IntegrationError::EvaluationDomain {
            x: b,
            reason: EvalError::NonFinite,
        })
    }
}

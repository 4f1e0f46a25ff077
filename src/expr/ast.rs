//! Expression tree and evaluation.

use std::fmt;

use thiserror::Error;

/// Built-in functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Ln,
    Log10,
    Exp,
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tan,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ln" => Some(Func::Ln),
            "log" => Some(Func::Log10),
            "exp" => Some(Func::Exp),
            "sqrt" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Ln => "ln",
            Func::Log10 => "log",
            Func::Exp => "exp",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
        }
    }

    fn apply(self, v: f64) -> Result<f64, EvalError> {
        match self {
            Func::Ln | Func::Log10 if v <= 0.0 => Err(EvalError::LogOfNonPositive { value: v }),
            Func::Ln => Ok(v.ln()),
            Func::Log10 => Ok(v.log10()),
            Func::Sqrt if v < 0.0 => Err(EvalError::SqrtOfNegative { value: v }),
            Func::Sqrt => Ok(v.sqrt()),
            Func::Exp => Ok(v.exp()),
            Func::Abs => Ok(v.abs()),
            Func::Sin => Ok(v.sin()),
            Func::Cos => Ok(v.cos()),
            Func::Tan => Ok(v.tan()),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }
}

/// Parsed expression in the single free variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    /// Euler's number. Kept distinct so `e^u` can evaluate as `exp(u)`.
    E,
    Var,
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

/// Why an expression has no real value at a given point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("logarithm of non-positive value {value}")]
    LogOfNonPositive { value: f64 },
    #[error("square root of negative value {value}")]
    SqrtOfNegative { value: f64 },
    #[error("{base}^{exponent} has no real value")]
    InvalidPower { base: f64, exponent: f64 },
    #[error("result is not finite")]
    NonFinite,
}

impl Expr {
    /// Evaluate at `x`.
    ///
    /// Every intermediate value is checked, so an `Ok` result is always finite.
    pub fn eval(&self, x: f64) -> Result<f64, EvalError> {
        let v = match self {
            Expr::Num(v) => *v,
            Expr::E => std::f64::consts::E,
            Expr::Var => x,
            Expr::Neg(inner) => -inner.eval(x)?,
            Expr::Call(func, arg) => func.apply(arg.eval(x)?)?,
            Expr::Binary(BinOp::Pow, base, exponent) if **base == Expr::E => exponent.eval(x)?.exp(),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x)?;
                let b = rhs.eval(x)?;
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div if b == 0.0 => return Err(EvalError::DivisionByZero),
                    BinOp::Div => a / b,
                    BinOp::Pow => {
                        let v = a.powf(b);
                        if v.is_nan() {
                            return Err(EvalError::InvalidPower { base: a, exponent: b });
                        }
                        if a == 0.0 && b < 0.0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        v
                    }
                }
            }
        };

        if v.is_finite() { Ok(v) } else { Err(EvalError::NonFinite) }
    }
}

/// Fully parenthesized rendering; parses back to an equivalent tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{v}"),
            Expr::E => write!(f, "e"),
            Expr::Var => write!(f, "x"),
            Expr::Neg(inner) => write!(f, "(-{inner})"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expr::Call(func, arg) => write!(f, "{}({arg})", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Box<Expr> {
        Box::new(Expr::Num(v))
    }

    #[test]
    fn evaluates_arithmetic() {
        // (x + 2) * 3
        let e = Expr::Binary(
            BinOp::Mul,
            Box::new(Expr::Binary(BinOp::Add, Box::new(Expr::Var), num(2.0))),
            num(3.0),
        );
        assert_eq!(e.eval(1.0).unwrap(), 9.0);
    }

    #[test]
    fn euler_power_uses_exp() {
        let e = Expr::Binary(BinOp::Pow, Box::new(Expr::E), Box::new(Expr::Var));
        assert_eq!(e.eval(1.7).unwrap(), 1.7_f64.exp());
    }

    #[test]
    fn domain_errors_are_reported() {
        let div = Expr::Binary(BinOp::Div, num(1.0), Box::new(Expr::Var));
        assert_eq!(div.eval(0.0), Err(EvalError::DivisionByZero));

        let ln = Expr::Call(Func::Ln, Box::new(Expr::Var));
        assert_eq!(ln.eval(-1.0), Err(EvalError::LogOfNonPositive { value: -1.0 }));

        let sqrt = Expr::Call(Func::Sqrt, Box::new(Expr::Var));
        assert!(matches!(sqrt.eval(-4.0), Err(EvalError::SqrtOfNegative { .. })));

        let pow = Expr::Binary(BinOp::Pow, Box::new(Expr::Var), num(0.5));
        assert!(matches!(pow.eval(-2.0), Err(EvalError::InvalidPower { .. })));

        let recip = Expr::Binary(BinOp::Pow, Box::new(Expr::Var), num(-1.0));
        assert_eq!(recip.eval(0.0), Err(EvalError::DivisionByZero));

        let huge = Expr::Call(Func::Exp, Box::new(Expr::Var));
        assert_eq!(huge.eval(1000.0), Err(EvalError::NonFinite));
    }
}

use std::fmt;

use log::debug;
use num_traits::{Signed, ToPrimitive, Zero};

use super::parsefmt::{format_float, format_fraction, parse_number};
use super::{Error, Num, Result};

/// Significant digits of every floating point result.
pub const NUMERIC_DIGITS: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum ExponentRule {
    Product,
    Quotient,
    PowerOfPower,
    NegativeExponent,
}

impl ExponentRule {
    pub const ALL: [ExponentRule; 4] = [
        ExponentRule::Product,
        ExponentRule::Quotient,
        ExponentRule::PowerOfPower,
        ExponentRule::NegativeExponent,
    ];

    pub fn name(&self) -> &str {
        match self {
            ExponentRule::Product => "Multiply same base (add exponents)",
            ExponentRule::Quotient => "Divide same base (subtract exponents)",
            ExponentRule::PowerOfPower => "Power of a power (multiply exponents)",
            ExponentRule::NegativeExponent => "Negative exponent (reciprocal)",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "product" | "mul" | "*" => Some(ExponentRule::Product),
            "quotient" | "div" | "/" => Some(ExponentRule::Quotient),
            "power" | "pow" | "^" => Some(ExponentRule::PowerOfPower),
            "negative" | "neg" | "-" => Some(ExponentRule::NegativeExponent),
            _ => None,
        }
    }
}

/// Outcome of evaluating a rule numerically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Evaluation {
    Value(String),
    /// The base is not a number, e.g. `x`.
    SymbolicOnly,
    Failed(Error),
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Value(v) => write!(f, "{v}"),
            Evaluation::SymbolicOnly => write!(f, "(symbolic only)"),
            Evaluation::Failed(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleResult {
    pub symbolic: String,
    pub numeric: Evaluation,
}

/// Rewrites `base` with `rule`, e.g. `2^3 * 2^2 = 2^5`.
///
/// The negative exponent rule reads the first non-empty exponent and needs a
/// negative integer. A numeric base is also evaluated in floating point.
pub fn apply_exponent_rule(rule: ExponentRule, base: &str, e1: &str, e2: &str) -> Result<RuleResult> {
    let base = base.trim();
    if base.is_empty() {
        return Err(Error::MissingInput("Enter a base (number or symbol)."));
    }

    let (symbolic, exponent) = match rule {
        ExponentRule::NegativeExponent => {
            let text = [e1, e2]
                .into_iter()
                .map(str::trim)
                .find(|s| !s.is_empty())
                .ok_or(Error::MissingInput("Enter an exponent (negative integer)."))?;
            let e = parse_exponent(text)?;
            if !e.is_integer() || !e.is_negative() {
                return Err(Error::InvalidExponent(
                    "Exponent must be a negative integer for this rule.".to_owned(),
                ));
            }
            let symbolic = format!(
                "{base}^{} = 1/{base}^{}",
                format_fraction(&e),
                format_fraction(&-&e)
            );
            (symbolic, e)
        }
        _ => {
            let e1 = parse_exponent(e1)?;
            let e2 = parse_exponent(e2)?;
            let (a, b) = (format_fraction(&e1), format_fraction(&e2));
            match rule {
                ExponentRule::Product => {
                    let e = e1 + e2;
                    (format!("{base}^{a} * {base}^{b} = {base}^{}", format_fraction(&e)), e)
                }
                ExponentRule::Quotient => {
                    let e = e1 - e2;
                    (format!("{base}^{a} / {base}^{b} = {base}^{}", format_fraction(&e)), e)
                }
                _ => {
                    let e = e1 * e2;
                    (format!("({base}^{a})^{b} = {base}^{}", format_fraction(&e)), e)
                }
            }
        }
    };

    let numeric = evaluate(base, &exponent);
    debug!("{symbolic} evaluates to {numeric}");
    Ok(RuleResult { symbolic, numeric })
}

fn parse_exponent(text: &str) -> Result<Num> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidExponent("Exponent is empty".to_owned()));
    }
    parse_number(text).map_err(|e| Error::InvalidExponent(e.to_string()))
}

fn out_of_range() -> Error {
    Error::Math("Numerical result out of range.".to_owned())
}

fn evaluate(base: &str, exponent: &Num) -> Evaluation {
    let Ok(base) = parse_number(base) else {
        return Evaluation::SymbolicOnly;
    };
    if base.is_zero() && exponent.is_negative() {
        return Evaluation::Failed(Error::Math(
            "Division by zero in exponent evaluation.".to_owned(),
        ));
    }
    if base.is_negative() && !exponent.is_integer() {
        return Evaluation::Failed(Error::Math(
            "A negative base with a fractional exponent has no real value.".to_owned(),
        ));
    }
    let (Some(b), Some(e)) = (base.to_f64(), exponent.to_f64()) else {
        return Evaluation::Failed(out_of_range());
    };
    let value = b.powf(e);
    if !b.is_finite() || !value.is_finite() {
        return Evaluation::Failed(out_of_range());
    }
    Evaluation::Value(format_float(value, NUMERIC_DIGITS))
}

/// Square root of a non-negative number, printed as an integer when it is one.
pub fn square_root(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(Error::MissingInput("Enter a number to take the square root of."));
    }
    let n = parse_number(text)?;
    if n.is_negative() {
        return Err(Error::Math(
            "Cannot take square root of a negative number.".to_owned(),
        ));
    }
    let value = n.to_f64().filter(|v| v.is_finite()).ok_or_else(out_of_range)?;
    let root = value.sqrt();
    if (root - root.round()).abs() < 1e-12 {
        Ok(format!("{:.0}", root.round()))
    } else {
        Ok(format_float(root, NUMERIC_DIGITS))
    }
}

#[cfg(test)]
fn rule(rule: ExponentRule, base: &str, e1: &str, e2: &str) -> (String, Evaluation) {
    let r = apply_exponent_rule(rule, base, e1, e2).unwrap();
    (r.symbolic, r.numeric)
}

#[test]
fn rules_test() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        rule(ExponentRule::Product, "2", "3", "2"),
        ("2^3 * 2^2 = 2^5".to_owned(), Evaluation::Value("32".to_owned()))
    );
    assert_eq!(
        rule(ExponentRule::Quotient, "x", "5", "2"),
        ("x^5 / x^2 = x^3".to_owned(), Evaluation::SymbolicOnly)
    );
    assert_eq!(
        rule(ExponentRule::PowerOfPower, "2", "1/2", "4"),
        ("(2^1/2)^4 = 2^2".to_owned(), Evaluation::Value("4".to_owned()))
    );
    assert_eq!(
        rule(ExponentRule::Product, "9", "0.25", "25%"),
        ("9^1/4 * 9^1/4 = 9^1/2".to_owned(), Evaluation::Value("3".to_owned()))
    );
    assert_eq!(
        apply_exponent_rule(ExponentRule::Quotient, "10", "1", "3"),
        Ok(RuleResult {
            symbolic: "10^1 / 10^3 = 10^-2".to_owned(),
            numeric: Evaluation::Value("0.01".to_owned()),
        })
    );
}

#[test]
fn negative_rule_test() {
    assert_eq!(
        rule(ExponentRule::NegativeExponent, "2", "-3", ""),
        ("2^-3 = 1/2^3".to_owned(), Evaluation::Value("0.125".to_owned()))
    );
    assert_eq!(
        rule(ExponentRule::NegativeExponent, "a", " ", "-2"),
        ("a^-2 = 1/a^2".to_owned(), Evaluation::SymbolicOnly)
    );
    for e in ["2", "0", "-1/2"] {
        assert_eq!(
            apply_exponent_rule(ExponentRule::NegativeExponent, "2", e, ""),
            Err(Error::InvalidExponent("Exponent must be a negative integer for this rule.".to_owned()))
        );
    }
    assert_eq!(
        apply_exponent_rule(ExponentRule::NegativeExponent, "2", "", ""),
        Err(Error::MissingInput("Enter an exponent (negative integer)."))
    );
}

#[test]
fn rule_input_errors_test() {
    assert_eq!(
        apply_exponent_rule(ExponentRule::Product, " ", "1", "2"),
        Err(Error::MissingInput("Enter a base (number or symbol)."))
    );
    assert_eq!(
        apply_exponent_rule(ExponentRule::Product, "2", "", "2"),
        Err(Error::InvalidExponent("Exponent is empty".to_owned()))
    );
    assert_eq!(
        apply_exponent_rule(ExponentRule::Quotient, "2", "y", "2"),
        Err(Error::InvalidExponent("Invalid number: y".to_owned()))
    );
}

#[test]
fn numeric_failures_test() {
    let (_, numeric) = rule(ExponentRule::NegativeExponent, "0", "-2", "");
    assert_eq!(numeric, Evaluation::Failed(Error::Math("Division by zero in exponent evaluation.".to_owned())));
    let (_, numeric) = rule(ExponentRule::Product, "-8", "1/3", "1");
    assert!(matches!(numeric, Evaluation::Failed(Error::Math(_))));
    let (_, numeric) = rule(ExponentRule::Product, "-2", "1", "2");
    assert_eq!(numeric, Evaluation::Value("-8".to_owned()));
    let (_, numeric) = rule(ExponentRule::PowerOfPower, "10", "400", "2");
    assert_eq!(numeric, Evaluation::Failed(out_of_range()));
}

#[test]
fn rule_names_test() {
    for r in ExponentRule::ALL {
        assert!(!r.name().is_empty());
    }
    assert_eq!(ExponentRule::from_str("pow"), Some(ExponentRule::PowerOfPower));
    assert_eq!(ExponentRule::from_str("root"), None);
}

#[test]
fn square_root_test() {
    assert_eq!(square_root("16"), Ok("4".to_owned()));
    assert_eq!(square_root("6.25"), Ok("2.5".to_owned()));
    assert_eq!(square_root("25%"), Ok("0.5".to_owned()));
    assert_eq!(square_root("2"), Ok("1.41421356237".to_owned()));
    assert_eq!(
        square_root("-4"),
        Err(Error::Math("Cannot take square root of a negative number.".to_owned()))
    );
    assert_eq!(square_root("four"), Err(Error::InvalidNumber("four".to_owned())));
}

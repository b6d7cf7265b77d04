use std::fmt;

use log::debug;
use num_traits::{ToPrimitive, Zero};

use super::parsefmt::{format_float, format_fraction, parse_number};
use super::{Error, Num, Result};

/// How a linear equation in one variable resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    Unique { variable: char, value: Num },
    /// Both sides are the same expression.
    Infinite,
    NoSolution,
    Error(Error),
}

impl SolveOutcome {
    /// `%.12g` rendering of a unique solution.
    pub fn approximation(&self, significant: usize) -> Option<String> {
        match self {
            SolveOutcome::Unique { value, .. } => {
                value.to_f64().map(|f| format_float(f, significant))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Unique { variable, value } => {
                write!(f, "{variable} = {}", format_fraction(value))
            }
            SolveOutcome::Infinite => write!(f, "Infinite solutions (identity)."),
            SolveOutcome::NoSolution => write!(f, "No solution."),
            SolveOutcome::Error(e @ Error::InvalidNumber(_)) => write!(f, "Parse error: {e}"),
            SolveOutcome::Error(e) => write!(f, "{e}"),
        }
    }
}

/// Sum of the variable coefficients and of the constants on one side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Side {
    pub coefficient: Num,
    pub constant: Num,
}

impl Default for Side {
    fn default() -> Self {
        Self {
            coefficient: num!(0, 1),
            constant: num!(0, 1),
        }
    }
}

/// Solves equations like `2x+3=7` or `3/4x - 2 = -1/2x + 5/3` exactly.
pub fn solve_linear_equation(text: &str) -> SolveOutcome {
    match solve(text) {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!("could not solve {text:?}: {e}");
            SolveOutcome::Error(e)
        }
    }
}

fn solve(text: &str) -> Result<SolveOutcome> {
    let eq = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '−' { '-' } else { c })
        .collect::<String>();
    if eq.is_empty() {
        return Err(Error::MissingInput("Enter an equation to solve (e.g. 2x+3=7)."));
    }

    let (left, right) = match eq.split('=').collect::<Vec<&str>>().as_slice() {
        [left, right] => (*left, *right),
        [_] => return Err(Error::EquationSyntax("Equation must contain '='.".to_owned())),
        _ => {
            return Err(Error::EquationSyntax(
                "Equation must contain exactly one '='.".to_owned(),
            ))
        }
    };

    let variable = find_variable(&eq)?;
    let left = parse_side(left, variable)?;
    let right = parse_side(right, variable)?;

    // (a_left - a_right) * var = (b_right - b_left)
    let a = left.coefficient - right.coefficient;
    let b = right.constant - left.constant;
    debug!("normal form: ({a}){variable} = {b}");

    Ok(if a.is_zero() {
        if b.is_zero() {
            SolveOutcome::Infinite
        } else {
            SolveOutcome::NoSolution
        }
    } else {
        SolveOutcome::Unique {
            variable,
            value: b / a,
        }
    })
}

/// The first ASCII letter in the text; a second distinct letter is rejected.
/// The `e` of a constant like `1e3` or `2.5E-1` is not a letter here.
fn find_variable(text: &str) -> Result<char> {
    let bytes = text.as_bytes();
    let mut letters = (0..bytes.len())
        .filter(|&i| bytes[i].is_ascii_alphabetic() && !is_exponent_marker(bytes, i))
        .map(|i| bytes[i] as char);
    let variable = letters
        .next()
        .ok_or_else(|| Error::EquationSyntax("No variable found in equation.".to_owned()))?;
    if let Some(other) = letters.find(|&c| c != variable) {
        return Err(Error::EquationSyntax(format!(
            "More than one variable found: {variable} and {other}."
        )));
    }
    Ok(variable)
}

// `e`/`E` after a digit or point and before an optionally signed digit
fn is_exponent_marker(bytes: &[u8], i: usize) -> bool {
    if !matches!(bytes[i], b'e' | b'E') || i == 0 {
        return false;
    }
    if !(bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.') {
        return false;
    }
    let mut j = i + 1;
    if matches!(bytes.get(j), Some(b'+' | b'-')) {
        j += 1;
    }
    matches!(bytes.get(j), Some(b) if b.is_ascii_digit())
}

/// Signed terms of one side, e.g. `-3x+4-x/2` gives `-3x`, `+4`, `-x/2`.
/// A sign with nothing after it before the next sign is dropped, and the sign
/// of an exponent (`2.5E-1`) stays inside its term.
fn terms(side: &str) -> Vec<&str> {
    let bytes = side.as_bytes();
    let is_split = |i: usize| {
        matches!(bytes[i], b'+' | b'-') && !(i > 0 && is_exponent_marker(bytes, i - 1))
    };
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        if is_split(i) {
            i += 1;
        }
        let run = i;
        while i < bytes.len() && !is_split(i) {
            i += 1;
        }
        if i > run {
            out.push(&side[start..i]);
        }
    }
    out
}

fn parse_side(side: &str, variable: char) -> Result<Side> {
    let mut sums = Side::default();
    for term in terms(side) {
        let bytes = term.as_bytes();
        let marks = (0..bytes.len())
            .filter(|&i| bytes[i] as char == variable && !is_exponent_marker(bytes, i))
            .collect::<Vec<usize>>();
        if !marks.is_empty() {
            let rest = term
                .char_indices()
                .filter(|(i, _)| !marks.contains(i))
                .map(|(_, c)| c)
                .collect::<String>();
            sums.coefficient += match rest.as_str() {
                "" | "+" => num!(1, 1),
                "-" => num!(-1, 1),
                _ => parse_coefficient(&rest)?,
            };
        } else {
            sums.constant += parse_number(term)?;
        }
    }
    Ok(sums)
}

// `x/2` leaves `/2` behind, which reads as 1/2
fn parse_coefficient(rest: &str) -> Result<Num> {
    let unsigned = rest.trim_start_matches(['+', '-']);
    if unsigned.starts_with('/') {
        let sign = &rest[..rest.len() - unsigned.len()];
        return parse_number(&format!("{sign}1{unsigned}"))
            .map_err(|_| Error::InvalidNumber(rest.to_owned()));
    }
    parse_number(rest)
}

#[cfg(test)]
fn unique(variable: char, value: Num) -> SolveOutcome {
    SolveOutcome::Unique { variable, value }
}

#[test]
fn solve_test() {
    assert_eq!(solve_linear_equation("2x+3=7"), unique('x', num!(2, 1)));
    assert_eq!(solve_linear_equation("-x = 4"), unique('x', num!(-4, 1)));
    assert_eq!(solve_linear_equation("1.5y + 0.5 = 2"), unique('y', num!(1, 1)));
    assert_eq!(solve_linear_equation("3/4x - 2 = -1/2 x + 5/3"), unique('x', num!(44, 15)));
    assert_eq!(solve_linear_equation("x/2 = 3"), unique('x', num!(6, 1)));
    assert_eq!(solve_linear_equation("2x − 4 = 0"), unique('x', num!(2, 1)));
    assert_eq!(solve_linear_equation("2x ="), unique('x', num!(0, 1)));
    assert_eq!(solve_linear_equation("50%n = 3"), unique('n', num!(6, 1)));
}

#[test]
fn solve_exponent_constants_test() {
    assert_eq!(solve_linear_equation("x = 1e3"), unique('x', num!(1000, 1)));
    assert_eq!(solve_linear_equation("2x = 2.5E-1"), unique('x', num!(1, 8)));
    assert_eq!(solve_linear_equation("1e2 + 4y = 1E+2 - 4y"), unique('y', num!(0, 1)));
    assert_eq!(solve_linear_equation("2e = 1e1"), unique('e', num!(5, 1)));
}

#[test]
fn solve_degenerate_test() {
    assert_eq!(solve_linear_equation("x=x+1"), SolveOutcome::NoSolution);
    assert_eq!(solve_linear_equation("x+1=x+1"), SolveOutcome::Infinite);
    assert_eq!(solve_linear_equation("2x - x = x"), SolveOutcome::Infinite);
}

#[test]
fn solve_errors_test() {
    assert_eq!(
        solve_linear_equation("abc"),
        SolveOutcome::Error(Error::EquationSyntax("Equation must contain '='.".to_owned()))
    );
    assert_eq!(
        solve_linear_equation("1=2=3x"),
        SolveOutcome::Error(Error::EquationSyntax("Equation must contain exactly one '='.".to_owned()))
    );
    assert_eq!(
        solve_linear_equation("1 = 2"),
        SolveOutcome::Error(Error::EquationSyntax("No variable found in equation.".to_owned()))
    );
    assert_eq!(
        solve_linear_equation("2x+y=5"),
        SolveOutcome::Error(Error::EquationSyntax("More than one variable found: x and y.".to_owned()))
    );
    assert_eq!(
        solve_linear_equation("x + 1/0 = 2"),
        SolveOutcome::Error(Error::InvalidNumber("+1/0".to_owned()))
    );
    assert_eq!(
        solve_linear_equation("   "),
        SolveOutcome::Error(Error::MissingInput("Enter an equation to solve (e.g. 2x+3=7)."))
    );
}

#[test]
fn terms_test() {
    assert_eq!(terms("-3x+4-x/2"), vec!["-3x", "+4", "-x/2"]);
    assert_eq!(terms("x--1"), vec!["x", "-1"]);
    assert_eq!(terms("2x+"), vec!["2x"]);
    assert_eq!(terms(""), Vec::<&str>::new());
    assert_eq!(terms("2.5E-1-x+1e+2"), vec!["2.5E-1", "-x", "+1e+2"]);
}

#[test]
fn display_test() {
    use pretty_assertions::assert_eq;
    let outcome = solve_linear_equation("3x = 1");
    assert_eq!(outcome.to_string(), "x = 1/3");
    assert_eq!(outcome.approximation(12), Some("0.333333333333".to_owned()));
    assert_eq!(SolveOutcome::Infinite.to_string(), "Infinite solutions (identity).");
    assert_eq!(SolveOutcome::NoSolution.approximation(12), None);
    assert_eq!(
        solve_linear_equation("x = 1/0").to_string(),
        "Parse error: Invalid number: 1/0"
    );
}

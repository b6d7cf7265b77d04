use crate::config::Config;
use crate::math::collection::{compute_stats, sort_numbers, split_list};
use crate::math::equation::{solve_linear_equation, SolveOutcome};
use crate::math::exponent::{apply_exponent_rule, square_root, ExponentRule, NUMERIC_DIGITS};
use crate::math::parsefmt::{convert, format_decimal_digits};
use crate::math::{Error, Result};
use arboard::Clipboard;
use log::{debug, info};
use std::collections::VecDeque;

const HELP: &str = "\
sort <a, b, ...>        least to greatest (s)
rsort <a, b, ...>       greatest to least (rs, desc)
stats <a, b, ...>       mean, median and range (st)
convert <n>             fraction, decimal and percent (c)
solve <equation>        linear equation in one variable (eq)
sqrt <n>                square root (r)
product <base> <e1> <e2>, quotient ..., power ..., negative <base> <e>
history                 past commands (h)
copy                    copy the last result
quit                    (q, exit)
numbers: 12, -0.5, 3/4, -3 6/7, 50%";

// contains state that is shared across frontends
pub struct State {
    pub config: Config,
    pub last_result: Option<String>,
    /// Set when the last executed command produced `last_result`.
    pub new_result: bool,
    pub history: VecDeque<(String, String)>,
    pub exiting: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl State {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            last_result: None,
            new_result: false,
            history: VecDeque::new(),
            exiting: false,
        }
    }

    pub fn sort(&self, text: &str, descending: bool) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::MissingInput("Please enter some numbers separated by commas."));
        }
        Ok(sort_numbers(&split_list(text), descending)?.join(", "))
    }

    pub fn stats(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::MissingInput("Enter numbers separated by commas."));
        }
        let stats = compute_stats(&split_list(text))?;
        let digits = self.config.decimal_digits;
        Ok(format!(
            "Mean: {}\nMedian: {}\nRange: {}",
            format_decimal_digits(&stats.mean, digits),
            format_decimal_digits(&stats.median, digits),
            format_decimal_digits(&stats.range, digits),
        ))
    }

    pub fn convert(&self, text: &str) -> Result<String> {
        let c = convert(text, self.config.decimal_digits)?;
        Ok(format!(
            "Fraction: {}\nDecimal: {}\nPercent: {}",
            c.fraction, c.decimal, c.percent
        ))
    }

    pub fn solve(&self, text: &str) -> Result<String> {
        match solve_linear_equation(text) {
            SolveOutcome::Error(e) => Err(e),
            outcome => Ok(match outcome.approximation(NUMERIC_DIGITS) {
                Some(approx) => format!("{outcome}\n≈ {approx}"),
                None => outcome.to_string(),
            }),
        }
    }

    pub fn exponent(&self, rule: ExponentRule, base: &str, e1: &str, e2: &str) -> Result<String> {
        let result = apply_exponent_rule(rule, base, e1, e2)?;
        Ok(format!("{}\nNumeric: {}", result.symbolic, result.numeric))
    }

    pub fn sqrt(&self, text: &str) -> Result<String> {
        square_root(text)
    }

    fn history_text(&self) -> String {
        self.history
            .iter()
            .map(|(line, output)| format!("{line}\n  {}", output.replace('\n', "\n  ")))
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn push_history(&mut self, line: &str, output: &str) {
        if self.config.history_len == 0 {
            return;
        }
        while self.history.len() >= self.config.history_len {
            self.history.pop_front();
        }
        self.history.push_back((line.to_owned(), output.to_owned()));
    }

    pub fn copy_last(&self) -> std::result::Result<(), arboard::Error> {
        if let Some(result) = &self.last_result {
            Clipboard::new()?.set_text(result.clone())?;
            debug!("copied {} bytes to the clipboard", result.len());
        }
        Ok(())
    }

    /// Runs one line like `sort 3, 1/2, 50%` and returns what to print.
    pub fn execute_command(&mut self, line: &str) -> String {
        self.new_result = false;
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        let result = match command {
            "" => return String::new(),
            "q" | "quit" | "exit" => {
                self.exiting = true;
                return String::new();
            }
            "?" | "help" => return HELP.to_owned(),
            "h" | "history" => return self.history_text(),
            "copy" => {
                return match self.copy_last() {
                    Ok(()) => String::new(),
                    Err(e) => format!("Clipboard Error: {e}"),
                }
            }
            "s" | "sort" => self.sort(rest, false),
            "rs" | "rsort" | "desc" => self.sort(rest, true),
            "st" | "stats" => self.stats(rest),
            "c" | "convert" => self.convert(rest),
            "eq" | "solve" => self.solve(rest),
            "r" | "sqrt" => self.sqrt(rest),
            other => match ExponentRule::from_str(other) {
                Some(rule) => {
                    let args = split_args(rest);
                    let arg = |i: usize| args.get(i).copied().unwrap_or("");
                    self.exponent(rule, arg(0), arg(1), arg(2))
                }
                None => return format!("Unknown command: {other} (try help)"),
            },
        };

        match result {
            Ok(output) => {
                info!("{line} -> {}", output.replace('\n', "; "));
                self.push_history(line, &output);
                self.last_result = Some(output.clone());
                self.new_result = true;
                output
            }
            Err(e) => format!("{}: {e}", e.kind()),
        }
    }
}

// `2 3 2` or `2 1/2, 3, 2` when a mixed number is involved
fn split_args(rest: &str) -> Vec<&str> {
    if rest.contains(',') {
        rest.split(',').map(str::trim).collect()
    } else {
        rest.split_whitespace().collect()
    }
}

#[test]
fn execute_test() {
    use pretty_assertions::assert_eq;
    let mut state = State::default();
    assert_eq!(state.execute_command("sort 3, 1/2, 50%, -1 1/4"), "-1 1/4, 1/2, 50%, 3");
    assert_eq!(state.execute_command("desc 3, 1/2, 50%, -1 1/4"), "3, 1/2, 50%, -1 1/4");
    assert_eq!(state.execute_command("stats 1, 2, 3, 4"), "Mean: 2.5\nMedian: 2.5\nRange: 3");
    assert_eq!(state.execute_command("convert -3 6/7"), "Fraction: -27/7\nDecimal: -3.857142857142857142857142857\nPercent: -385.7142857142857142857142857%");
    assert_eq!(state.execute_command("solve 3x = 1"), "x = 1/3\n≈ 0.333333333333");
    assert_eq!(state.execute_command("eq x = x + 1"), "No solution.");
    assert_eq!(state.execute_command("product 2 3 2"), "2^3 * 2^2 = 2^5\nNumeric: 32");
    assert_eq!(state.execute_command("neg x -2"), "x^-2 = 1/x^2\nNumeric: (symbolic only)");
    assert_eq!(state.execute_command("power 2 1/2, 1/2 , 4"), "(2 1/2^1/2)^4 = 2 1/2^2\nNumeric: 6.25");
    assert_eq!(state.execute_command("sqrt 2"), "1.41421356237");
    assert_eq!(state.last_result.as_deref(), Some("1.41421356237"));
    assert_eq!(state.history.len(), 10);
}

#[test]
fn execute_errors_test() {
    let mut state = State::default();
    assert_eq!(state.execute_command("sort 1, x"), "Input Error: Invalid number: x");
    assert_eq!(state.execute_command("stats"), "Input Error: Enter numbers separated by commas.");
    assert_eq!(state.execute_command("stats ,"), "Input Error: No valid numbers to calculate stats.");
    assert_eq!(state.execute_command("solve abc"), "Equation Error: Equation must contain '='.");
    assert_eq!(state.execute_command("neg 2 3"), "Input Error: Exponent must be a negative integer for this rule.");
    assert_eq!(state.execute_command("sqrt -1"), "Math Error: Cannot take square root of a negative number.");
    assert_eq!(state.execute_command("frobnicate"), "Unknown command: frobnicate (try help)");
    assert!(state.history.is_empty());
    assert_eq!(state.last_result, None);
}

#[test]
fn history_test() {
    let mut state = State::new(Config { history_len: 2, ..Config::default() });
    state.execute_command("sqrt 4");
    state.execute_command("sqrt 9");
    state.execute_command("sqrt 16");
    assert_eq!(state.execute_command("history"), "sqrt 9\n  3\nsqrt 16\n  4");
    assert!(!state.exiting);
    assert_eq!(state.execute_command("  quit "), "");
    assert!(state.exiting);
}

#[test]
fn new_result_test() {
    let mut state = State::default();
    state.execute_command("sqrt 9");
    assert!(state.new_result);
    for line in ["sqrt -9", "help", "history", "bogus", ""] {
        state.execute_command(line);
        assert!(!state.new_result, "{line:?}");
    }
    assert_eq!(state.last_result.as_deref(), Some("3"));
}

use std::str::FromStr;

use log::trace;
use num_traits::{One, Signed, Zero};

use super::{ratio, Error, Num, NumComponent, Result};

/// Significant digits used when a value has no terminating decimal form.
pub const DECIMAL_DIGITS: u32 = 28;

/// Parses a decimal, fraction, mixed number or percentage into an exact value.
///
/// Forms are tried in order: `12.5%`, `-3 6/7`, `-27/7`, `0.25`. Text that is
/// not a plain fixed-point literal (`1e-3`, `inf`) goes through `f64`, which is
/// the only path that can introduce representation error.
pub fn parse_number(text: &str) -> Result<Num> {
    let s = text.trim();
    let parsed = if s.is_empty() {
        None
    } else if let Some(rest) = s.strip_suffix('%') {
        parse_plain(rest.trim()).map(|n| n / num!(100, 1))
    } else if s.contains(' ') && s.contains('/') && s.split_whitespace().count() == 2 {
        parse_mixed(s)
    } else if s.contains('/') {
        parse_fraction(s)
    } else {
        parse_plain(s)
    };
    parsed.ok_or_else(|| Error::InvalidNumber(text.to_owned()))
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

fn parse_digits(s: &str) -> Option<NumComponent> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NumComponent::from_str(s).ok()
}

fn pow10(n: usize) -> NumComponent {
    NumComponent::from(10).pow(n as u32)
}

fn parse_mixed(s: &str) -> Option<Num> {
    let mut parts = s.split_whitespace();
    let (negative, whole) = split_sign(parts.next()?);
    let whole = parse_digits(whole)?;
    let (numer, denom) = parts.next()?.split_once('/')?;
    let numer = parse_digits(numer)?;
    let denom = parse_digits(denom)?;
    if denom.is_zero() {
        trace!("mixed number {s:?} has a zero denominator");
        return None;
    }
    let magnitude = whole * &denom + numer;
    ratio(if negative { -magnitude } else { magnitude }, denom)
}

fn parse_fraction(s: &str) -> Option<Num> {
    let (numer, denom) = s.split_once('/')?;
    let (negative, numer) = split_sign(numer);
    let numer = parse_digits(numer)?;
    let denom = parse_digits(denom)?;
    ratio(if negative { -numer } else { numer }, denom)
}

fn parse_plain(s: &str) -> Option<Num> {
    if let Some(n) = parse_decimal(s) {
        return Some(n);
    }
    let float = f64::from_str(s).ok()?;
    trace!("{s:?} is not a fixed-point literal, converting through f64");
    Num::from_float(float)
}

fn parse_decimal(s: &str) -> Option<Num> {
    let (negative, unsigned) = split_sign(s);
    let parts = unsigned.split('.').collect::<Vec<&str>>();
    let (int, fract) = match parts.as_slice() {
        [int] => (*int, ""),
        [int, fract] => (*int, *fract),
        _ => return None,
    };
    if int.is_empty() && fract.is_empty() {
        return None;
    }
    let int = if int.is_empty() { NumComponent::zero() } else { parse_digits(int)? };
    let mut n = Num::from_integer(int);
    if !fract.is_empty() {
        n += Num::new(parse_digits(fract)?, pow10(fract.len()));
    }
    Some(if negative { -n } else { n })
}

pub fn format_decimal(n: &Num) -> String {
    format_decimal_digits(n, DECIMAL_DIGITS)
}

pub fn format_percent(n: &Num) -> String {
    format_percent_digits(n, DECIMAL_DIGITS)
}

pub fn format_percent_digits(n: &Num, digits: u32) -> String {
    format_decimal_digits(&(n * num!(100, 1)), digits) + "%"
}

/// Renders `n` in fixed-point notation.
///
/// Terminating values within `digits` significant digits come out exactly;
/// anything longer is rounded half-to-even at `digits` significant digits.
/// Integer digits are always kept. Trailing zeros and a bare `.` are trimmed.
pub fn format_decimal_digits(n: &Num, digits: u32) -> String {
    let digits = digits.max(1) as usize;
    let numer = n.numer().abs();
    let denom = n.denom();
    let int_part = &numer / denom;

    let places = if int_part.is_zero() {
        // zeros right after the point are not significant
        let mut zeros = 0;
        let mut shifted = &numer * 10;
        while !numer.is_zero() && &shifted < denom {
            shifted *= 10;
            zeros += 1;
        }
        zeros + digits
    } else {
        digits.saturating_sub(int_part.to_string().len())
    };

    let scaled = round_half_even(&numer * pow10(places), denom);
    let out = place_point(scaled, places);
    if n.is_negative() && out != "0" {
        format!("-{out}")
    } else {
        out
    }
}

fn round_half_even(numer: NumComponent, denom: &NumComponent) -> NumComponent {
    let quotient = &numer / denom;
    let twice_rem = (numer % denom) * 2;
    let odd = (&quotient % NumComponent::from(2)).is_one();
    if &twice_rem > denom || (&twice_rem == denom && odd) {
        quotient + 1
    } else {
        quotient
    }
}

fn place_point(scaled: NumComponent, places: usize) -> String {
    let mut digits = scaled.to_string();
    if places == 0 {
        return digits;
    }
    if digits.len() <= places {
        digits = "0".repeat(places + 1 - digits.len()) + &digits;
    }
    let (int, fract) = digits.split_at(digits.len() - places);
    let fract = fract.trim_end_matches('0');
    if fract.is_empty() {
        int.to_owned()
    } else {
        format!("{int}.{fract}")
    }
}

/// `n` or `n/d`.
pub fn format_fraction(n: &Num) -> String {
    if n.denom().is_one() {
        format!("{}", n.numer())
    } else {
        format!("{}/{}", n.numer(), n.denom())
    }
}

/// C-style `%.<significant>g` rendering of a float.
pub fn format_float(x: f64, significant: usize) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x > 0. { "inf" } else { "-inf" }.to_owned();
    }
    if x == 0. {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }
    let precision = significant.max(1);
    let sci = format!("{:.*e}", precision - 1, x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp = exp.parse::<i32>().unwrap_or(0);

    if exp < -4 || exp >= precision as i32 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, x)).to_owned()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// One value shown as a fraction, a decimal and a percentage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub fraction: String,
    pub decimal: String,
    pub percent: String,
}

pub fn convert(text: &str, digits: u32) -> Result<Conversion> {
    if text.trim().is_empty() {
        return Err(Error::MissingInput("Please enter a number to convert."));
    }
    let n = parse_number(text)?;
    Ok(Conversion {
        fraction: format_fraction(&n),
        decimal: format_decimal_digits(&n, digits),
        percent: format_percent_digits(&n, digits),
    })
}

#[test]
fn parse_test() {
    assert_eq!(parse_number("3.14159"), Ok(num!(314159, 100000)));
    assert_eq!(parse_number("0.05"), Ok(num!(1, 20)));
    assert_eq!(parse_number("-0.5"), Ok(num!(-1, 2)));
    assert_eq!(parse_number(" .5 "), Ok(num!(1, 2)));
    assert_eq!(parse_number("5."), Ok(num!(5, 1)));
    assert_eq!(parse_number("+12"), Ok(num!(12, 1)));
    assert_eq!(parse_number("6/8"), Ok(num!(3, 4)));
    assert_eq!(parse_number("-6/8"), Ok(num!(-3, 4)));
}

#[test]
fn parse_forms_agree_test() {
    assert_eq!(parse_number("-3 6/7"), parse_number("-27/7"));
    assert_eq!(parse_number("2 1/2"), Ok(num!(5, 2)));
    assert_eq!(parse_number("50%"), parse_number("0.5"));
    assert_eq!(parse_number("12.5 %"), Ok(num!(1, 8)));
}

#[test]
fn invalid_keeps_text_test() {
    assert_eq!(parse_number("  7/0 "), Err(Error::InvalidNumber("  7/0 ".to_owned())));
}

#[test]
fn parse_float_fallback_test() {
    assert_eq!(parse_number("1e3"), Ok(num!(1000, 1)));
    assert_eq!(parse_number("2.5E-1"), Ok(num!(1, 4)));
    assert!(parse_number("inf").is_err());
    assert!(parse_number("NaN").is_err());
}

#[test]
fn parse_invalid_test() {
    for text in ["", "   ", "abc", "1/0", "2 3/0", "1.2.3", "1/2/3", "1 2 3/4", "3/-4", "-", "1/2%", "."] {
        assert_eq!(
            parse_number(text),
            Err(Error::InvalidNumber(text.to_owned())),
            "{text:?}"
        );
    }
}

#[test]
fn fmt_test() {
    use pretty_assertions::assert_eq;
    assert_eq!(format_decimal(&parse_number("2.50").unwrap()), "2.5");
    assert_eq!(format_decimal(&parse_number("-4.000").unwrap()), "-4");
    assert_eq!(format_decimal(&num!(0, 1)), "0");
    assert_eq!(format_decimal(&num!(1, 8)), "0.125");
    assert_eq!(format_decimal(&num!(1, 3)), "0.3333333333333333333333333333");
    assert_eq!(format_decimal(&num!(2, 3)), "0.6666666666666666666666666667");
    assert_eq!(format_decimal(&num!(-27, 7)), "-3.857142857142857142857142857");
    assert_eq!(format_decimal(&num!(1, 700000)), "0.000001428571428571428571428571429");
    assert_eq!(
        format_decimal(&parse_number("1000000000000000000000000000001").unwrap()),
        "1000000000000000000000000000001"
    );
}

#[test]
fn fmt_percent_test() {
    assert_eq!(format_percent(&num!(1, 2)), "50%");
    assert_eq!(format_percent(&num!(1, 3)), "33.33333333333333333333333333%");
    assert_eq!(format_percent(&num!(-3, 8)), "-37.5%");
}

#[test]
fn fmt_is_pure_test() {
    let n = num!(22, 7);
    assert_eq!(format_decimal(&n), format_decimal(&n));
    assert_eq!(format_percent(&n), format_percent(&n));
}

#[test]
fn fmt_float_test() {
    assert_eq!(format_float(32., 12), "32");
    assert_eq!(format_float(0.125, 12), "0.125");
    assert_eq!(format_float(2f64.sqrt(), 12), "1.41421356237");
    assert_eq!(format_float(1e20, 12), "1e+20");
    assert_eq!(format_float(0.0001234, 12), "0.0001234");
    assert_eq!(format_float(0.00001234, 12), "1.234e-05");
    assert_eq!(format_float(2f64.powi(100), 12), "1.26765060023e+30");
}

#[test]
fn convert_test() {
    assert_eq!(
        convert("1 1/4", DECIMAL_DIGITS),
        Ok(Conversion {
            fraction: "5/4".to_owned(),
            decimal: "1.25".to_owned(),
            percent: "125%".to_owned(),
        })
    );
    assert_eq!(convert("1/3", 4).map(|c| c.percent), Ok("33.33%".to_owned()));
    assert_eq!(convert("  ", DECIMAL_DIGITS), Err(Error::MissingInput("Please enter a number to convert.")));
}

use log::debug;

use super::parsefmt::parse_number;
use super::{Error, Num, Result};

/// A parsed value paired with the text it was parsed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub value: Num,
    pub text: String,
}

/// Splits a comma separated batch like `"3, 1/2, 50%"`.
pub fn split_list(text: &str) -> Vec<&str> {
    text.split(',').collect()
}

/// Parses every non-blank token, keeping its trimmed original text.
pub fn parse_entries<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Entry>> {
    entries
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            Ok(Entry {
                value: parse_number(s)?,
                text: s.to_owned(),
            })
        })
        .collect()
}

/// Orders the entries by value and hands back their original text.
///
/// Equal values keep their input order in both directions.
pub fn sort_numbers<S: AsRef<str>>(entries: &[S], descending: bool) -> Result<Vec<String>> {
    let mut parsed = parse_entries(entries)?;
    if descending {
        parsed.sort_by(|a, b| b.value.cmp(&a.value));
    } else {
        parsed.sort_by(|a, b| a.value.cmp(&b.value));
    }
    debug!("sorted {} entries (descending: {descending})", parsed.len());
    Ok(parsed.into_iter().map(|e| e.text).collect())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    pub mean: Num,
    pub median: Num,
    pub range: Num,
}

pub fn compute_stats<S: AsRef<str>>(entries: &[S]) -> Result<Stats> {
    let mut values = parse_entries(entries)?
        .into_iter()
        .map(|e| e.value)
        .collect::<Vec<Num>>();
    if values.is_empty() {
        return Err(Error::NoValidNumbers);
    }
    values.sort();

    let count = values.len();
    let sum = values.iter().fold(num!(0, 1), |acc, n| acc + n);
    let mean = sum / num!(count, 1);

    let mid = count / 2;
    let median = if count % 2 == 1 {
        values[mid].clone()
    } else {
        (&values[mid - 1] + &values[mid]) / num!(2, 1)
    };

    let range = &values[count - 1] - &values[0];

    Ok(Stats { mean, median, range })
}

#[test]
fn sort_test() {
    assert_eq!(
        sort_numbers(&split_list("3, 1/2, 50%, -1 1/4, 0.75"), false),
        Ok(vec!["-1 1/4", "1/2", "50%", "0.75", "3"].into_iter().map(String::from).collect())
    );
    assert_eq!(
        sort_numbers(&split_list("3, 1/2, -1 1/4, 0.75"), true),
        Ok(vec!["3", "0.75", "1/2", "-1 1/4"].into_iter().map(String::from).collect())
    );
}

#[test]
fn sort_is_stable_test() {
    assert_eq!(sort_numbers(&["2", "1", "2"], false), Ok(vec!["1".to_owned(), "2".to_owned(), "2".to_owned()]));
    // equal values keep input order, descending too
    assert_eq!(
        sort_numbers(&["0.5", "1", "1/2", "50%"], false),
        Ok(vec!["0.5", "1/2", "50%", "1"].into_iter().map(String::from).collect())
    );
    assert_eq!(
        sort_numbers(&["0.5", "1", "1/2", "50%"], true),
        Ok(vec!["1", "0.5", "1/2", "50%"].into_iter().map(String::from).collect())
    );
}

#[test]
fn sort_skips_blanks_test() {
    assert_eq!(sort_numbers(&split_list("2,, ,1,"), false), Ok(vec!["1".to_owned(), "2".to_owned()]));
    assert_eq!(sort_numbers(&split_list(" , "), false), Ok(vec![]));
    assert_eq!(sort_numbers(&["1", "x"], false), Err(Error::InvalidNumber("x".to_owned())));
}

#[test]
fn stats_test() {
    assert_eq!(
        compute_stats(&["1", "2", "3", "4"]),
        Ok(Stats { mean: num!(5, 2), median: num!(5, 2), range: num!(3, 1) })
    );
    assert_eq!(
        compute_stats(&split_list("1/3, 7, 1/6")),
        Ok(Stats { mean: num!(5, 2), median: num!(1, 3), range: num!(41, 6) })
    );
    assert_eq!(
        compute_stats(&["0.1", "0.2"]),
        Ok(Stats { mean: num!(3, 20), median: num!(3, 20), range: num!(1, 10) })
    );
}

#[test]
fn stats_errors_test() {
    assert_eq!(compute_stats(&split_list(" , ,")), Err(Error::NoValidNumbers));
    assert_eq!(compute_stats::<&str>(&[]), Err(Error::NoValidNumbers));
    assert_eq!(compute_stats(&["1", "1/0"]), Err(Error::InvalidNumber("1/0".to_owned())));
}

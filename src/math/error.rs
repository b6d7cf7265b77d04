use thiserror::Error;

/// Everything the exact core can report back to a frontend.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Unparseable numeric text, or a zero denominator.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    /// A batch operation ended up with nothing to work on.
    #[error("No valid numbers to calculate stats.")]
    NoValidNumbers,
    #[error("{0}")]
    EquationSyntax(String),
    #[error("{0}")]
    InvalidExponent(String),
    /// Division by zero or a domain violation during float evaluation.
    #[error("{0}")]
    Math(String),
    #[error("{0}")]
    MissingInput(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Short heading a frontend can show above the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Math(_) => "Math Error",
            Error::EquationSyntax(_) => "Equation Error",
            _ => "Input Error",
        }
    }
}

#[test]
fn message_test() {
    assert_eq!(Error::InvalidNumber("1/0".to_owned()).to_string(), "Invalid number: 1/0");
    assert_eq!(Error::NoValidNumbers.to_string(), "No valid numbers to calculate stats.");
    assert_eq!(Error::Math("boom".to_owned()).kind(), "Math Error");
}

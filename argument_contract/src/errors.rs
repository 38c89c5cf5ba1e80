use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    MissingArgument { name: String },
    InvalidDomain { name: String, predicate: String, index: usize, value: f64 },
    InvalidPredicate { predicate: String, reason: String },
    WrongKind { name: String, expected: &'static str, found: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingArgument { name } => {
                write!(f, "missing required argument `{}`", name)
            }
            Error::InvalidDomain { name, predicate, index, value } => {
                write!(f, "argument `{}` fails `{}` at index {}: value = {}", name, predicate, index, value)
            }
            Error::InvalidPredicate { predicate, reason } => {
                write!(f, "cannot parse predicate `{}`: {}", predicate, reason)
            }
            Error::WrongKind { name, expected, found } => {
                write!(f, "argument `{}` should be a {} but is a {}", name, expected, found)
            }
        }
    }
}

impl std::error::Error for Error {}

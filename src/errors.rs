use std::fmt;

// Define the possible **external** failures of the SAPM evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    MissingCoefficient { name: &'static str },
    ShapeMismatch { argument: &'static str, expected: usize, found: usize },
    Argument(argument_contract::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingCoefficient { name } => {
                write!(f, "module coefficient `{}` is missing", name)
            }
            Error::ShapeMismatch { argument, expected, found } => {
                write!(f, "`{}` has length {} but `Eb` has length {}", argument, found, expected)
            }
            Error::Argument(error) => {
                write!(f, "{}", error)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Argument(error) => Some(error),
            _ => None,
        }
    }
}

impl From<argument_contract::Error> for Error {
    fn from(error: argument_contract::Error) -> Self {
        Error::Argument(error)
    }
}

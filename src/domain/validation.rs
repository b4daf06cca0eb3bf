use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    NonNumericSender { input: String },
    InvalidPhoneNumber { input: String },
    InvalidCountryCode { input: String },
    InvalidUrl { input: String },
    TooManyMessageIds { max: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::NonNumericSender { input } => {
                write!(f, "{input} requires to be a numeric value")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidCountryCode { input } => write!(f, "invalid country code: {input}"),
            Self::InvalidUrl { input } => write!(f, "invalid url: {input}"),
            Self::TooManyMessageIds { max, actual } => {
                write!(f, "too many message ids: {actual} (max {max})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

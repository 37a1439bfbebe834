use std::fmt;

/// Errors raised when validating extracted grant data
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Payload was not a JSON object
    NotAnObject,
    MissingField(&'static str),
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::NotAnObject => write!(f, "extracted data is not a JSON object"),
            ExtractionError::MissingField(field) => {
                write!(f, "required field '{field}' is missing")
            }
            ExtractionError::InvalidField { field, reason } => {
                write!(f, "field '{field}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ExtractionError {}

/// Failure of an operation run under a retry policy
#[derive(Debug, Clone, PartialEq)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    Exhausted { attempts: u32, last: E },
    /// A non-retryable error ended the run
    Fatal(E),
}

impl<E> RetryError<E> {
    /// The underlying error, whichever way the run ended.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Fatal(e) => e,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted { attempts, last } => {
                write!(f, "gave up after {attempts} attempts: {last}")
            }
            RetryError::Fatal(e) => write!(f, "non-retryable error: {e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

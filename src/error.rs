// author: kodeholic (powered by Claude)

use std::fmt;

#[derive(Debug)]
pub enum RelayError {
    InvalidPayload(String),
    UnknownEvent(String),
    LogWrite(std::io::Error),
    Io(std::io::Error),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
            RelayError::UnknownEvent(name)  => write!(f, "Unknown event: {}", name),
            RelayError::LogWrite(err)       => write!(f, "Log write failed: {}", err),
            RelayError::Io(err)             => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::LogWrite(err) | RelayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::Io(err)
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

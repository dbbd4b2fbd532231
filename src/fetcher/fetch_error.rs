use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    InvalidUrl(String),
    Network(String),
    HttpStatus(u16),
    EmptyPage,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::HttpStatus(code) => write!(f, "HTTP status {code}"),
            FetchError::EmptyPage => write!(f, "Page yielded no visible text"),
        }
    }
}

impl Error for FetchError {}

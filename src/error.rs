use std::fmt;

#[derive(Debug)]
pub enum Error {
    Auth(String),
    Network(String),
    UnknownRemoteCode { field: &'static str, code: String },
    Unmapped { field: &'static str, value: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Auth(msg) => write!(f, "authentication error: {msg}"),
            Error::Network(msg) => write!(f, "network error: {msg}"),
            Error::UnknownRemoteCode { field, code } => {
                write!(f, "unknown remote {field} code: {code:?}")
            }
            Error::Unmapped { field, value } => {
                write!(f, "no remote encoding for {field} value {value:?}")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

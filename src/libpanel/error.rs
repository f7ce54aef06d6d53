use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server answered {status} for {method} {path}")]
    Status {
        method: String,
        path: String,
        status: u16,
    },
    #[error("invalid JSON: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid data: {0}")]
    Validation(String),
    #[error("{kind} {id:?} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("bad url: {0}")]
    Url(#[from] url::ParseError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Transport failures and non-2xx answers are treated the same way.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Status { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

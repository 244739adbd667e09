use thiserror::Error;

/// All errors generated in `ticker-data`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DataError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP error {status} from {url}")]
    Status { status: u16, url: String },

    #[error("provider error {code}: {description}")]
    Provider { code: String, description: String },

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("provider returned no bars for {0}")]
    EmptyResult(String),

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("invalid history window: start {start} is not before end {end}")]
    InvalidWindow { start: String, end: String },
}

impl DataError {
    /// Determine if an error is caused by the requested symbol rather than the transport, so
    /// retrying with the same ticker cannot succeed.
    pub fn is_symbol_error(&self) -> bool {
        match self {
            DataError::SymbolNotFound(_) | DataError::EmptyResult(_) => true,
            DataError::Provider { code, .. } => {
                let code_lower = code.to_lowercase();
                code_lower.contains("not found") || code_lower.contains("no data")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
                url: value
                    .url()
                    .map(|url| url.to_string())
                    .unwrap_or_default(),
            },
            None => Self::Http(value.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<url::ParseError> for DataError {
    fn from(value: url::ParseError) -> Self {
        Self::Http(format!("invalid url: {value}"))
    }
}

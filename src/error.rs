use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    /// Fetching the source CSV failed (transport error, bad status, timeout)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Source CSV could not be parsed (unbalanced quotes, ragged rows)
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Short machine-friendly label used in logs and the health report
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Parse(_) => "parse",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Other(_) => "other",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Parse(format!("CSV error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Fetch(format!("request timed out: {}", err))
        } else {
            AppError::Fetch(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;

#[derive(Debug, thiserror::Error)]
pub enum SocialPulseError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("No valid data: {0}")]
    NoValidData(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl SocialPulseError {
    /// Upstream HTTP status carried by this error, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            SocialPulseError::Upstream { status, .. } => *status,
            SocialPulseError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the upstream signalled rate limiting (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        self.upstream_status() == Some(429)
    }
}

pub type Result<T> = std::result::Result<T, SocialPulseError>;

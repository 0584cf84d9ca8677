use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("SGIS credentials not configured. Run 'insightforge config set sgis.service_id YOUR_ID' to configure.")]
    NoSgisCredentials,

    #[error("Naver credentials not configured. Run 'insightforge config set naver.client_id YOUR_ID' to configure.")]
    NoNaverCredentials,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    ApiError {
        code: String,
        message: String,
        hint: Option<String>,
    },

    #[error("Access token expired")]
    TokenExpired,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timeout: operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimit,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("{0}")]
    Other(String),
}

impl ForgeError {
    /// Create an API error with an optional hint
    pub fn api_error(
        code: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self::ApiError {
            code: code.into(),
            message: message.into(),
            hint,
        }
    }

    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NoSgisCredentials => Some(
                "Visit https://sgis.kostat.go.kr/developer to register a service. \
                 Then run: insightforge config set sgis.service_id YOUR_ID"
                    .to_string(),
            ),
            Self::NoNaverCredentials => Some(
                "Visit https://developers.naver.com to register an application. \
                 Then run: insightforge config set naver.client_id YOUR_ID"
                    .to_string(),
            ),
            Self::ApiError { hint, .. } => hint.clone(),
            Self::Network(_) => Some("Check your internet connection and try again.".to_string()),
            Self::RateLimit => {
                Some("You've made too many requests. Please wait a moment.".to_string())
            }
            Self::TokenExpired => Some(
                "The collector refreshes tokens automatically; if this persists, \
                 check your SGIS credentials."
                    .to_string(),
            ),
            _ => None,
        }
    }

    /// Check if the error is transient and worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Timeout(_)
                | Self::ServerError(_)
                | Self::RateLimit
                | Self::TokenExpired
        )
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

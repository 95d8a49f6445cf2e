use crate::schema::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API error: {status}")]
    Http { status: u16 },

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration value for '{field}': {reason} (got '{value}')")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Http { .. } | ClientError::Request(_) => ErrorCategory::Network,
            ClientError::Validation(_) | ClientError::Serialization(_) => {
                ErrorCategory::Validation
            }
            ClientError::InvalidConfigValue { .. } | ClientError::ConfigParse { .. } => {
                ErrorCategory::Configuration
            }
            ClientError::Io(_) | ClientError::Csv(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 5xx 與連線錯誤通常是暫時性的，可以重試
            ClientError::Http { status } if *status >= 500 => ErrorSeverity::Medium,
            ClientError::Request(_) => ErrorSeverity::Medium,
            ClientError::Http { .. } => ErrorSeverity::High,
            ClientError::Validation(_) | ClientError::Serialization(_) => ErrorSeverity::High,
            ClientError::InvalidConfigValue { .. } | ClientError::ConfigParse { .. } => {
                ErrorSeverity::High
            }
            ClientError::Io(_) | ClientError::Csv(_) => ErrorSeverity::Critical,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::Http { status } => {
                format!("The plans service answered with HTTP {}", status)
            }
            ClientError::Request(_) => "Could not reach the plans service".to_string(),
            ClientError::Validation(e) => {
                format!(
                    "The plans service returned unexpected data ({} issue{})",
                    e.issues().len(),
                    if e.issues().len() == 1 { "" } else { "s" }
                )
            }
            ClientError::Serialization(_) => "Failed to encode or decode JSON".to_string(),
            ClientError::Io(e) => format!("File system error: {}", e),
            ClientError::Csv(_) => "Failed to write CSV output".to_string(),
            ClientError::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            ClientError::ConfigParse { message } => format!("Bad configuration: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ClientError::Http { status } if *status >= 500 => {
                "The server failed; try again later or raise --retry"
            }
            ClientError::Http { status } if *status == 404 => {
                "Check that --base-url points at the plans API"
            }
            ClientError::Http { .. } => "Check the request and the API base URL",
            ClientError::Request(_) => "Check that the API server is running and reachable",
            ClientError::Validation(_) => {
                "The API response does not match the plan schema; check the server version"
            }
            ClientError::Serialization(_) => "Check the JSON payload",
            ClientError::Io(_) => "Check file paths and permissions",
            ClientError::Csv(_) => "Check that stdout is writable",
            ClientError::InvalidConfigValue { .. } | ClientError::ConfigParse { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

use thiserror::Error;

/// Exit code for a malformed configuration or snapshot at startup
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for a snapshot that could not be written
pub const EXIT_PERSISTENCE: u8 = 3;
/// Exit code for anything else that reaches the process boundary
pub const EXIT_OTHER: u8 = 1;

/// SlabFinder errors
#[derive(Debug, Error)]
pub enum SlabError {
    /// A vendor endpoint was unreachable or answered with a failure status
    #[error("Fetch error ({endpoint}): {message}")]
    Fetch { endpoint: String, message: String },

    /// A fetched payload did not match the vendor's expected grammar
    #[error("Parse error ({page}): {message}")]
    Parse { page: String, message: String },

    /// The updated snapshot could not be written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Bootstrap input (config file, snapshot store) is malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Webhook delivery errors
    #[error("Notification error: {0}")]
    Notify(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl SlabError {
    pub fn fetch(endpoint: impl Into<String>, message: impl ToString) -> Self {
        SlabError::Fetch {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn parse(page: impl Into<String>, message: impl ToString) -> Self {
        SlabError::Parse {
            page: page.into(),
            message: message.to_string(),
        }
    }

    /// Process exit code for errors that reach `main`
    pub fn exit_code(&self) -> u8 {
        match self {
            SlabError::Config(_) => EXIT_CONFIG,
            SlabError::Persistence(_) => EXIT_PERSISTENCE,
            _ => EXIT_OTHER,
        }
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> Result<T, SlabError>;
}

impl<T, E: Into<SlabError>> ErrorContext<T> for Result<T, E> {
    fn context(self, msg: &str) -> Result<T, SlabError> {
        self.map_err(|e| {
            let err: SlabError = e.into();
            match err {
                SlabError::Fetch { endpoint, message } => SlabError::Fetch {
                    endpoint,
                    message: format!("{}: {}", msg, message),
                },
                SlabError::Parse { page, message } => SlabError::Parse {
                    page,
                    message: format!("{}: {}", msg, message),
                },
                SlabError::Persistence(s) => SlabError::Persistence(format!("{}: {}", msg, s)),
                SlabError::Config(s) => SlabError::Config(format!("{}: {}", msg, s)),
                SlabError::Notify(s) => SlabError::Notify(format!("{}: {}", msg, s)),
                SlabError::Other(s) => SlabError::Other(format!("{}: {}", msg, s)),
                SlabError::Io(e) => SlabError::Io(e),
                SlabError::Json(e) => SlabError::Json(e),
                SlabError::Http(e) => SlabError::Http(e),
            }
        })
    }
}

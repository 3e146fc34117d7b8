use thiserror::Error;

/// Failure talking to Toggl or Jira.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{service} rejected the credentials")]
    Unauthorized { service: &'static str },

    #[error("{service} requires a paid plan for this request")]
    PaymentRequired { service: &'static str },

    #[error("{service} rate limit reached")]
    RateLimited { service: &'static str },

    #[error("{service} server error {status}: {body}")]
    Server {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned {status}: {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required.")]
    Missing(&'static str),

    #[error("{key} is invalid ({reason}).")]
    Invalid { key: &'static str, reason: String },

    #[error("could not read {path}: {message}")]
    EnvFile { path: String, message: String },
}

#[derive(Debug, Error)]
#[error("malformed {kind} {id}: {message}")]
pub struct MalformedRecord {
    pub kind: &'static str,
    pub id: String,
    pub message: String,
}

/// Errors that abort a run before anything on Jira is touched.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to {action}: {source}")]
    Fetch {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Malformed(#[from] MalformedRecord),
}

impl SyncError {
    pub fn fetch(action: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| SyncError::Fetch { action, source }
    }
}

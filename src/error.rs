use thiserror::Error;

/// Failures reported by the extraction engine.
///
/// The gateway never branches on the specific cause; every variant is logged
/// and mapped to the generic failure envelope. The variants exist so engine
/// implementations can report what actually happened.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// Network-level failure reaching the remote platform
    #[error("network error: {0}")]
    Network(String),

    /// The remote platform answered with an error or unusable payload
    #[error("remote platform error: {0}")]
    Remote(String),

    /// The remote payload could not be parsed
    #[error("response parse error: {0}")]
    Parse(String),

    /// The remote platform throttled the request
    #[error("rate limited by remote platform")]
    RateLimited,
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            ExtractError::Network(err.to_string())
        } else if err.is_decode() {
            ExtractError::Parse(err.to_string())
        } else {
            ExtractError::Remote(err.to_string())
        }
    }
}

/// Errors loading or persisting the settings document.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O failure reading or writing the document
    #[error("settings I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document exists but is not a valid settings JSON object
    #[error("invalid settings document {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

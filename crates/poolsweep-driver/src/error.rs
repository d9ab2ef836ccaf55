use thiserror::Error;

/// Failure of a single remote call or of client construction.
///
/// Carries strings rather than source errors so scripted failures can be
/// cloned and replayed by [`InMemoryDirectory`](crate::local::InMemoryDirectory).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The service answered with an error body.
    #[error("{code}: {message}")]
    Api {
        code: String,
        message: String,
        status: u16,
    },

    /// The request never produced a response.
    #[error("send request failed: {message}")]
    Transport {
        message: String,
        /// True when the endpoint could not be reached at all (DNS, refused).
        connect: bool,
    },

    #[error("credentials unavailable: {0}")]
    Credentials(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("client setup failed: {0}")]
    Setup(String),
}

impl ClientError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Api { code: code.into(), message: message.into(), status: 400 }
    }

    /// Service error code, when the failure came from the service.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            ClientError::Transport { .. } => Some("RequestError"),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClientError::Api { message, .. } => message,
            ClientError::Transport { message, .. } => message,
            ClientError::Credentials(m) | ClientError::Decode(m) | ClientError::Setup(m) => m,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return ClientError::Decode(e.to_string());
        }
        ClientError::Transport { message: e.to_string(), connect: e.is_connect() }
    }
}

use lb_core::timed::RemoteError;

/// Errors from talking to the account server.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not parse server reply: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server returned {0}")]
    Server(reqwest::StatusCode),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("not logged in")]
    NotLoggedIn,
}

impl From<AuthError> for RemoteError {
    fn from(err: AuthError) -> Self {
        match &err {
            // reqwest's connect/timeout/request errors all mean the server
            // was unreachable; everything else is the generic bucket.
            AuthError::Network(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                RemoteError::Transport(err.to_string())
            }
            _ => RemoteError::Other(err.to_string()),
        }
    }
}

use std::future::Future;
use std::sync::{Arc, Mutex};

use lb_core::{info, timed::RemoteError, CLIENT};
use serde::Deserialize;

use crate::{token_store, AuthError, Credentials};

/// A logged-in account. Token lives only in memory (and, if the user asked
/// to be remembered, in the system keyring).
#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    pub token: String,
}

/// What the account server says back: the `(success, message)` pair the
/// dialogs consume, plus a token on successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct Reply {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// The authentication session.
///
/// Constructed once at startup and passed to whoever needs it; replaces the
/// global account-service singleton of the original application, so tests
/// can spin up sessions against any server they like.
pub struct Session {
    base_url: String,
    client: reqwest::Client,
    account: Mutex<Option<Account>>,
    remember: bool,
}

impl Session {
    pub fn new(base_url: impl Into<String>, remember: bool) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: CLIENT.clone(),
            account: Mutex::new(None),
            remember,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Username of the logged-in account, if any.
    pub fn current_username(&self) -> Option<String> {
        self.account
            .lock()
            .ok()
            .and_then(|a| a.as_ref().map(|a| a.username.clone()))
    }

    pub fn is_logged_in(&self) -> bool {
        self.account
            .lock()
            .map(|a| a.is_some())
            .unwrap_or(false)
    }

    /// `POST /api/login` with username and password.
    ///
    /// A rejection (wrong password, unknown user) comes back as
    /// `Reply { success: false, .. }`, not as an error; errors mean the
    /// exchange itself broke down.
    pub async fn login(&self, username: &str, password: &str) -> Result<Reply, AuthError> {
        info!("Logging in... ({username})");
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let reply = self.post_json("/api/login", &body).await?;

        if reply.success {
            self.adopt(username, reply.token.as_deref());
        }
        Ok(reply)
    }

    /// `POST /api/register` with username, password and email.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Reply, AuthError> {
        info!("Registering account... ({username})");
        let body = serde_json::json!({
            "username": username,
            "password": password,
            "email": email,
        });
        let reply = self.post_json("/api/register", &body).await?;

        if reply.success {
            self.adopt(username, reply.token.as_deref());
        }
        Ok(reply)
    }

    async fn post_json(
        &self,
        route: &str,
        body: &serde_json::Value,
    ) -> Result<Reply, AuthError> {
        let url = format!("{}{route}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        // Rejections arrive as a decodable body whatever the status code;
        // only an undecodable non-2xx is a server error.
        match serde_json::from_str::<Reply>(&text) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(AuthError::Server(status)),
            Err(e) => Err(AuthError::Json(e)),
        }
    }

    fn adopt(&self, username: &str, token: Option<&str>) {
        let token = token.unwrap_or_default().to_owned();
        if self.remember && !token.is_empty() {
            if let Err(e) = token_store::store_token(username, &token) {
                lb_core::err!("Could not store session token: {e}");
            }
        }
        if let Ok(mut slot) = self.account.lock() {
            *slot = Some(Account {
                username: username.to_owned(),
                token,
            });
        }
    }

    /// Log out: forget the in-memory account and best-effort delete any
    /// remembered token.
    pub fn logout(&self) {
        let username = self.current_username();
        if let Ok(mut slot) = self.account.lock() {
            *slot = None;
        }
        if let Some(username) = username {
            // Token might not exist; deletion failures don't matter here.
            token_store::delete_token(&username);
        }
    }

    /// Shutdown-time teardown. Idempotent; calling it on a logged-out
    /// session is a no-op.
    pub fn teardown(&self) {
        if self.is_logged_in() {
            self.logout();
        }
    }
}

/// Build the `(success, message)` future the timed race consumes for login.
///
/// The future owns its inputs so it can outlive the dialog that spawned it
/// (the race leaves it running on timeout).
pub fn login_op(
    session: Arc<Session>,
    credentials: Credentials,
) -> impl Future<Output = Result<(bool, String), RemoteError>> + Send + 'static {
    async move {
        let reply = session
            .login(&credentials.username, &credentials.password)
            .await
            .map_err(RemoteError::from)?;
        Ok((reply.success, reply.message))
    }
}

/// Same as [`login_op`] for registration.
pub fn register_op(
    session: Arc<Session>,
    credentials: Credentials,
) -> impl Future<Output = Result<(bool, String), RemoteError>> + Send + 'static {
    async move {
        let email = credentials.email.clone().unwrap_or_default();
        let reply = session
            .register(&credentials.username, &credentials.password, &email)
            .await
            .map_err(RemoteError::from)?;
        Ok((reply.success, reply.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_decodes_with_and_without_token() {
        let reply: Reply =
            serde_json::from_str(r#"{"success":true,"message":"ok","token":"abc"}"#).unwrap();
        assert!(reply.success);
        assert_eq!(reply.token.as_deref(), Some("abc"));

        let reply: Reply =
            serde_json::from_str(r#"{"success":false,"message":"user exists"}"#).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message, "user exists");
        assert!(reply.token.is_none());
    }

    #[test]
    fn base_url_is_normalized() {
        let session = Session::new("https://example.test/", false);
        assert_eq!(session.base_url(), "https://example.test");
    }

    #[test]
    fn teardown_is_idempotent() {
        let session = Session::new("https://example.test", false);
        session.teardown();
        session.teardown();
        assert!(!session.is_logged_in());
    }
}

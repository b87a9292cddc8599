//! Shared helpers for the end-to-end tests.

use std::time::Duration;

use lb_core::timed::RemoteError;

/// A fake remote operation: answers `(success, message)` after `delay`.
pub fn fake_server(
    delay: Duration,
    success: bool,
    message: &str,
) -> impl std::future::Future<Output = Result<(bool, String), RemoteError>> + Send + 'static {
    let message = message.to_owned();
    async move {
        tokio::time::sleep(delay).await;
        Ok((success, message))
    }
}

/// A fake remote operation that fails with a transport error.
pub fn unreachable_server(
) -> impl std::future::Future<Output = Result<(bool, String), RemoteError>> + Send + 'static {
    async { Err(RemoteError::Transport("connection refused".to_owned())) }
}

/// Silence terminal output for the duration of the test binary.
pub fn quiet() {
    lb_core::print::set_print(false);
}

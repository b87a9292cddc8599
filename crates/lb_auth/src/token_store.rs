//! Remember-me token storage in the system keyring.
//!
//! Tokens never touch the config file; the keyring entry is keyed by
//! username under the application's service name.

use crate::AuthError;

const SERVICE: &str = "Lightbox";

/// Store a session token for a username.
pub fn store_token(username: &str, token: &str) -> Result<(), AuthError> {
    let entry = keyring::Entry::new(SERVICE, username)?;
    entry.set_password(token)?;
    Ok(())
}

/// Read a previously remembered token.
pub fn read_token(username: &str) -> Result<String, AuthError> {
    let entry = keyring::Entry::new(SERVICE, username)?;
    Ok(entry.get_password()?)
}

/// Delete a remembered token. Ignores errors, since the credential might
/// simply not exist.
pub fn delete_token(username: &str) {
    if let Ok(entry) = keyring::Entry::new(SERVICE, username) {
        let _ = entry.delete_credential();
    }
}

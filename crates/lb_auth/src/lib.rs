//! Authentication for the Lightbox media viewer.
//!
//! The [`Session`] is constructed once and handed to whoever needs it; there
//! is no process-wide account singleton. Credentials are validated client
//! side ([`validation`]) before anything touches the network, and remember-me
//! tokens live in the system keyring ([`token_store`]), never in config files.

mod error;
pub mod flow;
mod session;
pub mod token_store;
pub mod validation;

pub use error::AuthError;
pub use flow::{FlowState, SubmitFlow};
pub use session::{login_op, register_op, Account, Reply, Session};
pub use validation::{
    password_hint, validate_login, validate_registration, Credentials, PasswordHint,
    ValidationError,
};

//! # it-auth
//!
//! Authentication for issuetrack.
//!
//! ## Features
//!
//! - API tokens held as secrets, logged only by fingerprint
//! - File-backed login sessions (owner-only permissions on Unix)
//! - Credential resolution: configured token, then session, then anonymous

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::{resolve, CredentialSource, Credentials};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};
pub use token::ApiToken;

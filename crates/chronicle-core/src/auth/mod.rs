//! Authentication module for managing the login session.
//!
//! This module provides `Session`: the in-memory login state that keeps the
//! `ApiClient` credential in step with login and logout. Tokens are never
//! persisted; they expire 15 minutes after issue.

pub mod session;

pub use session::{Identity, Session, SessionData};

//! Data models for the Chronicle API.
//!
//! This module contains the typed schemas for everything the server sends
//! and receives:
//!
//! - `Envelope`, `ErrorPayload`: the `{ data, status }` wrapper around every response
//! - `Student`, `StaffUser` and their login/registration payloads
//! - `Notice`, `NewNotice`: notice board entries

pub mod envelope;
pub mod notice;
pub mod person;

pub use envelope::{Envelope, ErrorPayload, Health};
pub use notice::{NewNotice, Notice};
pub use person::{
    StaffLogin, StaffLoginRequest, StaffUser, Student, StudentLogin, StudentLoginRequest,
    StudentRegistration,
};

//! REST API client module for the Chronicle service.
//!
//! This module provides the `ApiClient` for talking to the Chronicle API:
//! student/staff login and the notice board.
//!
//! The API uses JWT bearer token authentication. The token returned by a
//! login is set on the client with `ApiClient::set_token` and attached to
//! every request until it is cleared.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiResponse};
pub use error::{ApiError, ErrorBody};

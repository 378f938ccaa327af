//! Core library for the Chronicle student portal client.
//!
//! - `api`: `ApiClient`, an HTTP client bound to one base address that
//!   injects a bearer token into every request while one is set
//! - `auth`: in-memory `Session` tying login/logout to the client credential
//! - `config`: base address and timeout resolution
//! - `models`: typed request/response schemas
//! - `screens`: what the login form and notice board do with client results

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod screens;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResponse};
pub use auth::{Identity, Session};
pub use config::{ClientConfig, Config};

//! Caller-side behavior of the login form and the notice board.
//!
//! These hold no rendering code: each screen calls the client and turns the
//! outcome into what the front-end shows.

pub mod login;
pub mod notices;

pub use login::{failure_message, LoginRole, LoginScreen, LOGIN_FAILED};
pub use notices::{load_notices, NoticeBoard, EMPTY_BOARD};

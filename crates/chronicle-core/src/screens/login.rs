use tracing::error;

use crate::api::ApiError;
use crate::auth::Session;

/// Shown when the server gives no reason for a failed login.
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginRole {
    #[default]
    Student,
    Staff,
}

/// State of the login form.
#[derive(Default)]
pub struct LoginScreen {
    pub role: LoginRole,
    /// Roll number for students, login ID for staff.
    pub login_id: String,
    pub password: String,
    pub message: Option<String>,
}

impl LoginScreen {
    pub fn new(role: LoginRole, login_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            role,
            login_id: login_id.into(),
            password: password.into(),
            message: None,
        }
    }

    /// Submit the form. Sets `message` either way and returns whether the login succeeded.
    pub async fn submit(&mut self, session: &mut Session) -> bool {
        let result = match self.role {
            LoginRole::Student => session.login_student(&self.login_id, &self.password).await,
            LoginRole::Staff => session.login_staff(&self.login_id, &self.password).await,
        }
        .map(|data| format!("Logged in as {}: {}", data.identity.role_label(), data.identity.name()));

        match result {
            Ok(message) => {
                self.message = Some(message);
                self.password.clear();
                true
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.message = Some(failure_message(&e));
                false
            }
        }
    }
}

/// The server's `data.error` if it sent one, otherwise a generic message.
pub fn failure_message(err: &ApiError) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| LOGIN_FAILED.to_string())
}

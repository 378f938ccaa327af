//! Student and staff accounts, plus the login/registration payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A student account as returned by the auth endpoints.
///
/// Only `name` is needed for display; the server passes the rest through
/// from its document store, so everything else is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "rollNo", default)]
    pub roll_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "courseId", default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// A staff account as returned by the staff login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffUser {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "loginId", default)]
    pub login_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "userType", default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentLogin {
    pub token: String,
    pub student: Student,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaffLogin {
    pub token: String,
    pub user: StaffUser,
}

#[derive(Clone, Serialize)]
pub struct StudentLoginRequest {
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct StaffLoginRequest {
    #[serde(rename = "loginId")]
    pub login_id: String,
    pub password: String,
}

/// Payload for `POST /api/auth/student/register`.
#[derive(Clone, Serialize)]
pub struct StudentRegistration {
    pub name: String,
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "courseId", skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

// Passwords stay out of logs.

impl fmt::Debug for StudentLoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentLoginRequest")
            .field("roll_no", &self.roll_no)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for StaffLoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffLoginRequest")
            .field("login_id", &self.login_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for StudentRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentRegistration")
            .field("name", &self.name)
            .field("roll_no", &self.roll_no)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::models::{StaffUser, Student, StudentRegistration};

/// Token expiry time in minutes.
/// The server issues JWTs with its framework's default 15-minute lifetime.
const TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Who the current session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Student(Student),
    Staff(StaffUser),
}

impl Identity {
    pub fn name(&self) -> &str {
        match self {
            Identity::Student(s) => &s.name,
            Identity::Staff(u) => &u.name,
        }
    }

    pub fn role_label(&self) -> &'static str {
        match self {
            Identity::Student(_) => "student",
            Identity::Staff(_) => "staff",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionData {
    pub token: String,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, identity: Identity) -> Self {
        Self {
            token,
            identity,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(TOKEN_EXPIRY_MINUTES)
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        (self.expires_at() - Utc::now()).num_minutes().max(0)
    }
}

/// In-memory login state for one `ApiClient`.
///
/// The client's credential follows the session: a successful login sets the
/// token, `logout` clears it. Nothing is written to disk.
pub struct Session {
    api: ApiClient,
    data: Option<SessionData>,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self { api, data: None }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Log in as a student. On failure the previous session and credential are kept.
    pub async fn login_student(&mut self, roll_no: &str, password: &str) -> Result<&SessionData, ApiError> {
        let login = self.api.student_login(roll_no, password).await?;
        self.begin(login.token, Identity::Student(login.student))
    }

    /// Log in as staff. On failure the previous session and credential are kept.
    pub async fn login_staff(&mut self, login_id: &str, password: &str) -> Result<&SessionData, ApiError> {
        let login = self.api.staff_login(login_id, password).await?;
        self.begin(login.token, Identity::Staff(login.user))
    }

    /// Register a new student account; the server logs the new account in directly.
    pub async fn register_student(&mut self, registration: &StudentRegistration) -> Result<&SessionData, ApiError> {
        let login = self.api.student_register(registration).await?;
        self.begin(login.token, Identity::Student(login.student))
    }

    fn begin(&mut self, token: String, identity: Identity) -> Result<&SessionData, ApiError> {
        self.api.set_token(Some(&token))?;
        info!(role = identity.role_label(), name = identity.name(), "Login successful");
        Ok(&*self.data.insert(SessionData::new(token, identity)))
    }

    /// Clear session data and the client credential.
    pub fn logout(&mut self) {
        if self.data.take().is_some() {
            info!("Logged out");
        }
        self.api.clear_token();
    }

    pub fn data(&self) -> Option<&SessionData> {
        self.data.as_ref()
    }

    /// Get the bearer token if a session exists
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.data.as_ref().map(|d| &d.identity)
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn student(name: &str) -> Student {
        serde_json::from_value(serde_json::json!({ "name": name })).unwrap()
    }

    #[test]
    fn test_session_data_expiry() {
        let mut data = SessionData::new("t".to_string(), Identity::Student(student("Asha")));
        assert!(!data.is_expired());
        assert!(data.minutes_until_expiry() <= TOKEN_EXPIRY_MINUTES);

        data.created_at = Utc::now() - Duration::minutes(TOKEN_EXPIRY_MINUTES + 1);
        assert!(data.is_expired());
        assert_eq!(data.minutes_until_expiry(), 0);
    }

    #[test]
    fn test_identity_labels() {
        let id = Identity::Student(student("Asha"));
        assert_eq!(id.name(), "Asha");
        assert_eq!(id.role_label(), "student");
    }

    #[test]
    fn test_begin_and_logout_drive_credential() {
        let api = ApiClient::new(&ClientConfig::default()).unwrap();
        let mut session = Session::new(api.clone());
        assert!(!session.is_authenticated());

        session
            .begin("tok".to_string(), Identity::Student(student("Asha")))
            .unwrap();
        assert!(session.is_valid());
        assert_eq!(session.token(), Some("tok"));
        assert!(api.has_token());

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(!api.has_token());
    }

    #[test]
    fn test_begin_with_unusable_token_keeps_state() {
        let api = ApiClient::new(&ClientConfig::default()).unwrap();
        let mut session = Session::new(api);
        let result = session.begin("bad\r\ntoken".to_string(), Identity::Student(student("X")));
        assert!(matches!(result, Err(ApiError::InvalidToken)));
        assert!(!session.is_authenticated());
        assert!(!session.api().has_token());
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format the server uses for timestamps (UTC, no offset).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub id: String,
    pub title: String,
    /// Category such as "Events", "News and Updates" or "Meeting".
    #[serde(rename = "type")]
    pub notice_type: String,
    pub description: String,
    #[serde(rename = "uploadsUrl", default)]
    pub uploads_url: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl Notice {
    /// Parsed `createdAt`, if present and well-formed.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok())
    }
}

/// Payload for `POST /api/notices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotice {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub notice_type: String,
    #[serde(rename = "uploadsUrl", skip_serializing_if = "Option::is_none")]
    pub uploads_url: Option<String>,
}

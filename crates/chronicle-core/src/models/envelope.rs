use serde::{Deserialize, Serialize};

/// Wrapper the server puts around every response body.
///
/// Success bodies carry the payload in `data`; failure bodies carry an
/// `ErrorPayload`. `data` may be `null` or missing, so it is always optional
/// here and each endpoint decides what an absent payload means.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,
}

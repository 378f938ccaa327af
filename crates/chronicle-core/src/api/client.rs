//! API client for the Chronicle REST API.
//!
//! `ApiClient` issues requests against a fixed base address and attaches
//! `Authorization: Bearer <token>` to every request while a token is set.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{header, Client, Method, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::models::{
    Envelope, Health, NewNotice, Notice, StaffLogin, StaffLoginRequest, StudentLogin,
    StudentLoginRequest, StudentRegistration,
};

use super::ApiError;

/// A successful response: status plus the decoded body.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: T,
}

/// API client for Chronicle.
///
/// Clones share both the connection pool and the default-header state, so a
/// token set through one clone is seen by all of them. Use `with_token` for
/// an independent credential on the same pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    headers: Arc<RwLock<Arc<header::HeaderMap>>>,
}

impl ApiClient {
    /// Create a client bound to `config.base_url`. Performs no network I/O.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Self::validate_base_url(&config.base_url)?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            headers: Arc::new(RwLock::new(Arc::new(header::HeaderMap::new()))),
        })
    }

    fn validate_base_url(raw: &str) -> Result<String, ApiError> {
        let invalid = |reason: &str| ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not contain a query or fragment"));
        }
        Ok(trimmed.trim_end_matches('/').to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set (`Some`) or clear (`None`) the bearer token for subsequent requests.
    ///
    /// Requests already dispatched keep the headers they were sent with.
    pub fn set_token(&self, token: Option<&str>) -> Result<(), ApiError> {
        match token {
            Some(token) => {
                let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ApiError::InvalidToken)?;
                value.set_sensitive(true);

                let mut headers = (*self.headers_snapshot()).clone();
                headers.insert(header::AUTHORIZATION, value);
                self.replace_headers(headers);
            }
            None => self.clear_token(),
        }
        Ok(())
    }

    /// Remove the `Authorization` header entirely.
    pub fn clear_token(&self) {
        let mut headers = (*self.headers_snapshot()).clone();
        headers.remove(header::AUTHORIZATION);
        self.replace_headers(headers);
    }

    pub fn has_token(&self) -> bool {
        self.headers_snapshot().contains_key(header::AUTHORIZATION)
    }

    /// Create a new ApiClient with the given token, sharing the connection pool
    /// but not the header state.
    pub fn with_token(&self, token: &str) -> Result<Self, ApiError> {
        let forked = Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            headers: Arc::new(RwLock::new(self.headers_snapshot())),
        };
        forked.set_token(Some(token))?;
        Ok(forked)
    }

    fn headers_snapshot(&self) -> Arc<header::HeaderMap> {
        // The lock only guards a pointer swap, so a poisoned lock still holds a valid map.
        Arc::clone(&*self.headers.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn replace_headers(&self, headers: header::HeaderMap) {
        *self.headers.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(headers);
    }

    /// Resolve a request path against the base address.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolve `prefix` and append `segment` as one percent-encoded path segment.
    ///
    /// `/`, `?` and `#` inside the segment are escaped, so it cannot leave `prefix`.
    fn url_with_segment(&self, prefix: &str, segment: &str) -> Result<String, ApiError> {
        if matches!(segment, "" | "." | "..") {
            return Err(ApiError::InvalidPathSegment(segment.to_string()));
        }
        let invalid = |reason: &str| ApiError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };
        let mut url = Url::parse(&self.url(prefix)).map_err(|e| invalid(&e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base"))?
            .pop_if_empty()
            .push(segment);
        Ok(url.into())
    }

    /// Start a request carrying the headers current at this moment.
    fn request(&self, method: Method, path: &str) -> (String, RequestBuilder) {
        self.request_url(method, self.url(path))
    }

    fn request_url(&self, method: Method, url: String) -> (String, RequestBuilder) {
        let headers = self.headers_snapshot();
        debug!(
            method = %method,
            url = %url,
            authenticated = headers.contains_key(header::AUTHORIZATION),
            "Dispatching request"
        );
        let builder = self.client.request(method, &url).headers((*headers).clone());
        (url, builder)
    }

    /// Send the request once and decode a success body as `T`.
    async fn execute<T: DeserializeOwned>(
        url: &str,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(url = url, status = status.as_u16(), "Request failed");
            return Err(ApiError::from_status(status, &text));
        }

        // Empty bodies (e.g. 204) decode as JSON null
        let raw = if text.trim().is_empty() { "null" } else { text.as_str() };
        let body = serde_json::from_str(raw).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })?;

        Ok(ApiResponse { status, body })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        let (url, builder) = self.request(Method::GET, path);
        Self::execute(&url, builder).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let (url, builder) = self.request(Method::GET, path);
        Self::execute(&url, builder.query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (url, builder) = self.request(Method::POST, path);
        Self::execute(&url, builder.json(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (url, builder) = self.request(Method::PUT, path);
        Self::execute(&url, builder.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        let (url, builder) = self.request(Method::DELETE, path);
        Self::execute(&url, builder).await
    }

    /// Unwrap `data` from an envelope, treating an absent payload as a schema error.
    fn require_data<T>(response: ApiResponse<Envelope<T>>, what: &str) -> Result<T, ApiError> {
        response
            .body
            .data
            .ok_or_else(|| ApiError::InvalidResponse(format!("{} response has no data", what)))
    }

    // ===== Endpoints =====

    pub async fn student_login(&self, roll_no: &str, password: &str) -> Result<StudentLogin, ApiError> {
        let body = StudentLoginRequest {
            roll_no: roll_no.to_string(),
            password: password.to_string(),
        };
        let response: ApiResponse<Envelope<StudentLogin>> = self.post("/api/auth/student/login", &body).await?;
        Self::require_data(response, "Student login")
    }

    pub async fn staff_login(&self, login_id: &str, password: &str) -> Result<StaffLogin, ApiError> {
        let body = StaffLoginRequest {
            login_id: login_id.to_string(),
            password: password.to_string(),
        };
        let response: ApiResponse<Envelope<StaffLogin>> = self.post("/api/auth/staff/login", &body).await?;
        Self::require_data(response, "Staff login")
    }

    pub async fn student_register(&self, registration: &StudentRegistration) -> Result<StudentLogin, ApiError> {
        let response: ApiResponse<Envelope<StudentLogin>> = self.post("/api/auth/student/register", registration).await?;
        Self::require_data(response, "Student registration")
    }

    /// Fetch the latest notices, optionally filtered by type.
    /// A `null` payload means no notices.
    pub async fn fetch_notices(&self, notice_type: Option<&str>) -> Result<Vec<Notice>, ApiError> {
        let response: ApiResponse<Envelope<Vec<Notice>>> = match notice_type {
            Some(t) => self.get_with_query("/api/notices", &[("type", t)]).await?,
            None => self.get("/api/notices").await?,
        };
        let notices = response.body.data.unwrap_or_default();
        debug!(count = notices.len(), "Fetched notices");
        Ok(notices)
    }

    pub async fn fetch_notice(&self, id: &str) -> Result<Notice, ApiError> {
        let (url, builder) = self.request_url(Method::GET, self.url_with_segment("/api/notices", id)?);
        let response: ApiResponse<Envelope<Notice>> = Self::execute(&url, builder).await?;
        Self::require_data(response, "Notice")
    }

    pub async fn create_notice(&self, notice: &NewNotice) -> Result<Notice, ApiError> {
        let response: ApiResponse<Envelope<Notice>> = self.post("/api/notices", notice).await?;
        Self::require_data(response, "Create notice")
    }

    pub async fn health(&self) -> Result<Health, ApiError> {
        let response: ApiResponse<Envelope<Health>> = self.get("/api/health").await?;
        Self::require_data(response, "Health")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ClientConfig::new("http://localhost:5000")).unwrap()
    }

    fn auth_header(builder: RequestBuilder) -> Option<String> {
        let request = builder.build().unwrap();
        request
            .headers()
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn test_url_resolution() {
        let c = client();
        assert_eq!(c.url("/api/notices"), "http://localhost:5000/api/notices");
        assert_eq!(c.url("api/notices"), "http://localhost:5000/api/notices");

        let c = ApiClient::new(&ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(c.url("/x"), "http://localhost:5000/x");

        let c = ApiClient::new(&ClientConfig::new("https://school.example/chronicle")).unwrap();
        assert_eq!(c.url("/api/health"), "https://school.example/chronicle/api/health");

        let c = ApiClient::new(&ClientConfig::new(" http://localhost:5000/ ")).unwrap();
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(c.url("/x"), "http://localhost:5000/x");
    }

    #[test]
    fn test_url_with_segment_escapes() {
        let c = client();
        assert_eq!(
            c.url_with_segment("/api/notices", "65f0c2").unwrap(),
            "http://localhost:5000/api/notices/65f0c2"
        );
        assert_eq!(
            c.url_with_segment("/api/notices", "../health").unwrap(),
            "http://localhost:5000/api/notices/..%2Fhealth"
        );
        assert_eq!(
            c.url_with_segment("/api/notices", "?type=Events").unwrap(),
            "http://localhost:5000/api/notices/%3Ftype=Events"
        );

        let c = ApiClient::new(&ClientConfig::new("https://school.example/chronicle/")).unwrap();
        assert_eq!(
            c.url_with_segment("/api/notices", "a b").unwrap(),
            "https://school.example/chronicle/api/notices/a%20b"
        );
    }

    #[test]
    fn test_url_with_segment_rejects_dot_segments() {
        let c = client();
        for bad in ["", ".", ".."] {
            assert!(matches!(
                c.url_with_segment("/api/notices", bad),
                Err(ApiError::InvalidPathSegment(_))
            ));
        }
    }

    #[test]
    fn test_invalid_base_url() {
        for bad in ["", "localhost:5000", "ftp://example.com", "http://x/?a=1", "not a url"] {
            let result = ApiClient::new(&ClientConfig::new(bad));
            assert!(
                matches!(result, Err(ApiError::InvalidBaseUrl { .. })),
                "expected InvalidBaseUrl for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_token_lifecycle() {
        let c = client();
        assert!(!c.has_token());
        let (_, builder) = c.request(Method::GET, "/x");
        assert_eq!(auth_header(builder), None);

        c.set_token(Some("abc")).unwrap();
        assert!(c.has_token());
        let (_, builder) = c.request(Method::GET, "/x");
        assert_eq!(auth_header(builder).as_deref(), Some("Bearer abc"));

        c.set_token(Some("def")).unwrap();
        let (_, builder) = c.request(Method::GET, "/x");
        assert_eq!(auth_header(builder).as_deref(), Some("Bearer def"));

        c.set_token(None).unwrap();
        assert!(!c.has_token());
        let (_, builder) = c.request(Method::GET, "/x");
        assert_eq!(auth_header(builder), None);
    }

    #[test]
    fn test_dispatched_request_keeps_its_headers() {
        let c = client();
        c.set_token(Some("first")).unwrap();
        let (_, in_flight) = c.request(Method::GET, "/x");

        c.clear_token();
        let (_, later) = c.request(Method::GET, "/x");

        assert_eq!(auth_header(in_flight).as_deref(), Some("Bearer first"));
        assert_eq!(auth_header(later), None);
    }

    #[test]
    fn test_invalid_token_keeps_previous_state() {
        let c = client();
        c.set_token(Some("good")).unwrap();
        let result = c.set_token(Some("bad\ntoken"));
        assert!(matches!(result, Err(ApiError::InvalidToken)));
        let (_, builder) = c.request(Method::GET, "/x");
        assert_eq!(auth_header(builder).as_deref(), Some("Bearer good"));
    }

    #[test]
    fn test_clones_share_token_state() {
        let a = client();
        let b = a.clone();
        a.set_token(Some("shared")).unwrap();
        assert!(b.has_token());
        b.clear_token();
        assert!(!a.has_token());
    }

    #[test]
    fn test_with_token_is_independent() {
        let base = client();
        let forked = base.with_token("forked").unwrap();
        assert!(forked.has_token());
        assert!(!base.has_token());

        forked.clear_token();
        base.set_token(Some("base")).unwrap();
        assert!(!forked.has_token());
    }

    #[test]
    fn test_independent_clients_do_not_interfere() {
        let a = client();
        let b = client();
        a.set_token(Some("a-token")).unwrap();
        assert!(!b.has_token());
    }
}

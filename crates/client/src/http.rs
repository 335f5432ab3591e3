//! HTTP client for the booking backend.
//!
//! Wraps `reqwest` with the cross-cutting concerns every endpoint shares:
//! bearer-token attachment, cache-busting on GETs, error normalization
//! (backend `error`/`message` body fields preferred over transport text),
//! and the single 401 refresh-and-retry.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::api::types::{AuthWire, ConflictWire};
use crate::cache::ListCache;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;

const REFRESH_PATH: &str = "/auth/refresh";

/// Client for the booking backend REST API.
///
/// Cheap to clone; all clones share one connection pool, session, and
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) session: Session,
    pub(crate) checkout_key_id: Option<String>,
    pub(crate) events_cache: ListCache<crate::api::types::Event>,
    pub(crate) clubs_cache: ListCache<crate::api::types::Club>,
}

impl ApiClient {
    /// List-cache time to live. Short: capacity numbers go stale fast.
    const CACHE_TTL: Duration = Duration::from_secs(60);

    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.api_base_url.clone(),
                session,
                checkout_key_id: config.checkout_key_id.clone(),
                events_cache: ListCache::new(Self::CACHE_TTL),
                clubs_cache: ListCache::new(Self::CACHE_TTL),
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiError::Malformed("endpoint URL"))
    }

    /// GET `path` and decode the JSON response.
    ///
    /// GETs are marked non-cacheable so list/detail views never read stale
    /// data out of an intermediate cache.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self
            .inner
            .http
            .get(url)
            .query(query)
            .header("Cache-Control", "no-store");
        let response = self.send_with_auth(builder).await?;
        Self::decode(response).await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        headers: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let mut builder = self.inner.http.post(url).json(body);
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        let response = self.send_with_auth(builder).await?;
        Self::decode(response).await
    }

    /// Send with bearer auth attached, collapsing concurrent 401s into a
    /// single token refresh and retrying the original request once.
    async fn send_with_auth(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let token = self.inner.session.token();
        let had_token = token.is_some();
        let observed_generation = self.inner.session.generation();

        // Clone before the first send so the retry can rebuild the request.
        let retry_builder = builder.try_clone();

        let response = Self::with_bearer(builder, token.as_ref()).send().await?;

        if response.status() != StatusCode::UNAUTHORIZED || !had_token {
            return Ok(response);
        }
        let Some(retry_builder) = retry_builder else {
            return Ok(response);
        };

        debug!("401 received, attempting token refresh");
        if self.refresh_session(observed_generation).await.is_err() {
            // Refresh failed: session is cleared, surface the original 401.
            return Err(Self::error_from_response(response).await);
        }

        let fresh = self.inner.session.token();
        Ok(Self::with_bearer(retry_builder, fresh.as_ref())
            .send()
            .await?)
    }

    fn with_bearer(
        builder: reqwest::RequestBuilder,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Single-flight refresh: the actual `POST /auth/refresh` happens at
    /// most once per token generation regardless of how many requests hit
    /// a 401 concurrently.
    async fn refresh_session(&self, observed_generation: u64) -> Result<(), ApiError> {
        let url = self.endpoint(REFRESH_PATH)?;
        let http = self.inner.http.clone();

        self.inner
            .session
            .refresh_once(observed_generation, move || async move {
                // Deliberately unauthenticated; a 401 here must not recurse.
                let response = http.post(url).send().await?;
                if !response.status().is_success() {
                    return Err(Self::error_from_response(response).await);
                }
                let auth: AuthWire = response.json().await?;
                Ok(SecretString::from(auth.access_token))
            })
            .await
            .inspect_err(|e| warn!(error = %e, "token refresh failed, session cleared"))
    }

    /// Decode a response, normalizing non-2xx into [`ApiError`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        // Read text first so a decode failure can be diagnosed.
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to decode backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Normalize a non-success response into the error taxonomy.
    pub(crate) async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        // Recognized conflict: the buyer already holds a registration.
        if let Ok(conflict) = serde_json::from_str::<ConflictWire>(&body)
            && conflict.error == "already_registered"
            && let Some(registration) = conflict.registration
        {
            // Conflict bodies carry no event id; keep the wire value.
            let fallback = gatherly_core::EventId::new("");
            return ApiError::AlreadyRegistered(Box::new(registration.normalize(&fallback)));
        }

        ApiError::Status {
            status,
            message: message_from_body(status, &body),
        }
    }
}

/// Pick the most useful message out of an error body: the backend's
/// `error` field, then `message`, then a generic fallback.
fn message_from_body(status: u16, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_message_prefers_error_field() {
        let body = r#"{"error": "sold_out", "message": "no seats left"}"#;
        assert_eq!(message_from_body(409, body), "sold_out");
    }

    #[test]
    fn test_message_falls_back_to_message_field() {
        let body = r#"{"message": "no seats left"}"#;
        assert_eq!(message_from_body(409, body), "no seats left");
    }

    #[test]
    fn test_message_generic_when_body_is_not_json() {
        assert_eq!(
            message_from_body(502, "<html>bad gateway</html>"),
            "Request failed with status 502"
        );
        assert_eq!(message_from_body(500, ""), "Request failed with status 500");
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = ClientConfig::for_tests("https://api.example.com/v1/");
        let client = ApiClient::new(
            &config,
            Session::new(Box::new(crate::session::MemoryStore::default())),
        )
        .unwrap();

        let url = client.endpoint("/events").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/events");
    }

    /// Minimal HTTP stub: 401s anything not carrying the fresh token,
    /// serves `POST /auth/refresh` (counted), closes after each response.
    async fn serve_stub(listener: tokio::net::TcpListener, refreshes: Arc<AtomicUsize>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let refreshes = Arc::clone(&refreshes);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0_u8; 1024];
                loop {
                    let Ok(n) = stream.read(&mut chunk).await else {
                        return;
                    };
                    if n == 0 {
                        return;
                    }
                    request.extend_from_slice(chunk.get(..n).unwrap_or_default());
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&request);

                let (status, body) = if request.starts_with("POST /auth/refresh") {
                    refreshes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    (
                        "200 OK",
                        r#"{"accessToken":"tok_fresh","user":{"id":"u1","name":"Asha","email":"asha@example.com"}}"#,
                    )
                } else if request
                    .lines()
                    .any(|l| l.eq_ignore_ascii_case("authorization: bearer tok_fresh"))
                {
                    ("200 OK", "[]")
                } else {
                    ("401 Unauthorized", r#"{"error":"token expired"}"#)
                };

                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh_end_to_end() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let refreshes = Arc::new(AtomicUsize::new(0));
        tokio::spawn(serve_stub(listener, Arc::clone(&refreshes)));

        let config = ClientConfig::for_tests(&format!("http://{addr}/"));
        let session = Session::new(Box::new(crate::session::MemoryStore::default()));
        session.set_token(SecretString::from("tok_stale"));
        let client = ApiClient::new(&config, session).unwrap();

        // Both requests snapshot the stale token, both get a 401, and the
        // refresh must still happen exactly once before both retries pass.
        let (a, b) = tokio::join!(
            client.get_json::<serde_json::Value>("/events", &[]),
            client.get_json::<serde_json::Value>("/events", &[]),
        );

        assert!(a.is_ok(), "first request should succeed after retry: {a:?}");
        assert!(b.is_ok(), "second request should succeed after retry: {b:?}");
        assert_eq!(refreshes.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(
            client.session().token().unwrap().expose_secret(),
            "tok_fresh"
        );
    }
}

//! API key guard and request middleware.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::Response;
use comandos_core::config::AuthConfig;
use subtle::ConstantTimeEq;
use tracing::Instrument;
use uuid::Uuid;

/// Maximum length for trace IDs.
/// Longer trace IDs are truncated to prevent log bloat and potential log injection.
const MAX_TRACE_ID_LEN: usize = 128;

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value.
    /// The value is truncated to MAX_TRACE_ID_LEN characters and non-printable characters removed.
    pub fn from_client(value: &str) -> Self {
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker extension: the request carried a valid API key.
#[derive(Clone, Copy, Debug)]
pub struct Authorized;

/// Compares the caller-supplied key with the configured secret.
///
/// An unset or empty secret rejects every caller. A disabled guard accepts
/// every caller.
#[derive(Clone, Debug)]
pub struct ApiKeyGuard {
    enabled: bool,
    secret: Option<String>,
    header_name: HeaderName,
}

impl ApiKeyGuard {
    /// Build the guard from configuration.
    pub fn from_config(config: &AuthConfig) -> ApiResult<Self> {
        let header_name = HeaderName::try_from(config.header_name.as_str()).map_err(|e| {
            comandos_core::Error::Config(format!(
                "invalid auth header name '{}': {e}",
                config.header_name
            ))
        })?;
        let secret = config.api_key.clone().filter(|key| !key.is_empty());

        Ok(Self {
            enabled: config.enabled,
            secret,
            header_name,
        })
    }

    /// Whether write routes are guarded at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a secret is configured.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Header carrying the key.
    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// True iff `supplied` equals the configured secret byte for byte.
    pub fn is_authorized(&self, supplied: Option<&str>) -> bool {
        if !self.enabled {
            return true;
        }
        match (self.secret.as_deref(), supplied) {
            (Some(secret), Some(supplied)) => {
                bool::from(secret.as_bytes().ct_eq(supplied.as_bytes()))
            }
            _ => false,
        }
    }

    /// Check the key header in `headers`.
    pub fn check_headers(&self, headers: &HeaderMap) -> bool {
        let supplied = headers
            .get(&self.header_name)
            .and_then(|v| v.to_str().ok());
        self.is_authorized(supplied)
    }
}

/// Extract trace ID from X-Trace-Id header or generate a new one.
fn extract_or_generate_trace_id(req: &Request) -> TraceId {
    req.headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_else(TraceId::new)
}

/// Middleware that checks the API key and sets up trace context.
///
/// It never rejects on its own; write handlers call [`require_auth`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let trace_id = extract_or_generate_trace_id(&req);
    let trace_id_str = trace_id.0.clone();
    req.extensions_mut().insert(trace_id);

    if state.guard.check_headers(req.headers()) {
        req.extensions_mut().insert(Authorized);
    }

    next.run(req)
        .instrument(tracing::info_span!("request", trace_id = %trace_id_str))
        .await
}

/// Require a valid API key on this request.
pub fn require_auth(req: &Request) -> ApiResult<Authorized> {
    req.extensions()
        .get::<Authorized>()
        .copied()
        .ok_or_else(|| ApiError::Unauthorized("missing or invalid API key".to_string()))
}

/// Get the trace ID from request extensions.
pub fn get_trace_id(req: &Request) -> Option<&TraceId> {
    req.extensions().get::<TraceId>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn guard(api_key: Option<&str>) -> ApiKeyGuard {
        ApiKeyGuard::from_config(&AuthConfig {
            enabled: true,
            api_key: api_key.map(str::to_string),
            header_name: "X-API-Key".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn exact_match_is_authorized() {
        let guard = guard(Some("s3cret"));
        assert!(guard.is_authorized(Some("s3cret")));
        assert!(!guard.is_authorized(Some("S3CRET")));
        assert!(!guard.is_authorized(Some("s3cret ")));
        assert!(!guard.is_authorized(Some("")));
        assert!(!guard.is_authorized(None));
    }

    #[test]
    fn unset_secret_fails_closed() {
        let guard = guard(None);
        assert!(!guard.has_secret());
        assert!(!guard.is_authorized(None));
        assert!(!guard.is_authorized(Some("")));
        assert!(!guard.is_authorized(Some("anything")));
    }

    #[test]
    fn empty_secret_is_treated_as_unset() {
        let guard = guard(Some(""));
        assert!(!guard.has_secret());
        assert!(!guard.is_authorized(Some("")));
    }

    #[test]
    fn disabled_guard_accepts_everyone() {
        let guard = ApiKeyGuard::from_config(&AuthConfig {
            enabled: false,
            ..Default::default()
        })
        .unwrap();
        assert!(guard.is_authorized(None));
        assert!(guard.is_authorized(Some("whatever")));
    }

    #[test]
    fn header_lookup_is_case_insensitive_on_name() {
        let guard = guard(Some("s3cret"));
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("s3cret"));
        assert!(guard.check_headers(&headers));
    }

    #[test]
    fn custom_header_name() {
        let guard = ApiKeyGuard::from_config(&AuthConfig {
            enabled: true,
            api_key: Some("k".to_string()),
            header_name: "X-Token".to_string(),
        })
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("k"));
        assert!(!guard.check_headers(&headers));
        headers.insert("x-token", HeaderValue::from_static("k"));
        assert!(guard.check_headers(&headers));
    }

    #[test]
    fn invalid_header_name_is_config_error() {
        let err = ApiKeyGuard::from_config(&AuthConfig {
            header_name: "bad header".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Core(comandos_core::Error::Config(_))));
    }

    #[test]
    fn trace_id_from_client_is_sanitized() {
        let long = "a".repeat(500);
        assert_eq!(TraceId::from_client(&long).as_str().len(), MAX_TRACE_ID_LEN);
        assert_eq!(TraceId::from_client("abc\n\tdef").as_str(), "abcdef");
        assert!(!TraceId::from_client("\n").as_str().is_empty());
    }
}

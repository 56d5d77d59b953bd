//! Error type shared by every part of the SDK.
//!
//! All failures surface as a single [`CapitalError`]. The broad category is
//! carried in [`ErrorKind`] and is derived from the HTTP status and the
//! vendor error code at construction time.

use serde::Deserialize;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const AUTH_CODES: [&str; 3] = ["INVALID_CREDENTIALS", "SESSION_EXPIRED", "INVALID_SESSION"];
const RATE_LIMIT_CODE: &str = "RATE_LIMIT_EXCEEDED";
const VALIDATION_CODES: [&str; 2] = ["INVALID_PARAMETERS", "VALIDATION_ERROR"];

/// Broad classification of a [`CapitalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorKind {
    Authentication,
    RateLimit,
    Validation,
    Generic,
}

impl ErrorKind {
    /// Classify from HTTP status and vendor error code.
    ///
    /// Authentication wins over rate limiting, which wins over validation.
    pub fn classify(status: Option<u16>, error_code: Option<&str>) -> ErrorKind {
        let code = error_code.unwrap_or_default();
        if matches!(status, Some(401) | Some(403)) || AUTH_CODES.contains(&code) {
            ErrorKind::Authentication
        } else if status == Some(429) || code == RATE_LIMIT_CODE {
            ErrorKind::RateLimit
        } else if status == Some(400) || VALIDATION_CODES.contains(&code) {
            ErrorKind::Validation
        } else {
            ErrorKind::Generic
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CapitalError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    error_code: Option<String>,
    context: Option<serde_json::Value>,
    #[source]
    source: Option<BoxError>,
}

/// Error body returned by the API on failed requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VendorErrorBody {
    error_code: String,
    message: Option<String>,
}

impl CapitalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CapitalError {
            kind,
            message: message.into(),
            status: None,
            error_code: None,
            context: None,
            source: None,
        }
    }

    /// Build an error for an HTTP response, classifying it from status and code.
    pub fn api(status: u16, message: impl Into<String>, error_code: Option<String>) -> Self {
        let kind = ErrorKind::classify(Some(status), error_code.as_deref());
        CapitalError {
            kind,
            message: message.into(),
            status: Some(status),
            error_code,
            context: None,
            source: None,
        }
    }

    /// Turn a non-2xx response into an error.
    ///
    /// Uses the vendor `{errorCode, message}` body when present, otherwise a
    /// message derived from the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<VendorErrorBody>(body) {
            Ok(vendor) => CapitalError::api(
                status,
                vendor.message.unwrap_or_else(|| "API Error".to_string()),
                Some(vendor.error_code),
            ),
            Err(_) => CapitalError::api(status, status_message(status), None),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        CapitalError::new(ErrorKind::Authentication, message)
    }

    pub fn generic(message: impl Into<String>) -> Self {
        CapitalError::new(ErrorKind::Generic, message)
    }

    /// Raised before any I/O when an operation needs a session and there is none.
    pub fn no_session() -> Self {
        CapitalError::authentication("No valid session. Please login first.")
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the failed response, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Vendor error code such as `INVALID_CREDENTIALS`.
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn context(&self) -> Option<&serde_json::Value> {
        self.context.as_ref()
    }

    pub fn is_authentication_error(&self) -> bool {
        self.kind == ErrorKind::Authentication
    }

    pub fn is_rate_limit_error(&self) -> bool {
        self.kind == ErrorKind::RateLimit
    }

    pub fn is_validation_error(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// Message prefixed with the vendor code and followed by any context.
    pub fn full_message(&self) -> String {
        let mut message = match &self.error_code {
            Some(code) => format!("[{}] {}", code, self.message),
            None => self.message.clone(),
        };
        if let Some(context) = &self.context {
            let rendered = serde_json::to_string_pretty(context).unwrap_or_default();
            message.push_str(&format!("\nContext: {rendered}"));
        }
        message
    }
}

/// Human readable fallback for an HTTP status without a vendor error body.
pub fn status_message(status: u16) -> String {
    match status {
        400 => "Bad Request - Invalid parameters".to_string(),
        401 => "Unauthorized - Invalid credentials or session expired".to_string(),
        403 => "Forbidden - Access denied".to_string(),
        404 => "Not Found - Endpoint or resource not found".to_string(),
        429 => "Rate Limit Exceeded - Too many requests".to_string(),
        500 => "Internal Server Error".to_string(),
        502 => "Bad Gateway".to_string(),
        503 => "Service Unavailable".to_string(),
        other => format!("HTTP Error {other}"),
    }
}

impl From<reqwest::Error> for CapitalError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let mut error = CapitalError::generic(format!("HTTP request failed: {err}"));
        error.status = status;
        error.with_source(err)
    }
}

impl From<serde_json::Error> for CapitalError {
    fn from(err: serde_json::Error) -> Self {
        CapitalError::generic(format!("Parse error: {err}")).with_source(err)
    }
}

impl From<std::io::Error> for CapitalError {
    fn from(err: std::io::Error) -> Self {
        CapitalError::generic(format!("IO error: {err}")).with_source(err)
    }
}

impl From<String> for CapitalError {
    fn from(s: String) -> CapitalError {
        CapitalError::generic(s)
    }
}

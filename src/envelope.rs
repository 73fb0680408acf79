//! Uniform JSON response envelope for API routes.
//!
//! ```json
//! { "success": true,  "data": [...], "count": 3 }
//! { "success": false, "error": "Failed to fetch GIFs from storage", "details": "timeout" }
//! ```
//!
//! Fields that do not apply to a response are omitted rather than sent as
//! `null`. The constructors are the only way to build an envelope, so a
//! success always carries `data` + `count` and a failure always carries
//! `error` + `details`.

use serde::Serialize;

/// Detail sent when the underlying failure has no message of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T> Envelope<T> {
    /// Wrap a collection; `count` is its length.
    pub fn success(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data: Some(data),
            error: None,
            details: None,
        }
    }

    /// A failure with a fixed category and the failure's message as detail.
    ///
    /// An empty message becomes [`UNKNOWN_ERROR`].
    pub fn failure(error: impl Into<String>, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            success: false,
            data: None,
            count: None,
            error: Some(error.into()),
            details: Some(if details.trim().is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                details
            }),
        }
    }

    /// A failure whose detail is the display text of `err`.
    pub fn from_error(error: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self::failure(error, err.to_string())
    }
}

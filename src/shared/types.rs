use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    /// Role of the caller, only present on 403 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    /// Field-level validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            current_role: None,
            details: None,
        }
    }

    pub fn with_current_role(mut self, current_role: Option<String>) -> Self {
        self.current_role = current_role;
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        if !details.is_empty() {
            self.details = Some(details);
        }
        self
    }
}

/// Treat blank query values as absent.
///
/// Browsers submit empty form fields as `?status=&district=`, which must not
/// turn into filters.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//! Response types for the locum calculation API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API, plus the body returned by the location lookup.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Violation};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Every violated input constraint, for validation errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            violations: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response listing every violation.
    pub fn validation_error(violations: Vec<Violation>) -> Self {
        let message = match violations.len() {
            1 => "1 field failed validation".to_string(),
            n => format!("{} fields failed validation", n),
        };
        Self {
            violations,
            ..Self::new("VALIDATION_ERROR", message)
        }
    }

    /// Creates a jurisdiction not found error response.
    pub fn jurisdiction_not_found(code: &str) -> Self {
        Self::with_details(
            "JURISDICTION_NOT_FOUND",
            format!("Jurisdiction not found: {}", code),
            "Only the 50 US state codes are supported",
        )
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::Validation { violations } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(violations),
            },
            EngineError::JurisdictionNotFound { code } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::jurisdiction_not_found(&code),
            },
            EngineError::Computation { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("COMPUTATION_ERROR", "Calculation failed", message),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

/// Body returned by the `/locations/:state` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationResponse {
    /// Upper-case state code.
    pub state: String,
    /// Full state name.
    pub name: String,
    /// City the index was requested for, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Cost-of-living index (100 = national average).
    pub cost_of_living_index: Decimal,
    /// Kind of state income tax: `none`, `flat` or `progressive`.
    pub income_tax: String,
    /// Whether the state withholds disability or paid leave contributions.
    pub has_disability_insurance: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
        assert!(!json.contains("violations"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_validation_error_lists_violations() {
        let error = ApiError::validation_error(vec![
            Violation::new("hourly_rate", "must not be negative"),
            Violation::new("hours_per_week", "must be between 1 and 168"),
        ]);
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.message, "2 fields failed validation");

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["violations"][1]["field"], "hours_per_week");
    }

    #[test]
    fn test_engine_error_status_codes() {
        let not_found: ApiErrorResponse = EngineError::JurisdictionNotFound {
            code: "PR".to_string(),
        }
        .into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.error.code, "JURISDICTION_NOT_FOUND");

        let invalid: ApiErrorResponse =
            EngineError::validation(vec![Violation::new("gross_pay", "must be greater than zero")])
                .into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.error.violations.len(), 1);

        let fault: ApiErrorResponse = EngineError::Computation {
            message: "annualized income overflowed".to_string(),
        }
        .into();
        assert_eq!(fault.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fault.error.details.as_deref(), Some("annualized income overflowed"));
    }
}

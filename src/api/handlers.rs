//! HTTP request handlers for the locum calculation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_contract, calculate_paycheck, compare_contracts};
use crate::error::{EngineError, EngineResult};
use crate::models::{ContractInput, PaycheckInput};

use super::request::{CompareRequest, LocationQuery};
use super::response::{ApiError, ApiErrorResponse, LocationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/contracts/calculate", post(calculate_contract_handler))
        .route("/contracts/compare", post(compare_contracts_handler))
        .route("/paychecks/calculate", post(calculate_paycheck_handler))
        .route("/locations/:state", get(location_handler))
        .with_state(state)
}

/// Handler for POST /contracts/calculate.
async fn calculate_contract_handler(
    State(state): State<AppState>,
    payload: Result<Json<ContractInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing contract calculation request");

    let contract = match payload {
        Ok(Json(contract)) => contract,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = calculate_contract(&contract, state.provider());
    if let Ok(result) = &result {
        info!(
            correlation_id = %correlation_id,
            label = %result.label,
            state = %result.breakdown.taxes.jurisdiction,
            net_pay = %result.totals.net_annual_pay,
            duration_us = start_time.elapsed().as_micros(),
            "Contract calculation completed successfully"
        );
    }
    respond(correlation_id, result)
}

/// Handler for POST /contracts/compare.
async fn compare_contracts_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing comparison request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = compare_contracts(&request.contracts, &request.options(), state.provider());
    if let Ok(result) = &result {
        info!(
            correlation_id = %correlation_id,
            contracts_count = result.contracts.len(),
            best_overall = %result.best.overall.label,
            duration_us = start_time.elapsed().as_micros(),
            "Comparison completed successfully"
        );
    }
    respond(correlation_id, result)
}

/// Handler for POST /paychecks/calculate.
async fn calculate_paycheck_handler(
    State(state): State<AppState>,
    payload: Result<Json<PaycheckInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing paycheck calculation request");

    let paycheck = match payload {
        Ok(Json(paycheck)) => paycheck,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = calculate_paycheck(&paycheck, state.provider());
    if let Ok(result) = &result {
        info!(
            correlation_id = %correlation_id,
            withholding_state = %result.withholding_state,
            net_pay = %result.current.net_pay,
            duration_us = start_time.elapsed().as_micros(),
            "Paycheck calculation completed successfully"
        );
    }
    respond(correlation_id, result)
}

/// Handler for GET /locations/:state.
async fn location_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<LocationQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, state = %code, "Processing location request");

    respond(correlation_id, lookup_location(&state, &code, query.city))
}

fn lookup_location(
    state: &AppState,
    code: &str,
    city: Option<String>,
) -> EngineResult<LocationResponse> {
    let provider = state.provider();
    let tables = provider.tax_tables(code)?;
    let cost_of_living_index = provider.cost_of_living_index(code, city.as_deref())?;

    Ok(LocationResponse {
        state: tables.state_code,
        name: tables.state.name,
        city,
        cost_of_living_index,
        income_tax: tables.state.income_tax.kind().to_string(),
        has_disability_insurance: tables.state.disability.is_some(),
    })
}

/// Serializes a result, or maps the error to its API status and body.
fn respond<T: Serialize>(correlation_id: Uuid, result: EngineResult<T>) -> Response {
    match result {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(body),
        )
            .into_response(),
        Err(err) => {
            log_failure(correlation_id, &err);
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn log_failure(correlation_id: Uuid, err: &EngineError) {
    match err {
        EngineError::Validation { violations } => warn!(
            correlation_id = %correlation_id,
            violations_count = violations.len(),
            error = %err,
            "Input rejected"
        ),
        _ => warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Calculation failed"
        ),
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let (status, error) = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                (StatusCode::BAD_REQUEST, ApiError::new("VALIDATION_ERROR", body_text))
            } else {
                (StatusCode::BAD_REQUEST, ApiError::malformed_json(body_text))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            (
                StatusCode::BAD_REQUEST,
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err)),
            )
        }
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json"),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            ApiError::malformed_json("Failed to parse request body"),
        ),
    };

    ApiErrorResponse { status, error }.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{ComparisonResult, ContractCalculationResult};
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/us_2025").expect("Failed to load config");
        AppState::new(config)
    }

    fn contract_json(name: &str, state: &str, rate: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "specialty": "Emergency Medicine",
            "location": { "state": state },
            "contract_type": "locum_tenens",
            "start_date": "2025-01-06",
            "end_date": "2025-04-07",
            "hourly_rate": rate,
            "hours_per_week": "40"
        })
    }

    async fn post_json(uri: &str, body: String) -> Response {
        create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_calculate_contract_returns_200() {
        let response = post_json(
            "/contracts/calculate",
            contract_json("Boston ER", "MA", "100").to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: ContractCalculationResult =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.label, "Boston ER");
        assert_eq!(result.totals.gross_annual_pay, Decimal::from(52_000));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = post_json("/contracts/calculate", "{invalid json".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let mut body = contract_json("A", "TX", "100");
        body.as_object_mut().unwrap().remove("hourly_rate");

        let response = post_json("/contracts/calculate", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("hourly_rate"));
    }

    #[tokio::test]
    async fn test_compare_returns_200() {
        let body = serde_json::json!({
            "contracts": [contract_json("A", "TX", "120"), contract_json("B", "CA", "120")],
            "adjust_for_cost_of_living": true
        });
        let response = post_json("/contracts/compare", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let result: ComparisonResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.contracts.len(), 2);
        assert!(result.adjusted_for_cost_of_living);
        assert_eq!(result.best.net_pay.label, "A");
    }

    #[tokio::test]
    async fn test_location_lookup() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .uri("/locations/tx?city=Austin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let location: LocationResponse =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(location.state, "TX");
        assert_eq!(location.name, "Texas");
        assert_eq!(location.cost_of_living_index, Decimal::from(104));
        assert_eq!(location.income_tax, "none");
    }

    #[tokio::test]
    async fn test_location_unknown_state_returns_404() {
        let response = create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .uri("/locations/PR")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "JURISDICTION_NOT_FOUND");
    }
}

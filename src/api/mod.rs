//! HTTP API module for the locum calculation engine.
//!
//! A thin JSON boundary over the contract, paycheck and comparison engines.
//! Handlers deserialize inputs, call the engines, and translate
//! [`EngineError`](crate::error::EngineError)s into status codes and error
//! bodies.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CompareRequest, LocationQuery};
pub use response::{ApiError, ApiErrorResponse, LocationResponse};
pub use state::AppState;

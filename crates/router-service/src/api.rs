//! HTTP API for the router engine.
//!
//! Read-only and quoting endpoints consumed by the Executor. Governance
//! stays off the HTTP surface; mutations go through the engine's
//! credential-gated API only.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use router_core::RouterEngine;
use router_types::{CompletePlan, ContinuationPlan, ExecutionStep, QuoteAndExecution, RouterError};

#[derive(Clone)]
struct AppState {
	engine: Arc<RouterEngine>,
}

pub async fn start_http_server(engine: Arc<RouterEngine>, port: u16) -> anyhow::Result<()> {
	let state = AppState { engine };

	let app = Router::new()
		.route("/health", get(health))
		.route("/route/{asset_in}/{asset_out}", get(get_route))
		.route("/quote", post(quote))
		.route("/plan", post(plan))
		.route("/plan/multi-step", post(multi_step_plan))
		.route("/plan/next", post(next_step))
		.route("/validate/swap", post(validate_swap))
		.route("/validate/route", post(validate_route))
		.route("/custom-call", post(custom_call))
		.with_state(state)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive());

	let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

	info!("API server listening on port {}", port);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Error envelope; every engine failure maps to a status and a reason.
struct ApiError(RouterError);

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = match &self.0 {
			RouterError::Unauthorized(_) => StatusCode::FORBIDDEN,
			RouterError::NoRouteFound(_, _) => StatusCode::NOT_FOUND,
			RouterError::EnginePaused
			| RouterError::PoolPaused(_)
			| RouterError::AdapterKindPaused => StatusCode::SERVICE_UNAVAILABLE,
			_ => StatusCode::BAD_REQUEST,
		};
		let body = Json(serde_json::json!({
			"error": self.0.to_string(),
			"timestamp": chrono::Utc::now().timestamp(),
		}));
		(status, body).into_response()
	}
}

impl From<RouterError> for ApiError {
	fn from(err: RouterError) -> Self {
		Self(err)
	}
}

async fn health() -> Json<serde_json::Value> {
	Json(serde_json::json!({
		"status": "ok",
		"timestamp": chrono::Utc::now().timestamp(),
	}))
}

#[derive(Serialize)]
struct RouteInfo {
	found: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	route_type: Option<router_types::RouteType>,
	#[serde(skip_serializing_if = "Option::is_none")]
	hops: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	gas_estimate: Option<u64>,
}

async fn get_route(
	State(state): State<AppState>,
	Path((asset_in, asset_out)): Path<(Address, Address)>,
) -> Json<RouteInfo> {
	match state.engine.find_path(asset_in, asset_out) {
		Ok(strategy) => Json(RouteInfo {
			found: true,
			route_type: Some(strategy.route_type),
			hops: Some(strategy.hops.len()),
			gas_estimate: Some(strategy.gas_estimate),
		}),
		Err(_) => Json(RouteInfo {
			found: false,
			route_type: None,
			hops: None,
			gas_estimate: None,
		}),
	}
}

#[derive(Deserialize)]
struct SwapRequest {
	asset_in: Address,
	asset_out: Address,
	amount_in: U256,
	recipient: Address,
}

async fn quote(
	State(state): State<AppState>,
	Json(request): Json<SwapRequest>,
) -> Result<Json<QuoteAndExecution>, ApiError> {
	let result = state
		.engine
		.quote_and_execution_data(
			request.asset_in,
			request.asset_out,
			request.amount_in,
			request.recipient,
		)
		.await?;
	Ok(Json(result))
}

async fn plan(
	State(state): State<AppState>,
	Json(request): Json<SwapRequest>,
) -> Result<Json<CompletePlan>, ApiError> {
	let result = state
		.engine
		.complete_execution_plan(
			request.asset_in,
			request.asset_out,
			request.amount_in,
			request.recipient,
		)
		.await?;
	Ok(Json(result))
}

async fn multi_step_plan(
	State(state): State<AppState>,
	Json(request): Json<SwapRequest>,
) -> Result<Json<CompletePlan>, ApiError> {
	let result = state
		.engine
		.complete_multi_step_plan(
			request.asset_in,
			request.asset_out,
			request.amount_in,
			request.recipient,
		)
		.await?;
	Ok(Json(result))
}

#[derive(Deserialize)]
struct NextStepRequest {
	plan: ContinuationPlan,
	realized_amount: U256,
}

#[derive(Serialize)]
struct NextStepResponse {
	step: ExecutionStep,
	plan: ContinuationPlan,
}

async fn next_step(
	State(state): State<AppState>,
	Json(request): Json<NextStepRequest>,
) -> Result<Json<NextStepResponse>, ApiError> {
	let (step, plan) = state
		.engine
		.next_step_execution_data(&request.plan, request.realized_amount)
		.await?;
	Ok(Json(NextStepResponse { step, plan }))
}

#[derive(Deserialize)]
struct ValidateSwapRequest {
	asset_in: Address,
	asset_out: Address,
	amount_in: U256,
}

#[derive(Serialize)]
struct ValidationResult {
	valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	reason: Option<String>,
}

async fn validate_swap(
	State(state): State<AppState>,
	Json(request): Json<ValidateSwapRequest>,
) -> Json<ValidationResult> {
	match state
		.engine
		.validate_swap_execution(request.asset_in, request.asset_out, request.amount_in)
	{
		Ok(_) => Json(ValidationResult {
			valid: true,
			reason: None,
		}),
		Err(err) => Json(ValidationResult {
			valid: false,
			reason: Some(err.to_string()),
		}),
	}
}

#[derive(Deserialize)]
struct ValidateRouteRequest {
	asset_in: Address,
	asset_out: Address,
	#[serde(flatten)]
	config: router_types::RouteConfig,
}

async fn validate_route(
	State(state): State<AppState>,
	Json(request): Json<ValidateRouteRequest>,
) -> Json<ValidationResult> {
	match state.engine.validate_route_configuration(
		request.asset_in,
		request.asset_out,
		&request.config,
	) {
		Ok(()) => Json(ValidationResult {
			valid: true,
			reason: None,
		}),
		Err(err) => Json(ValidationResult {
			valid: false,
			reason: Some(err.to_string()),
		}),
	}
}

#[derive(Deserialize)]
struct CustomCallRequest {
	venue: Address,
	payload: Bytes,
}

async fn custom_call(
	State(state): State<AppState>,
	Json(request): Json<CustomCallRequest>,
) -> Result<Json<router_core::CustomCallApproval>, ApiError> {
	let approval = state
		.engine
		.custom_dex_execution_data(request.venue, &request.payload)?;
	Ok(Json(approval))
}

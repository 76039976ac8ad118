use axum::{
	Json, Router,
	extract::{Request, State},
	http::{StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use hotline_service::{Error as ServiceError, TurnRequest, TurnResult};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let api = Router::new()
		.route("/v1/context", post(context))
		.route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

	Router::new().route("/health", get(health)).merge(api).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn context(
	State(state): State<AppState>,
	Json(payload): Json<TurnRequest>,
) -> Result<Json<TurnResult>, ApiError> {
	let response = state.service.process_turn(payload).await?;

	Ok(Json(response))
}

async fn require_bearer(
	State(state): State<AppState>,
	req: Request,
	next: Next,
) -> Result<Response, ApiError> {
	if let Some(expected) = state.auth_token.as_deref() {
		let provided = req
			.headers()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Bearer "));

		if provided != Some(expected) {
			return Err(json_error(
				StatusCode::UNAUTHORIZED,
				"UNAUTHORIZED",
				"Missing or invalid bearer token.",
				None,
			));
		}
	}

	Ok(next.run(req).await)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message, field } => json_error(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				message,
				Some(vec![field.to_string()]),
			),
			ServiceError::Classification { message } => {
				tracing::error!(error = %message, "Turn classification failed.");

				json_error(
					StatusCode::BAD_GATEWAY,
					"CLASSIFICATION_FAILED",
					"Could not classify the caller's intent.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

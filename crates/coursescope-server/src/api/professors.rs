use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use coursescope_ratings::{ProfileQuery, ProfileResult, RatingsError};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{query_params, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ProfessorParams {
    pub name: Option<String>,
    #[serde(default)]
    pub include_all: bool,
}

pub(super) fn map_ratings_error(request_id: String, error: &RatingsError) -> ApiError {
    match error {
        RatingsError::InvalidInput(message) => {
            ApiError::new(request_id, "bad_request", message.clone())
        }
        RatingsError::Timeout(_) => {
            tracing::warn!(error = %error, "profile lookup timed out");
            ApiError::new(request_id, "upstream_timeout", "profile lookup timed out")
        }
        RatingsError::Http(_) | RatingsError::HttpStatus { .. } => {
            tracing::error!(error = %error, "profile lookup failed");
            ApiError::new(request_id, "upstream_error", "profile lookup failed")
        }
    }
}

pub(super) async fn lookup_professor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<ProfessorParams>, QueryRejection>,
) -> Result<Json<ApiResponse<ProfileResult>>, ApiError> {
    let params = query_params(&req_id.0, params)?;
    let query = ProfileQuery {
        name: params.name.unwrap_or_default(),
        include_all_institutions: params.include_all,
    };
    let data = state
        .profiles
        .lookup(&query)
        .await
        .map_err(|e| map_ratings_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use coursescope_discussion::{Digest, DiscussionError, DiscussionQuery, DiscussionResponse};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{query_params, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Default, Deserialize)]
pub(super) struct DiscussionParams {
    pub topic: Option<String>,
    pub question: Option<String>,
    pub window_days: Option<u32>,
    pub limit: Option<usize>,
}

impl DiscussionParams {
    fn into_query(self, course_id: String) -> DiscussionQuery {
        DiscussionQuery {
            course_id,
            topic: self.topic,
            question: self.question,
            window_days: self.window_days,
            limit: self.limit,
        }
    }
}

pub(super) fn map_discussion_error(request_id: String, error: &DiscussionError) -> ApiError {
    match error {
        DiscussionError::InvalidInput(message) => {
            ApiError::new(request_id, "bad_request", message.clone())
        }
        DiscussionError::Timeout(_) => {
            tracing::warn!(error = %error, "discussion search timed out");
            ApiError::new(request_id, "upstream_timeout", "discussion search timed out")
        }
        DiscussionError::RateLimited { .. } => {
            ApiError::new(request_id, "rate_limited", error.to_string())
        }
        DiscussionError::Http(_) | DiscussionError::Reddit(_) => {
            tracing::error!(error = %error, "discussion search failed");
            ApiError::new(request_id, "upstream_error", "discussion search failed")
        }
    }
}

pub(super) async fn list_discussions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(course_id): Path<String>,
    params: Result<Query<DiscussionParams>, QueryRejection>,
) -> Result<Json<ApiResponse<DiscussionResponse>>, ApiError> {
    let query = query_params(&req_id.0, params)?.into_query(course_id);
    let data = state
        .discussions
        .query(&query)
        .await
        .map_err(|e| map_discussion_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_digest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(course_id): Path<String>,
    params: Result<Query<DiscussionParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Digest>>, ApiError> {
    let query = query_params(&req_id.0, params)?.into_query(course_id);
    let data = state
        .discussions
        .digest(&query)
        .await
        .map_err(|e| map_discussion_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

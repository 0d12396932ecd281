//! Axum handlers for access and purchase endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{
    AccessResponse, PurchaseOptionsParams, PurchaseOptionsResponse, PurchaseResponse,
    RecordPurchaseRequest,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireUser;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CheckAccessQuery, ListPurchaseOptionsQuery, RecordPurchaseCommand,
};
use crate::domain::foundation::VideoId;

/// GET /api/videos/:id/access
pub async fn check_access(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let video_id: VideoId = id.parse()?;
    let result = state
        .check_access_handler()
        .handle(CheckAccessQuery { video_id, user_id })
        .await?;
    Ok(Json(AccessResponse::from(result)))
}

/// GET /api/videos/:id/purchase-options
pub async fn list_purchase_options(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(id): Path<String>,
    Query(params): Query<PurchaseOptionsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let video_id: VideoId = id.parse()?;
    let result = state
        .purchase_options_handler()
        .handle(ListPurchaseOptionsQuery {
            video_id,
            user_id,
            simplified: params.simplified,
        })
        .await?;
    Ok(Json(PurchaseOptionsResponse {
        purchase_options: result.options,
    }))
}

/// POST /api/purchases
pub async fn record_purchase(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(req): Json<RecordPurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RecordPurchaseCommand {
        user_id,
        kind: req.kind,
        name: req.name,
        price_id: req.price_id,
        video_id: req.video_id,
        simplified: req.simplified,
    };

    let result = state.record_purchase_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(PurchaseResponse::from(result))))
}

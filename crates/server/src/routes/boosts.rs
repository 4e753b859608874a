use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use service::auth::Identity;
use service::boosts::domain::{BoostConfirmation, BoostOrder};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::{JsonBody, PathParam};
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub payment_reference: String,
}

#[utoipa::path(post, path = "/api/services/{id}/boost", tag = "boosts", params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 201, description = "Order created for checkout"), (status = 403, description = "Not the owner")))]
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(service_id), _): PathParam<Uuid>,
) -> Result<(StatusCode, Json<BoostOrder>), JsonApiError> {
    let order = state.market.boosts.create_order(&identity, service_id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(post, path = "/api/boosts/{id}/confirm", tag = "boosts", params(("id" = Uuid, Path, description = "Boost order id")),
    request_body = crate::openapi::ConfirmRequestDoc,
    responses((status = 200, description = "Order paid, listing featured")))]
pub async fn confirm(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(order_id), _): PathParam<Uuid>,
    WithRejection(Json(input), _): JsonBody<ConfirmRequest>,
) -> Result<Json<BoostConfirmation>, JsonApiError> {
    Ok(Json(state.market.boosts.confirm(&identity, order_id, &input.payment_reference).await?))
}

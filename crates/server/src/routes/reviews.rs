use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use service::auth::Identity;
use service::reviews::domain::{NewReview, Review, ReviewOutcome};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::{JsonBody, PathParam};
use crate::state::ServerState;

#[utoipa::path(post, path = "/api/bookings/{id}/review", tag = "reviews", params(("id" = Uuid, Path, description = "Booking id")),
    request_body = crate::openapi::NewReviewDoc,
    responses((status = 201, description = "Review stored, aggregate updated"), (status = 409, description = "Not completed or already reviewed")))]
pub async fn submit_review(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(booking_id), _): PathParam<Uuid>,
    WithRejection(Json(input), _): JsonBody<NewReview>,
) -> Result<(StatusCode, Json<ReviewOutcome>), JsonApiError> {
    let outcome = state.market.reviews.submit_review(&identity, booking_id, input).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[utoipa::path(get, path = "/api/services/{id}/reviews", tag = "reviews", params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "Newest first")))]
pub async fn list_reviews(
    State(state): State<ServerState>,
    WithRejection(Path(service_id), _): PathParam<Uuid>,
) -> Result<Json<Vec<Review>>, JsonApiError> {
    Ok(Json(state.market.reviews.list_reviews(service_id).await?))
}

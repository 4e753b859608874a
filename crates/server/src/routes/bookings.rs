use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use models::booking::BookingStatus;
use serde::Deserialize;
use service::auth::Identity;
use service::bookings::domain::{Booking, NewBooking};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::{JsonBody, PathParam};
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: BookingStatus,
}

#[utoipa::path(post, path = "/api/bookings", tag = "bookings", request_body = crate::openapi::NewBookingDoc,
    responses((status = 201, description = "Booking requested", body = crate::openapi::BookingDoc), (status = 403, description = "Not a customer"), (status = 404, description = "No such service")))]
pub async fn create_booking(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(input), _): JsonBody<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), JsonApiError> {
    let booking = state.market.bookings.create_booking(&identity, input).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(get, path = "/api/bookings", tag = "bookings",
    responses((status = 200, description = "Caller's bookings, newest first", body = [crate::openapi::BookingDoc])))]
pub async fn list_bookings(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Booking>>, JsonApiError> {
    Ok(Json(state.market.bookings.list_bookings(&identity).await?))
}

#[utoipa::path(patch, path = "/api/bookings/{id}/status", tag = "bookings", params(("id" = Uuid, Path, description = "Booking id")),
    request_body = crate::openapi::StatusChangeDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::BookingDoc), (status = 403, description = "Not allowed"), (status = 409, description = "Invalid transition")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Path(id), _): PathParam<Uuid>,
    WithRejection(Json(change), _): JsonBody<StatusChange>,
) -> Result<Json<Booking>, JsonApiError> {
    Ok(Json(state.market.bookings.update_status(&identity, id, change.status).await?))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use models::user_profile::Role;
use serde::Deserialize;
use service::auth::Identity;
use service::users::domain::{ProfileUpdate, ProviderProfile, UserProfile};

use crate::errors::JsonApiError;
use crate::extract::{JsonBody, PathParam};
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub role: Role,
}

#[utoipa::path(post, path = "/api/me", tag = "users", request_body = crate::openapi::RegisterRequestDoc,
    responses((status = 201, description = "Profile created", body = crate::openapi::UserProfileDoc), (status = 409, description = "Already registered")))]
pub async fn register(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(input), _): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), JsonApiError> {
    let profile = state.market.users.register_profile(&identity, input.role).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(get, path = "/api/me", tag = "users",
    responses((status = 200, description = "Caller's profile", body = crate::openapi::UserProfileDoc), (status = 404, description = "Not registered yet")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserProfile>, JsonApiError> {
    Ok(Json(state.market.users.get_profile(&identity.uid).await?))
}

#[utoipa::path(put, path = "/api/me/profile", tag = "users", request_body = crate::openapi::ProfileUpdateDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::UserProfileDoc), (status = 400, description = "Bad Request")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(input), _): JsonBody<ProfileUpdate>,
) -> Result<Json<UserProfile>, JsonApiError> {
    Ok(Json(state.market.users.update_profile(&identity.uid, input).await?))
}

#[utoipa::path(get, path = "/api/providers/{uid}", tag = "users", params(("uid" = String, Path, description = "Provider uid")),
    responses((status = 200, description = "Public provider page"), (status = 404, description = "Unknown provider")))]
pub async fn provider_page(
    State(state): State<ServerState>,
    WithRejection(Path(uid), _): PathParam<String>,
) -> Result<Json<ProviderProfile>, JsonApiError> {
    Ok(Json(state.market.users.provider_profile(&uid).await?))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use models::service_listing::Category;
use serde::{Deserialize, Serialize};
use service::auth::Identity;
use service::listings::domain::{ListingFilter, NewListing, ServiceListing};
use service::pagination::Pagination;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::state::ServerState;

/// Listing as returned over HTTP, with the derived `featured` flag.
#[derive(Debug, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: ServiceListing,
    pub featured: bool,
}

impl From<ServiceListing> for ListingView {
    fn from(listing: ServiceListing) -> Self {
        let featured = listing.is_featured(Utc::now());
        Self { listing, featured }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub location: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SearchQuery {
    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

#[utoipa::path(get, path = "/api/services", tag = "services",
    params(
        ("category" = Option<String>, Query, description = "Category name or `All`"),
        ("q" = Option<String>, Query, description = "Keyword in title, description or category"),
        ("location" = Option<String>, Query, description = "Substring of the location"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Featured first, then newest", body = [crate::openapi::ListingDoc]), (status = 400, description = "Unknown category")))]
pub async fn search(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): QueryParams<SearchQuery>,
) -> Result<Json<Vec<ListingView>>, JsonApiError> {
    let category = Category::parse_filter(query.category.as_deref()).map_err(service::errors::ServiceError::from)?;
    let filter = ListingFilter::new(category, query.q.as_deref(), query.location.as_deref());
    let found = state.market.listings.search_listings(&filter, query.pagination()).await?;
    Ok(Json(found.into_iter().map(ListingView::from).collect()))
}

#[utoipa::path(post, path = "/api/services", tag = "services", request_body = crate::openapi::NewListingDoc,
    responses((status = 201, description = "Created", body = crate::openapi::ListingDoc), (status = 400, description = "Bad Request"), (status = 403, description = "Not a provider")))]
pub async fn create_listing(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(input), _): JsonBody<NewListing>,
) -> Result<(StatusCode, Json<ListingView>), JsonApiError> {
    let listing = state.market.listings.create_listing(&identity, input).await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "OK", body = crate::openapi::ListingDoc), (status = 404, description = "No such service")))]
pub async fn get_listing(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): PathParam<Uuid>,
) -> Result<Json<ListingView>, JsonApiError> {
    Ok(Json(state.market.listings.get_listing(id).await?.into()))
}

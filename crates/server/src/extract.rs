//! Extractors whose rejections render as [`JsonApiError`] instead of
//! axum's plain-text bodies.
use axum::extract::{Path, Query};
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::errors::JsonApiError;

pub type JsonBody<T> = WithRejection<Json<T>, JsonApiError>;
pub type PathParam<T> = WithRejection<Path<T>, JsonApiError>;
pub type QueryParams<T> = WithRejection<Query<T>, JsonApiError>;

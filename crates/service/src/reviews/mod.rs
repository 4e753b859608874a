//! Reviews and the per-listing rating aggregate.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ReviewService;

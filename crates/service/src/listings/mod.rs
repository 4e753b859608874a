//! Services catalogue: creation, lookup and filtered browsing.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ListingService;

//! Paid promotion of listings.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::BoostService;

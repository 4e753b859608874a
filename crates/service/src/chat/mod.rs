//! Per-booking chat between customer and provider.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ChatService;

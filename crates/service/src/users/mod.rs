//! Profiles: role registration, profile edits and the provider public page.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::UserService;

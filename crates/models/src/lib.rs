//! SeaORM entities for the marketplace tables plus the field-level
//! validation shared by every storage backend.

pub mod errors;
pub mod db;
pub mod rating;
pub mod user_profile;
pub mod service_listing;
pub mod booking;
pub mod review;
pub mod chat_message;
pub mod boost_order;

//! Service layer for the local-services marketplace.
//! - Business rules live here; persistence sits behind repository traits.
//! - `repo::seaorm` backs the traits with PostgreSQL, `repo::memory` keeps
//!   everything in process for development and tests.
//! - `realtime` fans out booking, chat and review events to subscribers.

pub mod errors;
pub mod pagination;
pub mod auth;
pub mod realtime;
pub mod repo;
pub mod users;
pub mod listings;
pub mod bookings;
pub mod reviews;
pub mod chat;
pub mod boosts;
pub mod marketplace;
#[cfg(test)]
pub mod test_support;

pub use marketplace::{Marketplace, MarketplaceSettings};

//! Storage backends implementing every repository trait.

pub mod memory;
pub mod seaorm;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::bookings::repository::BookingRepository;
use crate::boosts::repository::BoostRepository;
use crate::chat::repository::ChatRepository;
use crate::listings::repository::ListingRepository;
use crate::reviews::repository::ReviewRepository;
use crate::users::repository::UserRepository;

pub use memory::InMemoryRepository;
pub use seaorm::SeaOrmRepository;

/// One handle per aggregate, all pointing at the same backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub chat: Arc<dyn ChatRepository>,
    pub boosts: Arc<dyn BoostRepository>,
}

impl Repositories {
    pub fn from_backend<R>(backend: Arc<R>) -> Self
    where
        R: UserRepository
            + ListingRepository
            + BookingRepository
            + ReviewRepository
            + ChatRepository
            + BoostRepository
            + 'static,
    {
        Self {
            users: backend.clone(),
            listings: backend.clone(),
            bookings: backend.clone(),
            reviews: backend.clone(),
            chat: backend.clone(),
            boosts: backend,
        }
    }

    pub fn in_memory() -> Self { Self::from_backend(Arc::new(InMemoryRepository::default())) }

    pub fn seaorm(db: DatabaseConnection) -> Self { Self::from_backend(Arc::new(SeaOrmRepository::new(db))) }
}

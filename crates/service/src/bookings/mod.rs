//! Bookings and their status machine.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::BookingService;

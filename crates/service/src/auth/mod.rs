//! Identity module: verification of tokens issued by the hosted identity
//! provider. Sign-up, sign-in and sessions live with the provider; this crate
//! only checks signatures and expiry.

pub mod token;

pub use token::{Claims, Identity, TokenVerifier};

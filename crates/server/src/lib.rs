pub mod state;
pub mod auth;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod openapi;
pub mod startup;

pub use startup::run;
pub use state::ServerState;

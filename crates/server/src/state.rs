use std::sync::Arc;

use service::auth::TokenVerifier;
use service::Marketplace;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub market: Arc<Marketplace>,
    pub tokens: Arc<TokenVerifier>,
}

impl ServerState {
    pub fn new(market: Marketplace, tokens: TokenVerifier) -> Self {
        Self { market: Arc::new(market), tokens: Arc::new(tokens) }
    }
}

use std::sync::Arc;

use digibank_core::DigibankContext;

use super::auth::TokenIssuer;
use super::error::AppResult;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<DigibankContext>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(ctx: DigibankContext, tokens: TokenIssuer) -> Self {
        Self {
            ctx: Arc::new(ctx),
            tokens: Arc::new(tokens),
        }
    }

    /// Run a core call on the blocking pool; storage and hashing both block
    pub async fn blocking<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&DigibankContext) -> digibank_core::domain::result::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ctx = Arc::clone(&self.ctx);
        let result = tokio::task::spawn_blocking(move || f(&ctx)).await?;
        Ok(result?)
    }
}

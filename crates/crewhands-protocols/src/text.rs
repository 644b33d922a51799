//! Text generation protocol.

use async_trait::async_trait;

use crate::error::GenerateError;

/// External generative text service, used for cover-letter bodies.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

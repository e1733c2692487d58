use async_trait::async_trait;
use crate::config::*;
use crate::error::Result;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Chat completion; a non-success upstream status is an error
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

use crate::{core::GenerationRequest, error::Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A provider capable of answering a [`GenerationRequest`] with one forced
/// tool call.
///
/// `send` returns the raw `arguments` text of that tool call. Implementations
/// map HTTP and network failures onto [`GenerationError`](crate::GenerationError)
/// and never retry on their own.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(&self, request: &GenerationRequest) -> Result<String>;
}

#[async_trait]
impl<T: CompletionTransport + ?Sized> CompletionTransport for Arc<T> {
    async fn send(&self, request: &GenerationRequest) -> Result<String> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: CompletionTransport + ?Sized> CompletionTransport for Box<T> {
    async fn send(&self, request: &GenerationRequest) -> Result<String> {
        (**self).send(request).await
    }
}

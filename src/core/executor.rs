//! Work executed by the schedule queue.

use std::future::Future;

use async_trait::async_trait;

use super::EngineError;

/// A unit of work run by the schedule queue.
///
/// `run` may be called several times when earlier attempts failed and the
/// task still has retries left, so it must be safe to repeat.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use timetable_engine::core::{EngineError, QueueTask};
///
/// struct Ping;
///
/// #[async_trait]
/// impl QueueTask for Ping {
///     type Output = &'static str;
///
///     async fn run(&self) -> Result<Self::Output, EngineError> {
///         Ok("pong")
///     }
/// }
/// ```
#[async_trait]
pub trait QueueTask: Send + Sync + 'static {
    /// Value delivered to the caller on success.
    type Output: Send + 'static;

    /// Run one attempt.
    async fn run(&self) -> Result<Self::Output, EngineError>;
}

/// Adapter turning an async closure into a [`QueueTask`].
pub struct FnTask<F>(F);

impl<F> FnTask<F> {
    /// Wrap `f`; it is called once per attempt.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut, T> QueueTask for FnTask<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, EngineError>> + Send + 'static,
    T: Send + 'static,
{
    type Output = T;

    async fn run(&self) -> Result<T, EngineError> {
        (self.0)().await
    }
}

//! Seisrelay Publish - Retrying HTTP Delivery
//!
//! Builds and sends the POST request carrying a converted payload to the
//! HTTP sink, classifying response codes as success or retryable failure
//! and driving retries through the backoff executor in [`retry`].

pub mod publisher;
pub mod retry;

// Re-exports for convenience
pub use publisher::{HttpPublisher, PublishError, Result};
pub use retry::{retry_with_backoff, RetryPolicy};

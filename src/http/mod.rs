//! HTTP client layer — `DashboardHttp` with opt-in retry policies.

pub mod client;
pub mod retry;

pub use client::DashboardHttp;
pub use retry::{RetryConfig, RetryPolicy};

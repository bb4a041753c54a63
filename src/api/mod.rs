//! HTTP client for the prompt backend's REST endpoints.

mod client;
mod wire;

pub use client::ApiClient;

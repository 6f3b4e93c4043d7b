//! Client layer for the upstream analytics API.
//!
//! Every tool call resolves to exactly one `GET` against a fixed set of
//! endpoints. The [`AnalyticsApi`] trait is the seam between the tools domain
//! and the network, so tool dispatch can be exercised without a live server.

mod client;
pub mod endpoints;
mod error;

pub use client::{AnalyticsApi, ApiClient, API_KEY_HEADER};
pub use error::{ApiError, ApiResult};

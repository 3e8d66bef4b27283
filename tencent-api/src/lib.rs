//! # Tencent Cloud API client
//!
//! A small typed client for the Tencent Cloud JSON API, covering the three
//! actions the exporter needs:
//!
//! - **`cbs::DescribeDisks`**: paginated block-storage disk inventory
//! - **`es::DescribeInstances`**: managed-search instance inventory
//! - **`cdn::DescribeCdnData`**: summarized CDN statistics for one domain,
//!   metric and time window
//!
//! Requests are signed with TC3-HMAC-SHA256 and POSTed to the per-service
//! endpoint (`https://{service}.tencentcloudapi.com/`). Responses arrive in a
//! `{"Response": ...}` envelope; a structured `Response.Error` is surfaced as
//! [`ApiError::Api`] so callers can tell provider-side errors apart from
//! transport failures.

pub mod cbs;
pub mod cdn;
pub mod client;
pub mod credential;
pub mod error;
pub mod es;
mod sign;

pub use client::{
    ApiClient,
    ApiRequest,
};
pub use credential::Credential;
pub use error::ApiError;

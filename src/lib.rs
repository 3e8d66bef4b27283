//! # Tencent Cloud Info Exporter
//!
//! A Prometheus exporter that polls the Tencent Cloud API for resource
//! inventories and CDN traffic statistics and republishes them as gauges:
//!
//! - **CBS disks**: one constant gauge per disk, labeled with id, name,
//!   type and state (paginated listing)
//! - **ES instances**: one constant gauge per managed-search instance
//! - **CDN ratios**: per configured domain and metric, the summarized value
//!   as a fraction of the domain's request count for the same instant
//!   (`tc_info_cdn_http_status_rate{domain, provider, status}`)
//!
//! ## Architecture
//!
//! - **`config`**: YAML exporter configuration (metrics, rate limit, delay,
//!   query dimensions)
//! - **`metrics`**: the sample sink contract between collectors and the
//!   exposition layer
//! - **`collectors`**: the `Collector` trait, one implementation per
//!   resource type, and the composite `Registry` that renders text
//!   exposition format
//! - **`ratelimit`**: the shared token bucket bounding concurrent CDN calls
//! - **`server`**: axum router serving `/metrics` and a landing page

pub mod collectors;
pub mod config;
pub mod metrics;
pub mod ratelimit;
pub mod server;

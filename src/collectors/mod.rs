//! # Collectors
//!
//! One collector per resource type, all implementing the two-operation
//! [`Collector`] capability (describe metric shapes, collect samples), and
//! the composite [`Registry`] that runs them per scrape and renders text
//! exposition format.
//!
//! Collectors never abort the process: recognized upstream API errors skip
//! the affected domain or pair, and anything else marks only that
//! collector's scrape as failed (visible via `tc_info_collector_success`).

pub mod cbs;
pub mod cdn;
pub mod collector;
pub mod es;
pub mod registry;

pub use cbs::CbsCollector;
pub use cdn::CdnCollector;
pub use collector::Collector;
pub use es::EsCollector;
pub use registry::Registry;

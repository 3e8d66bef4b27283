use crate::metrics::{
    MetricDesc,
    SampleSink,
};
use eyre::Result;
use std::{
    future::Future,
    pin::Pin,
};

/// Trait for collecting gauge samples from one resource type.
pub trait Collector: Send + Sync {
    /// Short name used for logging and the per-collector status gauges.
    fn name(&self) -> &'static str;

    /// The fixed set of gauge families this collector can emit.
    fn describe(&self) -> Vec<MetricDesc>;

    /// Run one collection cycle, writing samples into the sink.
    fn collect(&self, sink: SampleSink) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

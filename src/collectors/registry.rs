use crate::{
    collectors::Collector,
    metrics::{
        MetricDesc,
        Sample,
        SampleSink,
    },
};
use eyre::Result;
use prometheus::{
    Encoder,
    Gauge,
    GaugeVec,
    Opts,
    TextEncoder,
};
use std::{
    collections::{
        hash_map::Entry,
        HashMap,
    },
    time::Instant,
};
use tracing::{
    debug,
    error,
};

/// Composite registry over all enabled collectors.
///
/// A scrape runs the collectors sequentially, drains their samples, and
/// renders text exposition format. Collector failures are recorded in
/// `tc_info_collector_success` instead of failing the whole scrape.
#[derive(Default)]
pub struct Registry {
    collectors: Vec<Box<dyn Collector>>,
}

fn collector_success_desc() -> MetricDesc {
    MetricDesc::new(
        "",
        "collector_success",
        "Whether the collector's last scrape succeeded",
        &["collector"],
    )
}

fn collector_duration_desc() -> MetricDesc {
    MetricDesc::new(
        "",
        "collector_duration_seconds",
        "Duration of the collector's last scrape",
        &["collector"],
    )
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collector: Box<dyn Collector>) {
        self.collectors.push(collector);
    }

    pub fn collector_names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Run one scrape cycle and render the result in text exposition format.
    pub async fn gather(&self) -> Result<String> {
        let success_desc = collector_success_desc();
        let duration_desc = collector_duration_desc();

        let mut descs: HashMap<String, MetricDesc> = HashMap::new();
        for desc in self
            .collectors
            .iter()
            .flat_map(|c| c.describe())
            .chain([success_desc.clone(), duration_desc.clone()])
        {
            descs.insert(desc.name.clone(), desc);
        }

        let (sink, mut rx) = SampleSink::channel();
        for collector in &self.collectors {
            let started = Instant::now();
            let result = collector.collect(sink.clone()).await;
            let elapsed = started.elapsed();

            let success = match result {
                Ok(()) => {
                    debug!(collector = collector.name(), ?elapsed, "collector finished");
                    1.0
                }
                Err(err) => {
                    error!(collector = collector.name(), error = %err, "collector scrape failed");
                    0.0
                }
            };
            sink.emit(&success_desc, vec![collector.name().to_string()], success);
            sink.emit(&duration_desc, vec![collector.name().to_string()], elapsed.as_secs_f64());
        }
        drop(sink);

        let mut samples = Vec::new();
        while let Some(sample) = rx.recv().await {
            samples.push(sample);
        }

        encode(&descs, samples)
    }
}

fn encode(descs: &HashMap<String, MetricDesc>, samples: Vec<Sample>) -> Result<String> {
    let registry = prometheus::Registry::new();

    let build_info = Gauge::with_opts(
        Opts::new(crate::metrics::build_fq_name("", "build_info"), "Exporter build metadata")
            .const_label("version", env!("CARGO_PKG_VERSION")),
    )?;
    build_info.set(1.0);
    registry.register(Box::new(build_info))?;

    let mut families: HashMap<String, GaugeVec> = HashMap::new();
    for sample in samples {
        let Some(desc) = descs.get(&sample.metric) else {
            debug!(metric = %sample.metric, "dropping sample for undescribed metric");
            continue;
        };
        if sample.label_values.len() != desc.labels.len() {
            debug!(metric = %sample.metric, "dropping sample with mismatched label count");
            continue;
        }

        let family = match families.entry(sample.metric.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let family = GaugeVec::new(Opts::new(desc.name.clone(), desc.help.clone()), desc.labels)?;
                registry.register(Box::new(family.clone()))?;
                entry.insert(family)
            }
        };

        let values: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
        family.with_label_values(&values).set(sample.value);
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

//! The sink contract between collectors and the exposition layer.
//!
//! Collectors describe their gauge families up front ([`MetricDesc`]) and
//! write [`Sample`]s into a [`SampleSink`] during a scrape. The sink is an
//! unbounded mpsc sender, so concurrently running tasks can emit without
//! further coordination; the registry drains the channel once all
//! collectors have finished.

use tokio::sync::mpsc;

pub const NAMESPACE: &str = "tc_info";

/// `tc_info_{subsystem}_{name}`, with empty segments skipped.
pub fn build_fq_name(subsystem: &str, name: &str) -> String {
    if subsystem.is_empty() {
        format!("{NAMESPACE}_{name}")
    } else {
        format!("{NAMESPACE}_{subsystem}_{name}")
    }
}

/// Shape of one gauge family: fully-qualified name, help text, label names.
#[derive(Debug, Clone)]
pub struct MetricDesc {
    pub name: String,
    pub help: String,
    pub labels: &'static [&'static str],
}

impl MetricDesc {
    pub fn new(subsystem: &str, name: &str, help: &str, labels: &'static [&'static str]) -> Self {
        Self {
            name: build_fq_name(subsystem, name),
            help: help.to_string(),
            labels,
        }
    }
}

/// One gauge sample, produced transiently per scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: String,
    pub label_values: Vec<String>,
    pub value: f64,
}

/// Clonable writer half of the scrape channel.
#[derive(Debug, Clone)]
pub struct SampleSink {
    tx: mpsc::UnboundedSender<Sample>,
}

impl SampleSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Sample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, metric: &MetricDesc, label_values: Vec<String>, value: f64) {
        // A closed receiver means the scrape was abandoned; drop the sample.
        let _ = self.tx.send(Sample {
            metric: metric.name.clone(),
            label_values,
            value,
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fq_names() {
        assert_eq!(build_fq_name("cdn", "http_status_rate"), "tc_info_cdn_http_status_rate");
        assert_eq!(build_fq_name("", "build_info"), "tc_info_build_info");
    }

    #[tokio::test]
    async fn sink_carries_samples_to_the_receiver() {
        let desc = MetricDesc::new("cbs", "instance", "cbs disk", &["disk_id"]);
        let (sink, mut rx) = SampleSink::channel();

        sink.emit(&desc, vec!["disk-1".into()], 1.0);
        drop(sink);

        let sample = rx.recv().await.unwrap();
        assert_eq!(sample.metric, "tc_info_cbs_instance");
        assert_eq!(sample.label_values, vec!["disk-1".to_string()]);
        assert_eq!(sample.value, 1.0);
        assert!(rx.recv().await.is_none());
    }
}

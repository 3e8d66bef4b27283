//! ES instance inventory collector.

use crate::{
    collectors::Collector,
    metrics::{
        MetricDesc,
        SampleSink,
    },
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
};
use tencent_api::{
    es::{
        DescribeInstances,
        EsInstance,
    },
    ApiClient,
    ApiError,
};
use tracing::{
    debug,
    warn,
};

pub trait InstanceSource: Send + Sync {
    fn instances(&self) -> Pin<Box<dyn Future<Output = Result<Vec<EsInstance>, ApiError>> + Send + '_>>;
}

impl InstanceSource for ApiClient {
    fn instances(&self) -> Pin<Box<dyn Future<Output = Result<Vec<EsInstance>, ApiError>> + Send + '_>> {
        Box::pin(async move {
            let response = self.send(&DescribeInstances::default()).await?;
            Ok(response.instance_list)
        })
    }
}

pub struct EsCollector {
    source: Arc<dyn InstanceSource>,
    instance: MetricDesc,
}

impl EsCollector {
    pub fn new(source: Arc<dyn InstanceSource>) -> Self {
        Self {
            source,
            instance: MetricDesc::new(
                "es",
                "instance",
                "Elasticsearch instance on Tencent Cloud",
                &["instance_id", "name", "es_version"],
            ),
        }
    }
}

impl Collector for EsCollector {
    fn name(&self) -> &'static str {
        "es"
    }

    fn describe(&self) -> Vec<MetricDesc> {
        vec![self.instance.clone()]
    }

    fn collect(&self, sink: SampleSink) -> Pin<Box<dyn Future<Output = eyre::Result<()>> + Send + '_>> {
        Box::pin(async move {
            let instances = match self.source.instances().await {
                Ok(instances) => instances,
                Err(err) if err.is_api_error() => {
                    warn!(error = %err, "es listing rejected by api, skipping");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            debug!(count = instances.len(), "collected es instances");
            for instance in instances {
                sink.emit(
                    &self.instance,
                    vec![instance.instance_id, instance.instance_name, instance.es_version],
                    1.0,
                );
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metrics::Sample;
    use pretty_assertions::assert_eq;

    enum FakeEs {
        Instances(Vec<EsInstance>),
        ApiError,
        TransportError,
    }

    impl InstanceSource for FakeEs {
        fn instances(&self) -> Pin<Box<dyn Future<Output = Result<Vec<EsInstance>, ApiError>> + Send + '_>> {
            Box::pin(async move {
                match self {
                    FakeEs::Instances(instances) => Ok(instances.clone()),
                    FakeEs::ApiError => Err(ApiError::Api {
                        code: "AuthFailure".into(),
                        message: "denied".into(),
                        request_id: "req-test".into(),
                    }),
                    FakeEs::TransportError => Err(ApiError::MissingCredential("TENCENT_SECRET_ID")),
                }
            })
        }
    }

    async fn run(collector: &EsCollector) -> eyre::Result<Vec<Sample>> {
        let (sink, mut rx) = SampleSink::channel();
        collector.collect(sink).await?;

        let mut samples = Vec::new();
        while let Ok(sample) = rx.try_recv() {
            samples.push(sample);
        }
        Ok(samples)
    }

    #[tokio::test]
    async fn emits_one_gauge_per_instance() {
        let source = FakeEs::Instances(vec![
            EsInstance {
                instance_id: "es-1".into(),
                instance_name: "search".into(),
                es_version: "7.10.1".into(),
            },
            EsInstance {
                instance_id: "es-2".into(),
                instance_name: "logs".into(),
                es_version: "6.8.2".into(),
            },
        ]);
        let collector = EsCollector::new(Arc::new(source));

        let samples = run(&collector).await.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].metric, "tc_info_es_instance");
        assert_eq!(samples[0].label_values, vec!["es-1", "search", "7.10.1"]);
        assert_eq!(samples[0].value, 1.0);
    }

    #[tokio::test]
    async fn api_error_skips_without_failing_the_scrape() {
        let collector = EsCollector::new(Arc::new(FakeEs::ApiError));
        let samples = run(&collector).await.unwrap();
        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn transport_error_fails_the_scrape() {
        let collector = EsCollector::new(Arc::new(FakeEs::TransportError));
        assert!(run(&collector).await.is_err());
    }
}

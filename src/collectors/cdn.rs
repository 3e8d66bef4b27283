//! The CDN ratio collector.
//!
//! For each configured domain, one baseline `request` call determines the
//! denominator for the scrape window; every other configured metric is then
//! fetched concurrently (one task per domain/metric pair, all behind a
//! shared token bucket) and emitted as a fraction of the baseline.

use crate::{
    collectors::Collector,
    config::ExporterConfig,
    metrics::{
        MetricDesc,
        SampleSink,
    },
    ratelimit::RateLimiter,
};
use chrono::{
    FixedOffset,
    Utc,
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    time::Instant,
};
use tencent_api::{
    cdn::DescribeCdnData,
    ApiClient,
    ApiError,
};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{
    debug,
    error,
    info,
    warn,
};

/// The metric whose summarized value is the ratio denominator.
pub const BASELINE_METRIC: &str = "request";

pub const PROVIDER: &str = "tencent";

/// One sub-metric returned for a (domain, metric, instant) query, e.g.
/// status `502` within metric `5xx`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusValue {
    pub status: String,
    pub value: f64,
}

/// Where CDN summarized values come from. Split out from [`ApiClient`] so
/// the collector can run against a fake in tests.
pub trait CdnDataSource: Send + Sync {
    fn summarized<'a>(
        &'a self,
        domain: &'a str,
        project: Option<i64>,
        metric: &'a str,
        window: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StatusValue>, ApiError>> + Send + 'a>>;
}

impl CdnDataSource for ApiClient {
    fn summarized<'a>(
        &'a self,
        domain: &'a str,
        project: Option<i64>,
        metric: &'a str,
        window: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StatusValue>, ApiError>> + Send + 'a>> {
        Box::pin(async move {
            let request = DescribeCdnData {
                start_time: window.to_string(),
                end_time: window.to_string(),
                metric: metric.to_string(),
                domains: vec![domain.to_string()],
                project,
            };
            let response = self.send(&request).await?;
            Ok(response
                .data
                .into_iter()
                .next()
                .map(|resource| {
                    resource
                        .cdn_data
                        .into_iter()
                        .map(|data| StatusValue {
                            status: data.metric,
                            value: data.summarized_data.value,
                        })
                        .collect()
                })
                .unwrap_or_default())
        })
    }
}

pub struct CdnCollector {
    config: ExporterConfig,
    source: Arc<dyn CdnDataSource>,
    cancel: CancellationToken,
    http_status_rate: MetricDesc,
}

impl CdnCollector {
    pub fn new(config: ExporterConfig, source: Arc<dyn CdnDataSource>, cancel: CancellationToken) -> Self {
        Self {
            config,
            source,
            cancel,
            http_status_rate: MetricDesc::new(
                "cdn",
                "http_status_rate",
                "HTTP status rate on Tencent Cloud CDN",
                &["domain", "provider", "status"],
            ),
        }
    }

    /// Fetch the request count for one domain. `None` means the domain is
    /// skipped this cycle: either the call failed or there was no traffic.
    async fn baseline(&self, domain: &str, project: Option<i64>, window: &str, limiter: &RateLimiter) -> Option<f64> {
        if limiter.acquire(&self.cancel).await.is_err() {
            debug!(domain, "baseline rate limiter wait cancelled, skipping domain");
            return None;
        }

        match self.source.summarized(domain, project, BASELINE_METRIC, window).await {
            Ok(values) => {
                let requests = values.first().map(|v| v.value).unwrap_or(0.0);
                if requests == 0.0 {
                    debug!(domain, "no request traffic in window, skipping domain");
                    None
                } else {
                    Some(requests)
                }
            }
            Err(err) if err.is_api_error() => {
                warn!(domain, error = %err, "cdn baseline request rejected by api, skipping domain");
                None
            }
            Err(err) => {
                error!(domain, error = %err, "cdn baseline request failed, skipping domain");
                None
            }
        }
    }
}

impl Collector for CdnCollector {
    fn name(&self) -> &'static str {
        "cdn"
    }

    fn describe(&self) -> Vec<MetricDesc> {
        vec![self.http_status_rate.clone()]
    }

    fn collect(&self, sink: SampleSink) -> Pin<Box<dyn Future<Output = eyre::Result<()>> + Send + '_>> {
        Box::pin(async move {
            let started = Instant::now();
            let window = scrape_window(self.config.delay_seconds);
            let limiter = Arc::new(RateLimiter::new(self.config.rate_limit));
            let allow_list = Arc::new(self.config.only_include_metrics.clone());

            let mut tasks: JoinSet<()> = JoinSet::new();
            for dimension in &self.config.custom_query_dimensions {
                let Some(baseline) = self
                    .baseline(&dimension.domain, dimension.project_id, &window, &limiter)
                    .await
                else {
                    continue;
                };

                for metric in &self.config.metrics {
                    if metric == BASELINE_METRIC {
                        continue;
                    }
                    let pair = PairQuery {
                        source: Arc::clone(&self.source),
                        limiter: Arc::clone(&limiter),
                        cancel: self.cancel.clone(),
                        sink: sink.clone(),
                        desc: self.http_status_rate.clone(),
                        allow_list: Arc::clone(&allow_list),
                        domain: dimension.domain.clone(),
                        project: dimension.project_id,
                        metric: metric.clone(),
                        window: window.clone(),
                        baseline,
                    };
                    tasks.spawn(pair.run());
                }
            }

            // barrier: the cycle is complete only once every pair is done
            while tasks.join_next().await.is_some() {}

            info!(window = %window, elapsed = ?started.elapsed(), "finished cdn collection");
            Ok(())
        })
    }
}

struct PairQuery {
    source: Arc<dyn CdnDataSource>,
    limiter: Arc<RateLimiter>,
    cancel: CancellationToken,
    sink: SampleSink,
    desc: MetricDesc,
    allow_list: Arc<Option<Vec<String>>>,
    domain: String,
    project: Option<i64>,
    metric: String,
    window: String,
    baseline: f64,
}

impl PairQuery {
    async fn run(self) {
        if self.limiter.acquire(&self.cancel).await.is_err() {
            debug!(domain = %self.domain, metric = %self.metric, "rate limiter wait cancelled, skipping pair");
            return;
        }

        let values = match self
            .source
            .summarized(&self.domain, self.project, &self.metric, &self.window)
            .await
        {
            Ok(values) => values,
            Err(err) if err.is_api_error() => {
                warn!(domain = %self.domain, metric = %self.metric, error = %err, "cdn request rejected by api, skipping pair");
                return;
            }
            Err(err) => {
                error!(domain = %self.domain, metric = %self.metric, error = %err, "cdn request failed, skipping pair");
                return;
            }
        };

        if values.first().map(|v| v.value).unwrap_or(0.0) == 0.0 {
            debug!(domain = %self.domain, metric = %self.metric, "no data for metric in window, skipping pair");
            return;
        }

        for status in values {
            if let Some(allowed) = &*self.allow_list {
                if !allowed.is_empty() && !allowed.contains(&status.status) {
                    continue;
                }
            }
            self.sink.emit(
                &self.desc,
                vec![self.domain.clone(), PROVIDER.to_string(), status.status],
                round4(status.value / self.baseline),
            );
        }
    }
}

/// The single-instant scrape window: now minus the configured delay,
/// truncated to seconds in UTC+8 (the timezone the CDN API aggregates in).
fn scrape_window(delay_seconds: i64) -> String {
    let cst = FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset");
    (Utc::now() - chrono::Duration::seconds(delay_seconds))
        .with_timezone(&cst)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Round to four decimal places, half away from zero.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

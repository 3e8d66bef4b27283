//! CBS disk inventory collector: a paginated listing translated 1:1 into
//! constant gauges.

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
    cbs::{
        DescribeDisks,
        DescribeDisksResponse,
        MAX_PAGE_LIMIT,
    },
    ApiClient,
    ApiError,
};
use tracing::{
    debug,
    warn,
};

/// Retries per page after the initial attempt fails.
const PAGE_RETRIES: u32 = 3;

pub trait DiskSource: Send + Sync {
    fn disks(&self, offset: u64, limit: u64)
        -> Pin<Box<dyn Future<Output = Result<DescribeDisksResponse, ApiError>> + Send + '_>>;
}

impl DiskSource for ApiClient {
    fn disks(
        &self,
        offset: u64,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<DescribeDisksResponse, ApiError>> + Send + '_>> {
        Box::pin(async move { self.send(&DescribeDisks { offset, limit }).await })
    }
}

pub struct CbsCollector {
    source: Arc<dyn DiskSource>,
    page_limit: u64,
    instance: MetricDesc,
}

impl CbsCollector {
    pub fn new(source: Arc<dyn DiskSource>, page_limit: u64) -> Self {
        Self {
            source,
            page_limit: page_limit.clamp(1, MAX_PAGE_LIMIT),
            instance: MetricDesc::new(
                "cbs",
                "instance",
                "CBS disk on Tencent Cloud",
                &["instance_id", "disk_id", "type", "name", "state"],
            ),
        }
    }

    async fn page(&self, offset: u64) -> Result<DescribeDisksResponse, ApiError> {
        let mut attempt = 0;
        loop {
            match self.source.disks(offset, self.page_limit).await {
                Ok(page) => return Ok(page),
                // a structured api error will not get better on retry
                Err(err) if err.is_api_error() => return Err(err),
                Err(err) if attempt < PAGE_RETRIES => {
                    attempt += 1;
                    warn!(offset, attempt, error = %err, "disk page fetch failed, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Collector for CbsCollector {
    fn name(&self) -> &'static str {
        "cbs"
    }

    fn describe(&self) -> Vec<MetricDesc> {
        vec![self.instance.clone()]
    }

    fn collect(&self, sink: SampleSink) -> Pin<Box<dyn Future<Output = eyre::Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut offset = 0;
            let mut emitted = 0u64;
            loop {
                let page = match self.page(offset).await {
                    Ok(page) => page,
                    Err(err) if err.is_api_error() => {
                        warn!(offset, error = %err, "disk listing rejected by api, stopping");
                        return Ok(());
                    }
                    Err(err) => return Err(err.into()),
                };

                for disk in &page.disk_set {
                    sink.emit(
                        &self.instance,
                        vec![
                            disk.instance_id.clone(),
                            disk.disk_id.clone(),
                            disk.disk_type.clone(),
                            disk.disk_name.clone(),
                            disk.disk_state.clone(),
                        ],
                        1.0,
                    );
                    emitted += 1;
                }

                offset += self.page_limit;
                if offset >= page.total_count {
                    break;
                }
            }

            debug!(emitted, "collected cbs disks");
            Ok(())
        })
    }
}

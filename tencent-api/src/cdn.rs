//! CDN summarized traffic statistics.

use crate::client::ApiRequest;
use serde::{
    Deserialize,
    Serialize,
};

/// `DescribeCdnData` for a single domain, metric and time instant.
///
/// Start and end are the same `%Y-%m-%d %H:%M:%S` timestamp: the exporter
/// queries a one-second window, not a range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeCdnData {
    pub start_time: String,
    pub end_time: String,
    pub metric: String,
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<i64>,
}

impl ApiRequest for DescribeCdnData {
    type Response = DescribeCdnDataResponse;

    const SERVICE: &'static str = "cdn";
    const VERSION: &'static str = "2018-06-06";
    const ACTION: &'static str = "DescribeCdnData";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeCdnDataResponse {
    #[serde(default)]
    pub data: Vec<ResourceData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceData {
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub cdn_data: Vec<CdnData>,
}

/// One sub-metric of the requested statistic, e.g. status code `404` within
/// metric `4xx`. `metric` doubles as the status label on the exported gauge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CdnData {
    pub metric: String,
    pub summarized_data: SummarizedData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummarizedData {
    #[serde(default)]
    pub name: String,
    pub value: f64,
}

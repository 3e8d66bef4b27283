//! Elasticsearch Service (ES) instance inventory.

use crate::client::ApiRequest;
use serde::{
    Deserialize,
    Serialize,
};

/// `DescribeInstances` takes no parameters; the full list comes back in one
/// response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DescribeInstances {}

impl ApiRequest for DescribeInstances {
    type Response = DescribeInstancesResponse;

    const SERVICE: &'static str = "es";
    const VERSION: &'static str = "2018-04-16";
    const ACTION: &'static str = "DescribeInstances";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeInstancesResponse {
    #[serde(default)]
    pub instance_list: Vec<EsInstance>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EsInstance {
    pub instance_id: String,
    #[serde(default)]
    pub instance_name: String,
    #[serde(default)]
    pub es_version: String,
}

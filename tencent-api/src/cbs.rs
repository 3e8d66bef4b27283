//! Block storage (CBS) disk inventory.

use crate::client::ApiRequest;
use serde::{
    Deserialize,
    Serialize,
};

/// Provider-side maximum page size for `DescribeDisks`.
pub const MAX_PAGE_LIMIT: u64 = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDisks {
    pub offset: u64,
    pub limit: u64,
}

impl ApiRequest for DescribeDisks {
    type Response = DescribeDisksResponse;

    const SERVICE: &'static str = "cbs";
    const VERSION: &'static str = "2017-03-12";
    const ACTION: &'static str = "DescribeDisks";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDisksResponse {
    pub total_count: u64,
    #[serde(default)]
    pub disk_set: Vec<Disk>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Disk {
    pub disk_id: String,
    #[serde(default)]
    pub disk_name: String,
    #[serde(default)]
    pub disk_state: String,
    #[serde(default)]
    pub disk_type: String,
    #[serde(default)]
    pub instance_id: String,
}

#[cfg(test)]
mod test {
    use super::DescribeDisks;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_serializes_with_pascal_case_fields() {
        let request = DescribeDisks { offset: 200, limit: 100 };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"Offset": 200, "Limit": 100}));
    }
}

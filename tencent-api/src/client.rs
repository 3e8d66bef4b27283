use crate::{
    credential::Credential,
    error::ApiError,
    sign,
};
use chrono::Utc;
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use std::time::Duration;
use tracing::debug;

/// One Tencent Cloud API action: the service endpoint it posts to, the wire
/// version, and the response payload it decodes into.
pub trait ApiRequest: Serialize {
    type Response: DeserializeOwned;

    const SERVICE: &'static str;
    const VERSION: &'static str;
    const ACTION: &'static str;
}

/// Signed JSON-over-HTTPS client for the Tencent Cloud API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    credential: Credential,
    region: String,
}

impl ApiClient {
    pub fn new(credential: Credential, region: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            credential,
            region: region.into(),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign and send a request, decoding the `{"Response": ...}` envelope.
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let host = format!("{}.tencentcloudapi.com", R::SERVICE);
        let payload = serde_json::to_string(request)?;

        let now = Utc::now();
        let timestamp = now.timestamp();
        let date = now.format("%Y-%m-%d").to_string();

        let canonical = sign::canonical_request(&host, &payload);
        let to_sign = sign::string_to_sign(timestamp, &date, R::SERVICE, &canonical);
        let key = sign::signing_key(&self.credential.secret_key, &date, R::SERVICE);
        let signature = hex::encode(sign::hmac_sha256(&key, to_sign.as_bytes()));
        let authorization = sign::authorization(&self.credential.secret_id, &date, R::SERVICE, &signature);

        debug!(action = R::ACTION, service = R::SERVICE, "sending api request");

        let response = self
            .http
            .post(format!("https://{host}/"))
            .header("Authorization", authorization)
            .header("Content-Type", sign::CONTENT_TYPE)
            .header("X-TC-Action", R::ACTION)
            .header("X-TC-Version", R::VERSION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Region", &self.region)
            .body(payload)
            .send()
            .await?;

        let envelope: Envelope = response.json().await?;
        decode_response(envelope)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireError {
    code: String,
    message: String,
}

fn decode_response<T: DeserializeOwned>(envelope: Envelope) -> Result<T, ApiError> {
    let request_id = envelope
        .response
        .get("RequestId")
        .and_then(|id| id.as_str())
        .unwrap_or_default()
        .to_string();

    if let Some(error) = envelope.response.get("Error") {
        let error: WireError = serde_json::from_value(error.clone())?;
        return Err(ApiError::Api {
            code: error.code,
            message: error.message,
            request_id,
        });
    }

    debug!(request_id = %request_id, "api request succeeded");
    Ok(serde_json::from_value(envelope.response)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cbs::DescribeDisksResponse;

    fn envelope(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_successful_response() {
        let envelope = envelope(
            r#"{"Response": {
                "RequestId": "req-1",
                "TotalCount": 1,
                "DiskSet": [{
                    "DiskId": "disk-abc",
                    "DiskName": "data",
                    "DiskState": "ATTACHED",
                    "DiskType": "CLOUD_PREMIUM",
                    "InstanceId": "ins-xyz"
                }]
            }}"#,
        );

        let page: DescribeDisksResponse = decode_response(envelope).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.disk_set[0].disk_id, "disk-abc");
        assert_eq!(page.disk_set[0].instance_id, "ins-xyz");
    }

    #[test]
    fn surfaces_structured_error_envelope() {
        let envelope = envelope(
            r#"{"Response": {
                "RequestId": "req-2",
                "Error": {"Code": "InvalidParameter", "Message": "bad domain"}
            }}"#,
        );

        let err = decode_response::<DescribeDisksResponse>(envelope).unwrap_err();
        match err {
            ApiError::Api {
                code,
                message,
                request_id,
            } => {
                assert_eq!(code, "InvalidParameter");
                assert_eq!(message, "bad domain");
                assert_eq!(request_id, "req-2");
            }
            other => panic!("expected ApiError::Api, got {other:?}"),
        }
    }
}

//! TC3-HMAC-SHA256 request signing.
//!
//! The derivation chain is secret -> date -> service -> `tc3_request`, with
//! the final key signing the string-to-sign. All requests are JSON POSTs to
//! `/`, so the canonical request only varies in host and payload hash.

use hmac::{
    Hmac,
    Mac,
};
use sha2::{
    Digest,
    Sha256,
};

type HmacSha256 = Hmac<Sha256>;

pub(crate) const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub(crate) const SIGNED_HEADERS: &str = "content-type;host";
pub(crate) const CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub(crate) fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac-sha256 accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

pub(crate) fn canonical_request(host: &str, payload: &str) -> String {
    format!(
        "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{host}\n\n{SIGNED_HEADERS}\n{}",
        hex_sha256(payload.as_bytes())
    )
}

pub(crate) fn string_to_sign(timestamp: i64, date: &str, service: &str, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{timestamp}\n{date}/{service}/tc3_request\n{}",
        hex_sha256(canonical_request.as_bytes())
    )
}

pub(crate) fn signing_key(secret_key: &str, date: &str, service: &str) -> [u8; 32] {
    let secret = format!("TC3{secret_key}");
    let date_key = hmac_sha256(secret.as_bytes(), date.as_bytes());
    let service_key = hmac_sha256(&date_key, service.as_bytes());
    hmac_sha256(&service_key, b"tc3_request")
}

pub(crate) fn authorization(secret_id: &str, date: &str, service: &str, signature: &str) -> String {
    format!(
        "{ALGORITHM} Credential={secret_id}/{date}/{service}/tc3_request, \
         SignedHeaders={SIGNED_HEADERS}, Signature={signature}"
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_request_layout() {
        let canonical = canonical_request("cdn.tencentcloudapi.com", "{}");
        let lines: Vec<&str> = canonical.split('\n').collect();
        assert_eq!(
            lines[..6],
            [
                "POST",
                "/",
                "",
                "content-type:application/json; charset=utf-8",
                "host:cdn.tencentcloudapi.com",
                "",
            ]
        );
        assert_eq!(lines[6], "content-type;host");
        // hex-encoded sha256 of the payload
        assert_eq!(lines[7].len(), 64);
    }

    #[test]
    fn signing_is_deterministic_and_keyed() {
        let key_a = signing_key("secret", "2023-01-01", "cdn");
        let key_b = signing_key("secret", "2023-01-01", "cdn");
        assert_eq!(key_a, key_b);

        let other_day = signing_key("secret", "2023-01-02", "cdn");
        assert_ne!(key_a, other_day);
        let other_service = signing_key("secret", "2023-01-01", "cbs");
        assert_ne!(key_a, other_service);
    }

    #[test]
    fn authorization_header_shape() {
        let header = authorization("AKIDexample", "2023-01-01", "cdn", "deadbeef");
        assert_eq!(
            header,
            "TC3-HMAC-SHA256 Credential=AKIDexample/2023-01-01/cdn/tc3_request, \
             SignedHeaders=content-type;host, Signature=deadbeef"
        );
    }
}

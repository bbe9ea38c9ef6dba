//! S3-compatible object storage client for product image uploads.
//!
//! Uploads are a single `PUT` signed with AWS Signature Version 4. No SDK:
//! the signing algorithm is a short HMAC chain and one canonical request,
//! and the only operation needed here is `PutObject`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config::StorageConfig;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Errors from object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request to the storage endpoint failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage endpoint rejected the upload.
    #[error("upload rejected with status {status}: {body}")]
    UploadRejected {
        /// HTTP status returned by the endpoint.
        status: u16,
        /// Response body (truncated).
        body: String,
    },
}

/// Client for S3-compatible object storage.
#[derive(Clone)]
pub struct ObjectStorageClient {
    inner: Arc<ObjectStorageClientInner>,
}

struct ObjectStorageClientInner {
    client: reqwest::Client,
    bucket: String,
    region: String,
    access_key_id: String,
    secret_access_key: String,
    endpoint: Option<String>,
    public_base_url: Option<String>,
}

impl ObjectStorageClient {
    /// Create a new object storage client.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            inner: Arc::new(ObjectStorageClientInner {
                client: reqwest::Client::new(),
                bucket: config.bucket.clone(),
                region: config.region.clone(),
                access_key_id: config.access_key_id.clone(),
                secret_access_key: config.secret_access_key.expose_secret().to_string(),
                endpoint: config.endpoint.clone().map(|e| {
                    e.trim_end_matches('/').to_string()
                }),
                public_base_url: config.public_base_url.clone().map(|u| {
                    u.trim_end_matches('/').to_string()
                }),
            }),
        }
    }

    /// Upload a product image and return its public URL.
    ///
    /// The object key is generated server-side (UUID plus a sanitized
    /// extension from the original filename), so client-supplied names never
    /// reach the bucket.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UploadRejected` if the endpoint responds with
    /// a non-success status, or `StorageError::Http` on transport failure.
    pub async fn upload_image(
        &self,
        original_filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = object_key(original_filename);
        let now = Utc::now();

        let (request_url, host, canonical_uri) = self.object_urls(&key);

        let payload_hash = hex::encode(Sha256::digest(&bytes));
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let authorization = self.authorization_header(
            &canonical_uri,
            &host,
            &payload_hash,
            &amz_date,
            now,
        );

        let response = self
            .inner
            .client
            .put(&request_url)
            .header("host", &host)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("authorization", authorization)
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadRejected {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        Ok(self.public_url(&key))
    }

    /// Request URL, host header value, and canonical URI for an object.
    ///
    /// Custom endpoints use path-style addressing (MinIO); AWS uses
    /// virtual-hosted style. Keys are generated from UUIDs and a sanitized
    /// extension, so they need no URI encoding.
    fn object_urls(&self, key: &str) -> (String, String, String) {
        let inner = &self.inner;
        if let Some(endpoint) = &inner.endpoint {
            let host = endpoint
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .to_string();
            (
                format!("{endpoint}/{}/{key}", inner.bucket),
                host,
                format!("/{}/{key}", inner.bucket),
            )
        } else {
            let host = format!("{}.s3.{}.amazonaws.com", inner.bucket, inner.region);
            (
                format!("https://{host}/{key}"),
                host,
                format!("/{key}"),
            )
        }
    }

    /// Public URL for a stored object.
    fn public_url(&self, key: &str) -> String {
        match &self.inner.public_base_url {
            Some(base) => format!("{base}/{key}"),
            None => self.object_urls(key).0,
        }
    }

    /// Build the Signature V4 `Authorization` header for a `PUT`.
    fn authorization_header(
        &self,
        canonical_uri: &str,
        host: &str,
        payload_hash: &str,
        amz_date: &str,
        now: DateTime<Utc>,
    ) -> String {
        let inner = &self.inner;
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/{SERVICE}/aws4_request", inner.region);

        let canonical_request = format!(
            "PUT\n{canonical_uri}\n\nhost:{host}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADERS}\n{payload_hash}"
        );

        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let key = signing_key(&inner.secret_access_key, &date, &inner.region, SERVICE);
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        format!(
            "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            inner.access_key_id
        )
    }
}

/// Generate an object key from the original filename.
///
/// Keeps only a sanitized extension; the rest of the name is replaced with
/// a UUID under a `products/` prefix.
fn object_key(original_filename: &str) -> String {
    let extension: String = original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("bin")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect::<String>()
        .to_lowercase();

    let extension = if extension.is_empty() {
        "bin".to_string()
    } else {
        extension
    };

    format!("products/{}.{extension}", Uuid::new_v4())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the Signature V4 signing key for a given date, region, and service.
fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_signing_key_matches_aws_test_vector() {
        // Published example from the AWS Signature V4 documentation
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_object_key_sanitizes_extension() {
        let key = object_key("photo.JPG");
        assert!(key.starts_with("products/"));
        assert!(key.ends_with(".jpg"));

        // Path separators and dots from the client name never reach the key
        let key = object_key("../../etc/passwd");
        assert!(!key.contains(".."));
        assert_eq!(key.matches('/').count(), 1);
    }

    #[test]
    fn test_object_key_without_extension() {
        assert!(object_key("noextension").ends_with(".bin"));
    }

    #[test]
    fn test_object_keys_are_unique() {
        assert_ne!(object_key("a.png"), object_key("a.png"));
    }

    fn client(endpoint: Option<&str>, public: Option<&str>) -> ObjectStorageClient {
        ObjectStorageClient::new(&StorageConfig {
            bucket: "mithai-images".to_string(),
            region: "ap-south-1".to_string(),
            access_key_id: "AKIATEST".to_string(),
            secret_access_key: SecretString::from("secret"),
            endpoint: endpoint.map(String::from),
            public_base_url: public.map(String::from),
        })
    }

    #[test]
    fn test_aws_virtual_hosted_urls() {
        let (url, host, uri) = client(None, None).object_urls("products/x.jpg");
        assert_eq!(
            url,
            "https://mithai-images.s3.ap-south-1.amazonaws.com/products/x.jpg"
        );
        assert_eq!(host, "mithai-images.s3.ap-south-1.amazonaws.com");
        assert_eq!(uri, "/products/x.jpg");
    }

    #[test]
    fn test_custom_endpoint_path_style_urls() {
        let (url, host, uri) =
            client(Some("http://localhost:9000"), None).object_urls("products/x.jpg");
        assert_eq!(url, "http://localhost:9000/mithai-images/products/x.jpg");
        assert_eq!(host, "localhost:9000");
        assert_eq!(uri, "/mithai-images/products/x.jpg");
    }

    #[test]
    fn test_public_url_prefers_configured_base() {
        let client = client(None, Some("https://img.mithai.shop"));
        assert_eq!(
            client.public_url("products/x.jpg"),
            "https://img.mithai.shop/products/x.jpg"
        );
    }
}

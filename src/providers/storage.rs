//! Google Cloud Storage V4 signed URLs.
//!
//! Signing uses the IAM Credentials `signBlob` endpoint rather than
//! local RSA primitives, so the only local crypto is the SHA-256 of the
//! canonical request. Upload URLs live 15 minutes, download URLs 60.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::check_status;
use crate::error::GatewayError;

pub const UPLOAD_TTL_SECS: u64 = 15 * 60;
pub const DOWNLOAD_TTL_SECS: u64 = 60 * 60;

/// Prefix for every uploaded object.
const OBJECT_PREFIX: &str = "documents/uploads";

const SIGNING_ALGORITHM: &str = "GOOG4-RSA-SHA256";

/// The set of URLs handed back to the browser for one upload.
#[derive(Debug)]
pub struct SignedUpload {
    pub upload_url: String,
    pub download_url: String,
    pub gcs_uri: String,
    pub public_url: String,
    pub object_name: String,
}

/// Generate the object key: `documents/uploads/<timestamp>-<hex>.<ext>`.
pub fn object_name_for(file_name: &str, now: DateTime<Utc>) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .unwrap_or_else(|| "bin".to_string());
    let suffix: u64 = rand::thread_rng().gen();
    format!(
        "{}/{}-{:012x}.{}",
        OBJECT_PREFIX,
        now.timestamp_millis(),
        suffix & 0xffff_ffff_ffff,
        ext
    )
}

/// Strict RFC 3986 percent-encoding (everything but unreserved).
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Everything needed to sign one URL, kept pure for testability.
struct CanonicalParts {
    query: String,
    string_to_sign: String,
}

fn canonical_parts(
    method: &str,
    bucket: &str,
    object: &str,
    client_email: &str,
    content_type: Option<&str>,
    expires_secs: u64,
    now: DateTime<Utc>,
    host: &str,
) -> CanonicalParts {
    let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
    let datestamp = now.format("%Y%m%d").to_string();
    let scope = format!("{datestamp}/auto/storage/goog4_request");
    let credential = format!("{client_email}/{scope}");

    let signed_headers = if content_type.is_some() {
        "content-type;host"
    } else {
        "host"
    };

    // Query parameters must be sorted by name.
    let mut query_pairs = vec![
        ("X-Goog-Algorithm", SIGNING_ALGORITHM.to_string()),
        ("X-Goog-Credential", percent_encode(&credential)),
        ("X-Goog-Date", timestamp.clone()),
        ("X-Goog-Expires", expires_secs.to_string()),
        ("X-Goog-SignedHeaders", percent_encode(signed_headers)),
    ];
    query_pairs.sort_by(|a, b| a.0.cmp(b.0));
    let query = query_pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_headers = match content_type {
        Some(ct) => format!("content-type:{ct}\nhost:{host}\n"),
        None => format!("host:{host}\n"),
    };

    let canonical_path = format!("/{bucket}/{object}");
    let canonical_request = format!(
        "{method}\n{canonical_path}\n{query}\n{canonical_headers}\n{signed_headers}\nUNSIGNED-PAYLOAD"
    );

    let request_hash = to_hex(&Sha256::digest(canonical_request.as_bytes()));
    let string_to_sign =
        format!("{SIGNING_ALGORITHM}\n{timestamp}\n{scope}\n{request_hash}");

    CanonicalParts {
        query,
        string_to_sign,
    }
}

pub struct StorageClient<'a> {
    pub http: &'a reqwest::Client,
    pub storage_url: &'a str,
    pub iam_url: &'a str,
    pub bucket: &'a str,
    pub client_email: String,
}

impl StorageClient<'_> {
    /// Produce the signed PUT/GET URL pair for one object.
    pub async fn signed_upload(
        &self,
        access_token: &str,
        object: &str,
        content_type: &str,
    ) -> Result<SignedUpload, GatewayError> {
        let now = Utc::now();
        let host = self
            .storage_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string();

        let upload_url = self
            .sign_url(access_token, "PUT", object, Some(content_type), UPLOAD_TTL_SECS, now, &host)
            .await?;
        let download_url = self
            .sign_url(access_token, "GET", object, None, DOWNLOAD_TTL_SECS, now, &host)
            .await?;

        Ok(SignedUpload {
            upload_url,
            download_url,
            gcs_uri: format!("gs://{}/{}", self.bucket, object),
            public_url: format!("{}/{}/{}", self.storage_url, self.bucket, object),
            object_name: object.to_string(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn sign_url(
        &self,
        access_token: &str,
        method: &str,
        object: &str,
        content_type: Option<&str>,
        expires_secs: u64,
        now: DateTime<Utc>,
        host: &str,
    ) -> Result<String, GatewayError> {
        let parts = canonical_parts(
            method,
            self.bucket,
            object,
            &self.client_email,
            content_type,
            expires_secs,
            now,
            host,
        );

        let signature = self.sign_blob(access_token, &parts.string_to_sign).await?;

        Ok(format!(
            "{}/{}/{}?{}&X-Goog-Signature={}",
            self.storage_url, self.bucket, object, parts.query, signature
        ))
    }

    async fn sign_blob(
        &self,
        access_token: &str,
        string_to_sign: &str,
    ) -> Result<String, GatewayError> {
        use base64::Engine;
        let url = format!(
            "{}/v1/projects/-/serviceAccounts/{}:signBlob",
            self.iam_url, self.client_email
        );
        let payload = base64::engine::general_purpose::STANDARD.encode(string_to_sign);

        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(&json!({"payload": payload}))
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: Value = response.json().await?;

        let signed = body
            .get("signedBlob")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Upstream {
                status: 502,
                body: "signBlob response missing signedBlob".into(),
            })?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(signed)
            .map_err(|e| GatewayError::Upstream {
                status: 502,
                body: format!("signedBlob is not valid base64: {e}"),
            })?;
        Ok(to_hex(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn object_name_has_prefix_timestamp_and_extension() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let name = object_name_for("smlouva.PDF", now);
        assert!(name.starts_with("documents/uploads/"));
        assert!(name.ends_with(".pdf"));
        assert!(name.contains(&now.timestamp_millis().to_string()));
    }

    #[test]
    fn missing_extension_falls_back_to_bin() {
        let name = object_name_for("noext", Utc::now());
        assert!(name.ends_with(".bin"));
    }

    #[test]
    fn put_canonical_parts_bind_content_type_and_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let parts = canonical_parts(
            "PUT",
            "omnia-files",
            "documents/uploads/1-a.pdf",
            "svc@proj.iam.gserviceaccount.com",
            Some("application/pdf"),
            UPLOAD_TTL_SECS,
            now,
            "storage.googleapis.com",
        );
        assert!(parts.query.contains("X-Goog-Expires=900"));
        assert!(parts
            .query
            .contains("X-Goog-SignedHeaders=content-type%3Bhost"));
        assert!(parts.string_to_sign.starts_with("GOOG4-RSA-SHA256\n20250601T120000Z\n20250601/auto/storage/goog4_request\n"));
    }

    #[test]
    fn get_url_expiry_is_one_hour() {
        let parts = canonical_parts(
            "GET",
            "b",
            "o.pdf",
            "svc@proj.iam.gserviceaccount.com",
            None,
            DOWNLOAD_TTL_SECS,
            Utc::now(),
            "storage.googleapis.com",
        );
        assert!(parts.query.contains("X-Goog-Expires=3600"));
        assert!(parts.query.contains("X-Goog-SignedHeaders=host"));
    }

    #[test]
    fn percent_encoding_escapes_separators() {
        assert_eq!(percent_encode("a/b@c"), "a%2Fb%40c");
        assert_eq!(percent_encode("safe-._~"), "safe-._~");
    }
}

//! Download URL shape
//!
//! Build and parse helpers for object-storage URLs. `upload` hands out URLs
//! built here and `delete` parses them back with [`object_path_from_url`], so
//! the two must stay exact inverses: the object path sits between `/o/` and
//! `?`, percent-encoded the way `encodeURIComponent` would.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Bytes left unescaped by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const OBJECT_MARKER: &str = "/o/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Not a storage download URL ({reason}): {url}")]
pub struct DownloadUrlError {
    pub url: String,
    pub reason: &'static str,
}

/// Percent-encode a single URL component (path segment or query value)
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Metadata / delete URL of an object: `{endpoint}/b/{bucket}/o/{path}`
pub fn object_url(endpoint: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/b/{}{}{}",
        endpoint.trim_end_matches('/'),
        bucket,
        OBJECT_MARKER,
        encode_component(path)
    )
}

/// Public download URL of an object
pub fn download_url(endpoint: &str, bucket: &str, path: &str, token: &str) -> String {
    format!(
        "{}?alt=media&token={}",
        object_url(endpoint, bucket, path),
        encode_component(token)
    )
}

/// Recover the object path from a download URL.
///
/// Takes the text after the first `/o/` up to the first `?` (or the end) and
/// percent-decodes it.
pub fn object_path_from_url(url: &str) -> Result<String, DownloadUrlError> {
    let invalid = |reason| DownloadUrlError {
        url: url.to_string(),
        reason,
    };

    let (_, rest) = url
        .split_once(OBJECT_MARKER)
        .ok_or_else(|| invalid("missing '/o/' segment"))?;
    let encoded = rest.split('?').next().unwrap_or_default();
    if encoded.is_empty() {
        return Err(invalid("empty object path"));
    }

    percent_decode_str(encoded)
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|_| invalid("object path is not UTF-8"))
}

/// Storage path for a node image: `nodes/{nodeId}/images/{timestamp}_{fileName}`
pub fn node_image_path(node_id: &str, timestamp_ms: i64, file_name: &str) -> String {
    format!("nodes/{}/images/{}_{}", node_id, timestamp_ms, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://firebasestorage.googleapis.com/v0";

    #[test]
    fn test_download_url_shape() {
        let url = download_url(
            ENDPOINT,
            "demo.appspot.com",
            "nodes/n1/images/1700000000000_logo.png",
            "tok",
        );
        assert_eq!(
            url,
            "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o/nodes%2Fn1%2Fimages%2F1700000000000_logo.png?alt=media&token=tok"
        );
    }

    #[test]
    fn test_parse_inverts_build_for_awkward_names() {
        let path = node_image_path("n1", 1_700_000_000_000, "my logo (final) #2 ü.png");
        let url = download_url(ENDPOINT, "demo.appspot.com", &path, "tok");
        assert_eq!(object_path_from_url(&url).unwrap(), path);
    }

    #[test]
    fn test_parse_without_query() {
        let url = format!("{}/b/bucket/o/a%2Fb.png", ENDPOINT);
        assert_eq!(object_path_from_url(&url).unwrap(), "a/b.png");
    }

    #[test]
    fn test_parse_rejects_foreign_urls() {
        assert!(object_path_from_url("https://example.com/logo.png").is_err());
        assert!(object_path_from_url("https://example.com/o/?alt=media").is_err());
    }
}

//! Blocking resource fetch for headless configurations.
//!
//! The engine itself never performs I/O: hosts fetch stylesheets and
//! images through their `DocumentContainer` implementation. This module
//! is the fetcher the bundled headless container uses. It understands
//! `http(s):`, `file:` and `data:` URLs and returns raw bytes.

use base64::Engine as _;
use url::Url;

/// Errors produced while fetching a resource.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The URL scheme is not one the fetcher understands.
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    /// A `file:` URL did not map to a readable path.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),

    /// The HTTP request failed or returned a non-success status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A `data:` URL payload could not be decoded.
    #[error("malformed data URL")]
    BadDataUrl,
}

/// Fetch the bytes behind `url`.
pub fn fetch(url: &Url) -> Result<Vec<u8>, FetchError> {
    match url.scheme() {
        "http" | "https" => {
            let response = reqwest::blocking::get(url.clone())?.error_for_status()?;
            Ok(response.bytes()?.to_vec())
        }
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad file URL"))?;
            Ok(std::fs::read(path)?)
        }
        "data" => decode_data_url(url),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Fetch a resource and interpret the bytes as UTF-8 text (lossy).
pub fn fetch_text(url: &Url) -> Result<String, FetchError> {
    let bytes = fetch(url)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode an RFC 2397 `data:` URL payload.
///
/// `data:[<mediatype>][;base64],<data>`
fn decode_data_url(url: &Url) -> Result<Vec<u8>, FetchError> {
    let content = url.path();
    let comma = content.find(',').ok_or(FetchError::BadDataUrl)?;
    let (meta, payload) = content.split_at(comma);
    let payload = &payload[1..];

    if meta.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|_| FetchError::BadDataUrl)
    } else {
        // Percent-decoded textual payload.
        let decoded: Vec<u8> = percent_decode(payload);
        Ok(decoded)
    }
}

/// Minimal percent-decoding (no '+' handling; data URLs use %XX only).
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = &input[i + 1..i + 3];
            if let Ok(v) = u8::from_str_radix(hex, 16) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_base64() {
        let url = Url::parse("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(fetch(&url).unwrap(), b"hello");
    }

    #[test]
    fn data_url_plain() {
        let url = Url::parse("data:,hello%20world").unwrap();
        assert_eq!(fetch(&url).unwrap(), b"hello world");
    }

    #[test]
    fn unsupported_scheme() {
        let url = Url::parse("ftp://example.com/x").unwrap();
        assert!(matches!(
            fetch(&url),
            Err(FetchError::UnsupportedScheme(_))
        ));
    }
}

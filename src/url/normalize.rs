use crate::UrlError;
use percent_encoding::percent_decode_str;
use url::Url;

/// Normalizes a URL according to the safe normalization policy
///
/// Two URLs naming the same resource produce the same string after this,
/// which is what crawl deduplication and fragment bookkeeping key on.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything but http and https, and URLs without a host
/// 3. Lowercase scheme and host, drop the default port, remove dot segments
///    and percent-encode characters that must be encoded (done by parsing)
/// 4. Uppercase percent-escapes and decode escapes of unreserved characters
///    in the path and query
/// 5. Remove an empty query string (trailing `?`)
///
/// The fragment is kept so callers can split it off themselves.
///
/// # Examples
///
/// ```
/// use anchorwatch::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM:80/a/./b/../%7euser?").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a/~user");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    let path = normalize_escapes(url.path());
    url.set_path(&path);

    match url.query() {
        Some("") => url.set_query(None),
        Some(query) => {
            let query = normalize_escapes(query);
            url.set_query(Some(&query));
        }
        None => {}
    }

    Ok(url)
}

/// Normalizes a URL and returns its canonical string form
pub fn normalize_url_string(url_str: &str) -> Result<String, UrlError> {
    normalize_url(url_str).map(String::from)
}

/// Uppercases percent-escapes and decodes the ones that encode unreserved
/// characters (`ALPHA / DIGIT / "-" / "." / "_" / "~"`).
fn normalize_escapes(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                let decoded = hi << 4 | lo;
                if is_unreserved(decoded) {
                    out.push(decoded);
                } else {
                    out.push(b'%');
                    out.push(bytes[i + 1].to_ascii_uppercase());
                    out.push(bytes[i + 2].to_ascii_uppercase());
                }
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Decodes every percent-escape in `input`, replacing invalid UTF-8 lossily
pub(crate) fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

//! Parse HTTP response header lines.

/// Headers of the final response that callers care about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// Body size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Content-Type` value if present.
    pub content_type: Option<String>,
}

/// Parse collected header lines into ResponseHeaders.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut headers = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    headers.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("content-type") {
                headers.content_type = Some(value.to_string());
            }
        }
    }

    headers
}

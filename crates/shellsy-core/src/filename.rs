//! Destination filename derivation for `dload` into a directory.

/// Used when the URL path yields nothing usable.
pub const FALLBACK_FILENAME: &str = "download.bin";

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Derives a safe local filename from the last non-empty path segment of `url`.
///
/// `https://example.com/pub/debian-12.iso?sig=1` → `debian-12.iso`;
/// `https://example.com/` → `download.bin`.
pub fn filename_for_url(url: &url::Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("");
    let cleaned = sanitize(segment);
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// Makes `name` safe as a single Linux path component.
///
/// Separators, NUL, whitespace and control characters become `_` (runs collapse
/// to one); leading and trailing dots, spaces and underscores are trimmed; the
/// result is cut to NAME_MAX bytes on a char boundary.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let bad = c == '/' || c == '\\' || c == '\0' || c.is_whitespace() || c.is_control();
        if bad {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_' || c == ' ');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

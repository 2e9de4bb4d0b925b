use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const FALLBACK_IMAGE: &str = "/file.svg";

// Same reserved set as a browser's encodeURIComponent
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

fn is_absolute(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();

    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolves a stored image value into something a browser can load.
///
/// Absolute URLs pass through. Anything else is a storage object path, served from the
/// bucket when one is configured and from the site root otherwise.
pub fn build_image_url(raw: Option<&str>, bucket: Option<&str>) -> String {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return FALLBACK_IMAGE.to_string();
    };

    if is_absolute(raw) {
        return raw.to_string();
    }

    let trimmed = raw.trim_start_matches('/');
    if trimmed.is_empty() {
        return FALLBACK_IMAGE.to_string();
    }

    match bucket {
        Some(bucket) => format!(
            "https://firebasestorage.googleapis.com/v0/b/{bucket}/o/{}?alt=media",
            utf8_percent_encode(trimmed, COMPONENT)
        ),
        None => format!("/{trimmed}"),
    }
}

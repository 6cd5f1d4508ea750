use super::types::UNKNOWN_FORMAT;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_\s-]").expect("static regex is valid")
});
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

/// Turns a free-form title into a filesystem-safe stem.
///
/// Drops everything except ASCII word characters, whitespace and `-`, then
/// replaces each whitespace run with a single `_`.
pub fn sanitize_filename(title: &str) -> String {
    let stripped = DISALLOWED_CHARS.replace_all(title, "");
    WHITESPACE_RUN.replace_all(&stripped, "_").into_owned()
}

/// `<stem>_<index + 1>.<format>`; the 1-based index keeps concurrent writes apart.
pub fn media_filename(title: &str, index: usize, format: &str) -> String {
    format!("{}_{}.{}", sanitize_filename(title), index + 1, format)
}

/// Lowercase extension of the URL's last path segment, or `None`.
pub fn url_extension(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;

    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

/// Extension from the URL, then from a MIME type such as `image/png`, else `"unknown"`.
pub fn media_format(url: &str, mime_type: Option<&str>) -> String {
    url_extension(url)
        .or_else(|| {
            mime_type
                .and_then(|mime| mime.split_once('/'))
                .map(|(_, subtype)| subtype.split(';').next().unwrap_or(subtype).trim())
                .filter(|subtype| !subtype.is_empty())
                .map(|subtype| match subtype {
                    "jpeg" => "jpg".to_string(),
                    other => other.to_ascii_lowercase(),
                })
        })
        .unwrap_or_else(|| UNKNOWN_FORMAT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My: Album! #1"), "My_Album_1");
        assert_eq!(sanitize_filename("Cats - cute (Album)"), "Cats_-_cute_Album");
        assert_eq!(sanitize_filename("tabs\tand\n\nnewlines"), "tabs_and_newlines");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_media_filename() {
        assert_eq!(media_filename("My: Album! #1", 1, "jpg"), "My_Album_1_2.jpg");
        assert_eq!(media_filename("Untitled", 0, "unknown"), "Untitled_1.unknown");
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://i.imgur.com/abc123.PNG"), Some("png".to_string()));
        assert_eq!(url_extension("https://i.imgur.com/abc123.gifv?x=1"), Some("gifv".to_string()));
        assert_eq!(url_extension("https://i.imgur.com/abc123"), None);
        assert_eq!(url_extension("https://imgur.com/a.b/abc123"), None);
        assert_eq!(url_extension("not a url.jpg"), Some("jpg".to_string()));
    }

    #[test]
    fn test_media_format_falls_back() {
        assert_eq!(media_format("https://i.imgur.com/abc.mp4", Some("image/png")), "mp4");
        assert_eq!(media_format("https://i.imgur.com/abc", Some("image/jpeg")), "jpg");
        assert_eq!(media_format("https://i.imgur.com/abc", Some("video/MP4")), "mp4");
        assert_eq!(media_format("https://i.imgur.com/abc", None), "unknown");
        assert_eq!(media_format("https://i.imgur.com/abc", Some("garbage")), "unknown");
    }
}

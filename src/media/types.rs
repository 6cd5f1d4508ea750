use serde::Serialize;
use std::path::PathBuf;

/// Format tag used when a media URL carries no recognizable extension.
pub const UNKNOWN_FORMAT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub title: String,
    pub author: String,
    pub platform: String,
    pub views: u64,
    /// Upvotes minus downvotes, can be negative.
    pub likes: i64,
}

/// One retrievable asset of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEntry {
    pub url: String,
    pub quality: String,
    pub format: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    pub urls: Vec<UrlEntry>,
    pub metadata: MediaMetadata,
}

/// Per-call options resolved by the caller.
#[derive(Debug, Clone, Default)]
pub struct MediaOptions {
    pub download_media: bool,
}

#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub download_dir: PathBuf,
}

impl HandlerConfig {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_entry_serializes_local_path_only_when_set() {
        let mut entry = UrlEntry {
            url: "https://i.imgur.com/abc.png".to_string(),
            quality: "original".to_string(),
            format: "png".to_string(),
            size: 0,
            local_path: None,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("localPath").is_none());

        entry.local_path = Some(PathBuf::from("/tmp/abc_1.png"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["localPath"], "/tmp/abc_1.png");
    }

    #[test]
    fn test_media_options_default_does_not_download() {
        assert!(!MediaOptions::default().download_media);
    }
}

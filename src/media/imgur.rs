use super::{
    diagnostics::Diagnostics,
    error::{MediaError, MediaResult},
    handler::PlatformHandler,
    http::{FileFetcher, Transport},
    types::{HandlerConfig, MediaInfo, MediaMetadata, MediaOptions, UrlEntry},
    utils::{media_filename, media_format},
};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::{fmt, path::Path, sync::Arc};
use url::Url;

pub const PLATFORM: &str = "imgur";
pub const DEFAULT_API_BASE: &str = "https://api.imgur.com/3";

const DIRECT_ASSET_HOST: &str = "i.imgur.com";
const QUALITY_ORIGINAL: &str = "original";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Album,
}

impl ResourceKind {
    fn endpoint_segment(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Album => "album",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint_segment())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    pub kind: ResourceKind,
    pub id: String,
}

/// Maps an Imgur URL onto the API resource it names.
///
/// Missing path segments yield an empty id; the API then answers "not found".
pub fn classify_url(url: &Url) -> ResourceReference {
    let mut segments = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter();

    let first = segments.next().unwrap_or_default();

    if url.host_str() == Some(DIRECT_ASSET_HOST) {
        return ResourceReference {
            kind: ResourceKind::Image,
            id: first.split('.').next().unwrap_or_default().to_string(),
        };
    }

    match first {
        "gallery" | "a" => ResourceReference {
            kind: ResourceKind::Album,
            id: segments.next().unwrap_or_default().to_string(),
        },
        _ => ResourceReference {
            kind: ResourceKind::Image,
            id: first.to_string(),
        },
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawImage {
    link: Option<String>,
    #[serde(rename = "type")]
    mime_type: Option<String>,
    size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    title: Option<String>,
    description: Option<String>,
    is_album: Option<bool>,
    images: Option<Vec<RawImage>>,
    link: Option<String>,
    #[serde(rename = "type")]
    mime_type: Option<String>,
    size: Option<u64>,
    account_url: Option<String>,
    views: Option<u64>,
    ups: Option<i64>,
    downs: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgurAsset {
    pub link: String,
    pub mime_type: Option<String>,
    pub size: u64,
}

impl ImgurAsset {
    fn from_raw(link: Option<String>, mime_type: Option<String>, size: Option<u64>) -> Option<Self> {
        link.filter(|l| !l.is_empty()).map(|link| Self {
            link,
            mime_type,
            size: size.unwrap_or(0),
        })
    }
}

/// Shape of the payload, decided by `is_album`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImgurMedia {
    Single(Option<ImgurAsset>),
    Album(Vec<ImgurAsset>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgurRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub account_url: Option<String>,
    pub views: u64,
    pub ups: i64,
    pub downs: i64,
    pub media: ImgurMedia,
}

impl ImgurRecord {
    /// Validates the `data` object of an API envelope. When the API leaves out
    /// `is_album`, the kind of resource that was requested decides the shape.
    fn from_value(data: serde_json::Value, requested: ResourceKind) -> Option<Self> {
        if !data.is_object() {
            return None;
        }
        let raw: RawRecord = serde_json::from_value(data).ok()?;

        let is_album = raw.is_album.unwrap_or(requested == ResourceKind::Album);
        let media = if is_album {
            ImgurMedia::Album(
                raw.images
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|img| ImgurAsset::from_raw(img.link, img.mime_type, img.size))
                    .collect(),
            )
        } else {
            ImgurMedia::Single(ImgurAsset::from_raw(raw.link, raw.mime_type, raw.size))
        };

        Some(Self {
            title: raw.title,
            description: raw.description,
            account_url: raw.account_url,
            views: raw.views.unwrap_or(0),
            ups: raw.ups.unwrap_or(0),
            downs: raw.downs.unwrap_or(0),
            media,
        })
    }

    pub fn is_album(&self) -> bool {
        matches!(self.media, ImgurMedia::Album(_))
    }

    pub fn likes(&self) -> i64 {
        self.ups.saturating_sub(self.downs)
    }

    /// One entry per asset, in the order the API lists them.
    pub fn url_entries(&self) -> Vec<UrlEntry> {
        let assets: &[ImgurAsset] = match &self.media {
            ImgurMedia::Album(images) => images,
            ImgurMedia::Single(Some(asset)) => std::slice::from_ref(asset),
            ImgurMedia::Single(None) => &[],
        };

        assets
            .iter()
            .map(|asset| UrlEntry {
                url: asset.link.clone(),
                quality: QUALITY_ORIGINAL.to_string(),
                format: media_format(&asset.link, asset.mime_type.as_deref()),
                size: asset.size,
                local_path: None,
            })
            .collect()
    }

    pub fn display_title(&self) -> String {
        let mut title = non_empty(self.title.as_deref())
            .unwrap_or("Untitled")
            .to_string();

        if let Some(description) = non_empty(self.description.as_deref()) {
            title.push_str(" - ");
            title.push_str(description);
        }

        if self.is_album() {
            title.push_str(" (Album)");
        }

        title.trim().to_string()
    }

    pub fn metadata(&self, title: String) -> MediaMetadata {
        MediaMetadata {
            title,
            author: non_empty(self.account_url.as_deref())
                .unwrap_or("Unknown")
                .to_string(),
            platform: PLATFORM.to_string(),
            views: self.views,
            likes: self.likes(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub struct ImgurHandler {
    client_id: String,
    api_base: String,
    transport: Arc<dyn Transport>,
    files: Arc<dyn FileFetcher>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ImgurHandler {
    pub fn new(
        client_id: impl Into<String>,
        transport: Arc<dyn Transport>,
        files: Arc<dyn FileFetcher>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            transport,
            files,
            diagnostics,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_record(&self, reference: &ResourceReference) -> MediaResult<ImgurRecord> {
        let endpoint = format!("{}/{}/{}", self.api_base, reference.kind, reference.id);
        let auth = format!("Client-ID {}", self.client_id);

        let response = match self
            .transport
            .get(&endpoint, &[("Authorization", auth.as_str())])
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.diagnostics
                    .error(&format!("Imgur API request for {} failed: {:#}", endpoint, e));
                return Err(MediaError::FetchFailed(format!(
                    "Imgur API request for {} {} failed",
                    reference.kind, reference.id
                )));
            }
        };

        if response.status == 404 {
            return Err(not_found(reference));
        }

        if !response.is_success() {
            self.diagnostics.error(&format!(
                "Imgur API returned HTTP {} for {}",
                response.status, endpoint
            ));
            return Err(MediaError::FetchFailed(format!(
                "Imgur API returned HTTP {}",
                response.status
            )));
        }

        let envelope: ApiEnvelope = serde_json::from_str(&response.body).map_err(|e| {
            self.diagnostics
                .error(&format!("Malformed Imgur API response from {}: {}", endpoint, e));
            MediaError::FetchFailed("Malformed Imgur API response".to_string())
        })?;

        if !envelope.success {
            return Err(not_found(reference));
        }

        envelope
            .data
            .and_then(|data| ImgurRecord::from_value(data, reference.kind))
            .ok_or_else(|| not_found(reference))
    }

    async fn download_entries(
        &self,
        entries: Vec<UrlEntry>,
        directory: &Path,
        title: &str,
    ) -> Vec<UrlEntry> {
        let downloads = entries.into_iter().enumerate().map(|(index, mut entry)| {
            let filename = media_filename(title, index, &entry.format);
            async move {
                match self.files.download_file(&entry.url, directory, &filename).await {
                    Ok(path) => {
                        self.diagnostics
                            .info(&format!("Downloaded {} to {}", entry.url, path.display()));
                        entry.local_path = Some(path);
                    }
                    Err(e) => {
                        self.diagnostics
                            .error(&format!("Failed to download {}: {:#}", entry.url, e));
                    }
                }
                entry
            }
        });

        join_all(downloads).await
    }
}

fn not_found(reference: &ResourceReference) -> MediaError {
    MediaError::NotFound(format!("Imgur {} '{}'", reference.kind, reference.id))
}

#[async_trait]
impl PlatformHandler for ImgurHandler {
    fn name(&self) -> &'static str {
        PLATFORM
    }

    fn is_valid_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        parsed
            .host_str()
            .map(|host| host == "imgur.com" || host.ends_with(".imgur.com"))
            .unwrap_or(false)
    }

    async fn get_media_info(
        &self,
        url: &str,
        options: &MediaOptions,
        config: &HandlerConfig,
    ) -> MediaResult<MediaInfo> {
        if !self.is_valid_url(url) {
            return Err(MediaError::InvalidUrl(url.to_string()));
        }
        let parsed = Url::parse(url).map_err(|_| MediaError::InvalidUrl(url.to_string()))?;

        let reference = classify_url(&parsed);
        self.diagnostics.info(&format!(
            "Resolved {} to Imgur {} '{}'",
            url, reference.kind, reference.id
        ));

        let record = self.fetch_record(&reference).await?;

        let title = record.display_title();
        let mut urls = record.url_entries();
        self.diagnostics
            .info(&format!("Found {} media URLs for '{}'", urls.len(), title));

        if options.download_media && !urls.is_empty() {
            urls = self
                .download_entries(urls, &config.download_dir, &title)
                .await;
        }

        Ok(MediaInfo {
            urls,
            metadata: record.metadata(title),
        })
    }
}

use super::error::MediaResult;
use super::types::{HandlerConfig, MediaInfo, MediaOptions};
use async_trait::async_trait;

#[async_trait]
pub trait PlatformHandler: Send + Sync {
    /// Short platform identifier, also reported in `MediaMetadata::platform`
    fn name(&self) -> &'static str;

    /// Structural check that the URL belongs to this platform. Never touches the network.
    fn is_valid_url(&self, url: &str) -> bool;

    /// Resolve the URL into a uniform media description, downloading the
    /// files into `config.download_dir` when `options.download_media` is set
    async fn get_media_info(
        &self,
        url: &str,
        options: &MediaOptions,
        config: &HandlerConfig,
    ) -> MediaResult<MediaInfo>;
}

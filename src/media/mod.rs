mod diagnostics;
mod error;
mod handler;
mod http;
pub mod imgur;
mod types;
mod utils;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{MediaError, MediaResult};
pub use handler::PlatformHandler;
pub use http::{FileFetcher, HttpFileFetcher, HttpResponse, ReqwestTransport, Transport};
pub use types::{HandlerConfig, MediaInfo, MediaMetadata, MediaOptions, UrlEntry, UNKNOWN_FORMAT};
pub use utils::sanitize_filename;

use crate::config::ImgurSettings;
use anyhow::{Context, Result};
use imgur::ImgurHandler;
use std::sync::Arc;

pub struct MediaRegistry {
    handlers: Vec<Box<dyn PlatformHandler>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl MediaRegistry {
    /// Registry with every built-in platform, wired to real HTTP collaborators.
    pub fn from_settings(imgur: &ImgurSettings, diagnostics: Arc<dyn Diagnostics>) -> Result<Self> {
        let timeout = imgur.timeout();
        let transport =
            Arc::new(ReqwestTransport::new(timeout).context("Failed to initialize API transport")?);
        let files =
            Arc::new(HttpFileFetcher::new(timeout).context("Failed to initialize file fetcher")?);

        let handlers: Vec<Box<dyn PlatformHandler>> = vec![Box::new(
            ImgurHandler::new(
                imgur.client_id.clone(),
                transport,
                files,
                diagnostics.clone(),
            )
            .with_api_base(imgur.api_base.clone()),
        )];

        Ok(Self::with_handlers(handlers, diagnostics))
    }

    /// Handlers are tried in the given order.
    pub fn with_handlers(
        handlers: Vec<Box<dyn PlatformHandler>>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        let names: Vec<_> = handlers.iter().map(|h| h.name()).collect();
        diagnostics.info(&format!(
            "Media registry initialized with handlers: {}",
            names.join(", ")
        ));

        Self {
            handlers,
            diagnostics,
        }
    }

    pub fn handler_for(&self, url: &str) -> Option<&dyn PlatformHandler> {
        self.handlers
            .iter()
            .find(|h| h.is_valid_url(url))
            .map(|h| &**h)
    }

    pub fn is_supported_url(&self, url: &str) -> bool {
        self.handler_for(url).is_some()
    }

    pub async fn get_media_info(
        &self,
        url: &str,
        options: &MediaOptions,
        config: &HandlerConfig,
    ) -> MediaResult<MediaInfo> {
        let handler = self.handler_for(url).ok_or_else(|| {
            self.diagnostics
                .error(&format!("No handler accepts URL: {}", url));
            MediaError::UnsupportedUrl(url.to_string())
        })?;

        self.diagnostics
            .info(&format!("Fetching media info for {} with {}", url, handler.name()));

        handler.get_media_info(url, options, config).await
    }
}

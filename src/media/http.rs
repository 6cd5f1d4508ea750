use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Raw answer of a platform API call.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Store the remote file as `directory/filename` and return the written path
    async fn download_file(&self, url: &str, directory: &Path, filename: &str) -> Result<PathBuf>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, endpoint: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!("GET {}", endpoint);

        let mut request = self.client.get(endpoint);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", endpoint))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(HttpResponse { status, body })
    }
}

pub struct HttpFileFetcher {
    client: reqwest::Client,
}

impl HttpFileFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn download_file(&self, url: &str, directory: &Path, filename: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(directory)
            .await
            .with_context(|| format!("Failed to create directory {}", directory.display()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch media URL")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to download media: HTTP {}",
                response.status()
            ));
        }

        let path = directory.join(filename);
        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create file {}", path.display()))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read media data")?;
            file.write_all(&chunk)
                .await
                .context("Failed to write media data")?;
            written += chunk.len() as u64;
        }
        file.flush().await.context("Failed to flush media file")?;

        debug!("Downloaded {} bytes to {}", written, path.display());
        Ok(path)
    }
}

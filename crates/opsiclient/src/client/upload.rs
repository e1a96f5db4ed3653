//! WebDAV package upload.
//!
//! Package files are staged in the server's repository with a plain
//! `PUT {webdav}/{path}/{filename}`. Anything but 201 Created is a failure.

use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, StatusCode};
use tokio_util::io::ReaderStream;

use crate::error::{OpsiError, Result};

/// Default deadline for one upload.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Uploads package files to an OPSI WebDAV share.
pub struct PackageUploader {
    webdav_url: String,
    client: Client,
    username: String,
    password: String,
    timeout: Duration,
}

impl PackageUploader {
    pub fn new(
        webdav_url: &str,
        username: &str,
        password: &str,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        if webdav_url.trim().is_empty() {
            return Err(OpsiError::invalid_argument("WebDAV URL must not be empty"));
        }
        if username.is_empty() {
            return Err(OpsiError::invalid_argument("username must not be empty"));
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            webdav_url: webdav_url.trim().trim_end_matches('/').to_string(),
            client,
            username: username.to_string(),
            password: password.to_string(),
            timeout: DEFAULT_UPLOAD_TIMEOUT,
        })
    }

    /// Override the per-upload deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn webdav_url(&self) -> &str {
        &self.webdav_url
    }

    /// Full URL a file is uploaded to.
    pub fn target_url(&self, path_on_server: &str, filename: &str) -> String {
        let path = path_on_server.trim_matches('/');
        if path.is_empty() {
            format!("{}/{}", self.webdav_url, filename)
        } else {
            format!("{}/{}/{}", self.webdav_url, path, filename)
        }
    }

    /// Upload a body as `filename` below `path_on_server`.
    #[tracing::instrument(skip(self, body), fields(webdav.url = %self.webdav_url))]
    pub async fn upload(
        &self,
        path_on_server: &str,
        filename: &str,
        body: impl Into<Body>,
    ) -> Result<()> {
        self.put(path_on_server, filename, body.into(), None).await
    }

    /// Stream a local file to the share, keeping its file name.
    #[tracing::instrument(skip(self), fields(webdav.url = %self.webdav_url))]
    pub async fn upload_file(&self, path_on_server: &str, local_path: &Path) -> Result<()> {
        let filename = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                OpsiError::InvalidArgument(format!(
                    "{} has no usable file name",
                    local_path.display()
                ))
            })?
            .to_string();

        let file = tokio::fs::File::open(local_path).await?;
        let len = file.metadata().await?.len();
        let body = Body::wrap_stream(ReaderStream::new(file));

        self.put(path_on_server, &filename, body, Some(len)).await
    }

    async fn put(
        &self,
        path_on_server: &str,
        filename: &str,
        body: Body,
        len: Option<u64>,
    ) -> Result<()> {
        if filename.is_empty() {
            return Err(OpsiError::invalid_argument("filename must not be empty"));
        }

        let url = self.target_url(path_on_server, filename);
        tracing::info!(url = %url, "uploading package");

        let mut request = self
            .client
            .put(&url)
            .basic_auth(&self.username, Some(&self.password))
            .timeout(self.timeout);
        if let Some(len) = len {
            request = request.header(CONTENT_LENGTH, len);
        }

        let response = request.body(body).send().await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            tracing::warn!(url = %url, status = status.as_u16(), "package upload rejected");
            return Err(OpsiError::PackageUpload {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_joins_segments() {
        let uploader =
            PackageUploader::new("https://opsi.example.org:4447/repository/", "admin", "pw", false)
                .unwrap();

        assert_eq!(uploader.webdav_url(), "https://opsi.example.org:4447/repository");
        assert_eq!(
            uploader.target_url("/packages/", "firefox_124.0-1.opsi"),
            "https://opsi.example.org:4447/repository/packages/firefox_124.0-1.opsi"
        );
        assert_eq!(
            uploader.target_url("", "firefox_124.0-1.opsi"),
            "https://opsi.example.org:4447/repository/firefox_124.0-1.opsi"
        );
    }

    #[test]
    fn test_rejects_missing_arguments() {
        assert!(matches!(
            PackageUploader::new("", "admin", "pw", false),
            Err(OpsiError::InvalidArgument(_))
        ));
        assert!(matches!(
            PackageUploader::new("https://opsi.example.org/repository", "", "pw", false),
            Err(OpsiError::InvalidArgument(_))
        ));
    }
}

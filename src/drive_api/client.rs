use async_trait::async_trait;

use crate::error::{Result, SweepError};
use crate::types::FilePage;

use super::auth::AccessTokenSource;
use super::{files, operations};

pub const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

// Remote operations the sweep needs; mocked in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriveApi: Send + Sync {
    async fn list_page(&self, query: &str, page_token: Option<String>) -> Result<FilePage>;
    async fn download(&self, file_id: &str) -> Result<Vec<u8>>;
    async fn trash(&self, file_id: &str) -> Result<()>;
}

/// Drive v3 client. Every request asks the token source for a bearer token,
/// so a run outliving one access token picks up the refreshed one.
pub struct DriveClient {
    pub(crate) http: reqwest::Client,
    tokens: Box<dyn AccessTokenSource>,
    pub(crate) files_url: String,
}

impl DriveClient {
    pub fn new(http: reqwest::Client, tokens: Box<dyn AccessTokenSource>) -> Self {
        Self::with_files_url(http, tokens, DRIVE_FILES_URL)
    }

    pub fn with_files_url(
        http: reqwest::Client,
        tokens: Box<dyn AccessTokenSource>,
        files_url: impl Into<String>,
    ) -> Self {
        let files_url: String = files_url.into();
        Self {
            http,
            tokens,
            files_url: files_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn file_url(&self, file_id: &str) -> String {
        format!("{}/{}", self.files_url, file_id)
    }

    pub(crate) async fn bearer(&self) -> Result<String> {
        self.tokens.access_token().await
    }
}

// Turn a non-success response into an API error carrying the body text.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(SweepError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn list_page(&self, query: &str, page_token: Option<String>) -> Result<FilePage> {
        files::list_files_page(self, query, page_token.as_deref()).await
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        operations::download_file(self, file_id).await
    }

    async fn trash(&self, file_id: &str) -> Result<()> {
        operations::trash_file(self, file_id).await
    }
}

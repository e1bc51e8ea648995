use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::Result;
use crate::types::{FileListResponse, FilePage};

use super::client::{check_status, DriveClient};

pub const LIST_FIELDS: &str = "nextPageToken, files(id, name)";
pub const CUTOFF_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Owned images and videos last modified before a cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub modified_before: NaiveDateTime,
}

impl MediaQuery {
    pub fn new(modified_before: NaiveDateTime) -> Self {
        Self { modified_before }
    }

    pub fn to_query(&self) -> String {
        format!(
            "(mimeType contains 'image/' or mimeType contains 'video/') and modifiedTime < '{}' and 'me' in owners",
            self.modified_before.format(CUTOFF_FORMAT)
        )
    }
}

pub fn parse_cutoff(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, CUTOFF_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {}", e))
}

// Fetch one page of matching files
pub async fn list_files_page(
    client: &DriveClient,
    query: &str,
    page_token: Option<&str>,
) -> Result<FilePage> {
    let mut params = vec![("q", query), ("spaces", "drive"), ("fields", LIST_FIELDS)];
    if let Some(token) = page_token {
        params.push(("pageToken", token));
    }

    let token = client.bearer().await?;
    let response = client
        .http
        .get(&client.files_url)
        .query(&params)
        .bearer_auth(&token)
        .send()
        .await?;
    let listing: FileListResponse = check_status(response).await?.json().await?;
    let page = FilePage::from(listing);

    debug!(
        files = page.files.len(),
        has_next = page.next_page_token.is_some(),
        "listed page"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive_api::client::test_support::*;
    use crate::types::DriveFileRef;

    #[test]
    fn test_default_cutoff_query() {
        let query = MediaQuery::new(parse_cutoff("2020-01-01T12:00:00").unwrap());
        assert_eq!(
            query.to_query(),
            "(mimeType contains 'image/' or mimeType contains 'video/') and modifiedTime < '2020-01-01T12:00:00' and 'me' in owners"
        );
    }

    #[test]
    fn test_parse_cutoff_rejects_dates_without_time() {
        assert!(parse_cutoff("2020-01-01").is_err());
        assert!(parse_cutoff("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_first_page_request() {
        let server = StubServer::start(vec![Reply::Json(
            200,
            r#"{"nextPageToken":"next-1","files":[{"id":"a1","name":"beach.jpg"}]}"#.to_string(),
        )])
        .await;
        let client = client_for(&server, fixed_tokens("t0k"));
        let query = MediaQuery::new(parse_cutoff("2020-01-01T12:00:00").unwrap()).to_query();

        let page = list_files_page(&client, &query, None).await.unwrap();

        assert_eq!(page.files, vec![DriveFileRef::new("a1", "beach.jpg")]);
        assert_eq!(page.next_page_token.as_deref(), Some("next-1"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path(), "/files");
        assert_eq!(requests[0].header("authorization"), Some("Bearer t0k"));
        assert_eq!(requests[0].query_value("q"), Some(query));
        assert_eq!(requests[0].query_value("spaces").as_deref(), Some("drive"));
        assert_eq!(requests[0].query_value("fields").as_deref(), Some(LIST_FIELDS));
        assert_eq!(requests[0].query_value("pageToken"), None);
    }

    #[tokio::test]
    async fn test_follow_up_page_sends_cursor() {
        let server = StubServer::start(vec![Reply::Json(200, "{}".to_string())]).await;
        let client = client_for(&server, fixed_tokens("t0k"));

        let page = list_files_page(&client, "q", Some("next-1")).await.unwrap();

        assert!(page.files.is_empty());
        assert_eq!(page.next_page_token, None);
        assert_eq!(
            server.requests()[0].query_value("pageToken").as_deref(),
            Some("next-1")
        );
    }
}

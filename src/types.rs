use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    pub next_page_token: Option<String>,
    pub files: Option<Vec<DriveFileRef>>,
}

// Only id and name are requested from the listing.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DriveFileRef {
    pub id: String,
    pub name: String,
}

impl DriveFileRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One page of listing results plus the cursor for the next one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilePage {
    pub files: Vec<DriveFileRef>,
    pub next_page_token: Option<String>,
}

impl From<FileListResponse> for FilePage {
    fn from(response: FileListResponse) -> Self {
        Self {
            files: response.files.unwrap_or_default(),
            next_page_token: response.next_page_token,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrashState {
    #[serde(default)]
    pub trashed: bool,
}

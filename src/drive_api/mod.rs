//! Google Drive API module split into logical submodules
//!
//! - auth: credential loading, refresh and the consent flow
//! - client: the `DriveApi` seam and its reqwest implementation
//! - files: the media query and paginated listing
//! - operations: download and trash

pub mod auth;
pub mod client;
pub mod files;
pub mod operations;

pub use auth::{
    authenticate, clear_stored_credential, AccessTokenSource, CredentialPaths, DRIVE_SCOPE,
};
pub use client::{DriveApi, DriveClient, DRIVE_FILES_URL};
pub use files::{parse_cutoff, MediaQuery};

#[cfg(test)]
pub use client::MockDriveApi;

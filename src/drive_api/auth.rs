use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use yup_oauth2::storage::{TokenInfo, TokenStorage};
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod};

use crate::error::{Result, SweepError};

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// What gets written to the token file. The client secret travels with the
/// token so an expired token can be refreshed without `credentials.json`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoredCredential {
    pub client_secret: ApplicationSecret,
    pub scopes: Vec<String>,
    pub token: Option<TokenInfo>,
}

pub struct CredentialPaths {
    pub client_secret: PathBuf,
    pub token: PathBuf,
}

/// Token storage backed by a single JSON file, overwritten on every `set`.
pub struct TokenFile {
    path: PathBuf,
    client_secret: ApplicationSecret,
    held: Mutex<Option<StoredToken>>,
}

struct StoredToken {
    scopes: Vec<String>,
    token: TokenInfo,
}

impl TokenFile {
    pub fn new(
        path: impl Into<PathBuf>,
        client_secret: ApplicationSecret,
        scopes: Vec<String>,
        token: Option<TokenInfo>,
    ) -> Self {
        Self {
            path: path.into(),
            client_secret,
            held: Mutex::new(token.map(|token| StoredToken { scopes, token })),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, scopes: Vec<String>, token: TokenInfo) -> Result<()> {
        let credential = StoredCredential {
            client_secret: self.client_secret.clone(),
            scopes,
            token: Some(token),
        };
        let json = serde_json::to_string_pretty(&credential)
            .map_err(|e| SweepError::Auth(format!("could not encode credential: {}", e)))?;
        tokio::fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), "persisted credential");
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for TokenFile {
    async fn set(&self, scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        let scopes: Vec<String> = scopes.iter().map(|s| s.to_string()).collect();
        self.persist(scopes.clone(), token.clone())
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        *self.held.lock().await = Some(StoredToken { scopes, token });
        Ok(())
    }

    async fn get(&self, scopes: &[&str]) -> Option<TokenInfo> {
        let held = self.held.lock().await;
        held.as_ref()
            .filter(|stored| {
                scopes
                    .iter()
                    .all(|wanted| stored.scopes.iter().any(|s| s == wanted))
            })
            .map(|stored| stored.token.clone())
    }
}

/// Hands out a bearer token for each request. Implementations refresh
/// behind the scenes, so callers must not hold on to the string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// yup-oauth2 authenticator bound to the Drive scope. It caches the token,
/// refreshes it once expired and writes every new token through `TokenFile`.
pub struct DriveAuthenticator {
    auth: DefaultAuthenticator,
    scopes: Vec<String>,
}

#[async_trait]
impl AccessTokenSource for DriveAuthenticator {
    async fn access_token(&self) -> Result<String> {
        let scope_refs: Vec<&str> = self.scopes.iter().map(|s| s.as_str()).collect();
        let token = self.auth.token(&scope_refs).await?;
        token
            .token()
            .map(str::to_owned)
            .ok_or_else(|| SweepError::Auth("no access token was granted".to_string()))
    }
}

// Seam over the installed-app flow so credential resolution can be tested
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthFlow: Send + Sync {
    async fn authorize(
        &self,
        secret: ApplicationSecret,
        storage: TokenFile,
        scopes: Vec<String>,
    ) -> Result<Box<dyn AccessTokenSource>>;
}

pub struct RealOAuthFlow;

#[async_trait]
impl OAuthFlow for RealOAuthFlow {
    async fn authorize(
        &self,
        secret: ApplicationSecret,
        storage: TokenFile,
        scopes: Vec<String>,
    ) -> Result<Box<dyn AccessTokenSource>> {
        let auth =
            InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
                .with_storage(Box::new(storage))
                .build()
                .await
                .map_err(|e| SweepError::Auth(format!("could not build authenticator: {}", e)))?;
        let authenticator = DriveAuthenticator { auth, scopes };

        // Resolve once up front: a valid stored token is used as-is, an
        // expired one is refreshed, and anything else opens the browser
        // consent page on a localhost port before the sweep starts.
        authenticator.access_token().await?;
        Ok(Box::new(authenticator))
    }
}

async fn load_stored_credential(path: &Path) -> Option<StoredCredential> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no stored credential");
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(credential) => Some(credential),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable stored credential");
            None
        }
    }
}

async fn load_client_secret(path: &Path) -> Result<ApplicationSecret> {
    yup_oauth2::read_application_secret(path)
        .await
        .map_err(|source| SweepError::ClientSecret {
            path: path.to_path_buf(),
            source,
        })
}

/// Authorise for the Drive scope, reusing or refreshing the stored
/// credential when possible. The returned source stays valid for the run.
pub async fn authenticate(paths: &CredentialPaths) -> Result<Box<dyn AccessTokenSource>> {
    authenticate_with(paths, &RealOAuthFlow).await
}

async fn authenticate_with<O: OAuthFlow>(
    paths: &CredentialPaths,
    flow: &O,
) -> Result<Box<dyn AccessTokenSource>> {
    let scopes = vec![DRIVE_SCOPE.to_string()];

    let (secret, stored_scopes, token) = match load_stored_credential(&paths.token).await {
        Some(stored) => {
            info!(path = %paths.token.display(), "using stored credential");
            (stored.client_secret, stored.scopes, stored.token)
        }
        None => {
            info!(path = %paths.client_secret.display(), "no stored credential, loading client secret");
            (load_client_secret(&paths.client_secret).await?, Vec::new(), None)
        }
    };

    let storage = TokenFile::new(&paths.token, secret.clone(), stored_scopes, token);
    flow.authorize(secret, storage, scopes).await
}

/// Remove the stored credential so the next run goes through consent again.
pub async fn clear_stored_credential(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

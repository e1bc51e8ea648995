use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument};

use crate::drive_api::DriveApi;
use crate::error::Result;
use crate::local_store::LocalStore;

/// Run-scoped tallies. Passed in by the caller so progress made before an
/// abort is still visible afterwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepCounters {
    pub copied: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub query: String,
    /// Download only; leave remote originals in place.
    pub keep_remote: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepEvent {
    Downloaded(String),
    Trashed(String),
}

impl fmt::Display for SweepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepEvent::Downloaded(name) => write!(f, "Downloaded file: {}", name),
            SweepEvent::Trashed(name) => write!(f, "Trashed file: {}", name),
        }
    }
}

/// Page through every matching file, save a local copy of any not yet on
/// disk, then trash the remote original.
///
/// Trashing does not wait on a byte-for-byte check of the local copy; it only
/// requires that the download and save for that file did not fail. The first
/// error ends the run and nothing already trashed is restored.
#[instrument(skip_all)]
pub async fn run_sweep<D, F>(
    drive: &D,
    store: &LocalStore,
    options: &SweepOptions,
    counters: &mut SweepCounters,
    mut report: F,
) -> Result<()>
where
    D: DriveApi + ?Sized,
    F: FnMut(SweepEvent),
{
    let mut page_token: Option<String> = None;
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = drive.list_page(&options.query, page_token.take()).await?;
        pages += 1;

        for file in page.files {
            if !seen.insert(file.id.clone()) {
                debug!(file_id = %file.id, "already handled in this run");
                continue;
            }

            let path = store.path_for(&file.name);
            if !store.contains(&path).await? {
                let content = drive.download(&file.id).await?;
                if store.save(&path, &content).await? {
                    counters.copied += 1;
                    report(SweepEvent::Downloaded(file.name.clone()));
                }
            }

            if !options.keep_remote {
                drive.trash(&file.id).await?;
                counters.deleted += 1;
                report(SweepEvent::Trashed(file.name));
            }
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!(
        pages,
        copied = counters.copied,
        deleted = counters.deleted,
        "sweep complete"
    );
    Ok(())
}

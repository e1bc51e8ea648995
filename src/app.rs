use std::io::Write;
use tracing::{debug, info};

use crate::cli::{handle_token_clear, Cli};
use crate::drive_api::{authenticate, DriveApi, DriveClient, MediaQuery};
use crate::error::Result;
use crate::local_store::LocalStore;
use crate::sweep::{run_sweep, SweepCounters, SweepOptions};

pub async fn run(cli: Cli) -> Result<()> {
    if cli.clear_token {
        return handle_token_clear(&cli).await;
    }

    // Credential and filesystem failures propagate and end the process.
    let tokens = authenticate(&cli.credential_paths()).await?;
    let store = LocalStore::open(&cli.output_dir).await?;
    info!(output_dir = %store.root().display(), "saving into");

    let drive = DriveClient::new(reqwest::Client::new(), tokens);
    let options = SweepOptions {
        query: MediaQuery::new(cli.modified_before).to_query(),
        keep_remote: cli.keep_remote,
    };

    let stdout = std::io::stdout();
    sweep_and_report(&drive, &store, &options, &mut stdout.lock()).await?;
    Ok(())
}

/// Run the sweep, writing one line per file and then the two totals. A
/// provider error replaces the totals with a single `Error:` line and is not
/// returned; any other error is.
pub async fn sweep_and_report<D, W>(
    drive: &D,
    store: &LocalStore,
    options: &SweepOptions,
    out: &mut W,
) -> Result<SweepCounters>
where
    D: DriveApi + ?Sized,
    W: Write,
{
    let mut counters = SweepCounters::default();
    let mut write_error = None;
    let outcome = run_sweep(drive, store, options, &mut counters, |event| {
        if let Err(e) = writeln!(out, "{}", event) {
            write_error.get_or_insert(e);
        }
    })
    .await;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    match outcome {
        Ok(()) => {
            writeln!(out, "Copied a total of {} files", counters.copied)?;
            writeln!(out, "Deleted a total of {} files", counters.deleted)?;
        }
        Err(e) if e.is_provider_error() => {
            debug!(
                copied = counters.copied,
                deleted = counters.deleted,
                "sweep aborted"
            );
            writeln!(out, "Error: {}", e)?;
        }
        Err(e) => return Err(e),
    }
    out.flush()?;
    Ok(counters)
}

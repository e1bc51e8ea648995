use chrono::NaiveDateTime;
use clap::Parser;
use std::path::PathBuf;

use crate::drive_api::{clear_stored_credential, parse_cutoff, CredentialPaths};
use crate::error::Result;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// OAuth client secret, needed when no usable token is stored.
    #[clap(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Where the authorised token is kept between runs.
    #[clap(long, default_value = "token.json")]
    pub token: PathBuf,

    /// Directory that downloaded files are saved into.
    #[clap(long, default_value = "./DriveDownloadedLocally2")]
    pub output_dir: PathBuf,

    /// Only files last modified before this time (YYYY-MM-DDTHH:MM:SS).
    #[clap(long, default_value = "2020-01-01T12:00:00", value_parser = parse_cutoff)]
    pub modified_before: NaiveDateTime,

    /// Download files but leave the originals in Drive.
    #[clap(long)]
    pub keep_remote: bool,

    /// Delete the stored token and exit.
    #[clap(long)]
    pub clear_token: bool,

    /// More diagnostic output (repeat for more).
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn credential_paths(&self) -> CredentialPaths {
        CredentialPaths {
            client_secret: self.credentials.clone(),
            token: self.token.clone(),
        }
    }
}

pub async fn handle_token_clear(cli: &Cli) -> Result<()> {
    if clear_stored_credential(&cli.token).await? {
        println!("Removed stored token {}. Exiting.", cli.token.display());
    } else {
        println!("No stored token at {}. Exiting.", cli.token.display());
    }
    Ok(())
}

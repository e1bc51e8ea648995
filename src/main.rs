use clap::Parser;
use drivesweep::app;
use drivesweep::cli::Cli;
use drivesweep::logging::init_logging;

// One thread; every request and write is awaited in turn.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    app::run(cli).await?;
    Ok(())
}

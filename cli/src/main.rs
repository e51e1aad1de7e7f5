use anyhow::Context;
use clap::Parser;
use filealert_cli::{Cli, cancel_on_signal, init_tracing};
use filealert_dispatcher::{CancellationToken, Dispatcher};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing();

    match dotenv {
        Err(e) if !e.not_found() => warn!("Ignoring unreadable .env file: {e}"),
        _ => {}
    }

    let dispatcher = Dispatcher::new(cli.into_config()).context("cannot start monitoring")?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), cancel.clone()));

    info!("Press Ctrl+C to stop monitoring");
    dispatcher.run(cancel).await.context("monitoring failed")?;

    Ok(())
}

use clap::Parser;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use note_combiner::config::{Cli, Config};
use note_combiner::recorder::LedgerRecorder;
use note_combiner::rpc::WalletRpc;
use note_combiner::runner;

#[tokio::main]
async fn main() {
    // Start logging setup block
    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry().with(fmt_layer).init();

    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(err.exit_code());
        }
    };

    if let Err(err) = _main(config).await {
        tracing::error!("run failed: {err:#}");
        std::process::exit(1);
    }
}

async fn _main(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Combining notes of account {} via {}",
        config.account,
        config.rpc_url
    );

    let rpc = WalletRpc::new(&config.rpc_url)?;
    let mut recorder = LedgerRecorder::create(&config.output)?;

    let stats = runner::run(&rpc, &config, &mut recorder).await?;

    tracing::info!(
        "Finished successfully: {} notes processed, {} batches submitted covering {} notes",
        stats.processed,
        stats.submitted_batches,
        stats.submitted_notes
    );
    Ok(())
}

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ConfigLoader;
use crate::console::ConsoleMessenger;

#[derive(Args)]
pub struct PlayArgs {
    /// Study the configured source before listening
    #[arg(long)]
    pub study: bool,
}

/// Play trivia in the terminal until stdin closes or Ctrl+C
pub async fn run(args: PlayArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let messenger = Arc::new(ConsoleMessenger::new(config.console.clone()));
    let trivia = super::assemble(&config, messenger)?;
    let _logger = trivia.spawn_event_logger();

    if args.study || config.study.on_start {
        match trivia.study().await {
            Ok(report) => super::print_report(&report),
            Err(e) => warn!(error = %e, "Starting without studying"),
        }
    }

    let shutdown = CancellationToken::new();
    let on_ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    println!(
        "Playing in {}/{} as {}. Start a game with {:?}, react with /react <emoji> [ts].",
        config.console.team, config.console.channel, config.console.user, config.signals.start
    );
    trivia.listen(shutdown).await?;
    info!("Bye!");
    Ok(())
}

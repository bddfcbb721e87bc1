use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::config::ConfigLoader;
use crate::console::ConsoleMessenger;

#[derive(Args)]
pub struct StudyArgs {
    /// Fail when any record could not be learned
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run one study cycle against the configured source and print the report
pub async fn run(args: StudyArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let messenger = Arc::new(ConsoleMessenger::new(config.console.clone()));
    let trivia = super::assemble(&config, messenger)?;

    let report = trivia.study().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        super::print_report(&report);
    }

    if args.strict && !report.is_clean() {
        anyhow::bail!("{} records failed to learn", report.failed());
    }
    Ok(())
}

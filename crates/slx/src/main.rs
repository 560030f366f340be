use std::{process::ExitCode, sync::Arc};

use clap::Parser;

use slx_core::{
    api::paced::{PaceConfig, PacedApi},
    config::Config,
    export::{Exporter, ExportSummary},
};
use slx_slack::SlackWebClient;

/// Export a Slack workspace (conversations, users, emoji) to dated local
/// archives.
#[derive(Debug, Parser)]
#[command(name = "slx", version, about = "Export Slack workspace history to local archives")]
struct Args {
    /// Increase verbosity (debug-level logging)
    #[arg(short, long)]
    verbose: bool,

    /// Only export the custom emoji mapping
    #[arg(long)]
    only_emoji: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    slx_core::logging::init("slx", args.verbose);

    match run(&args).await {
        Ok(summary) => {
            println!("archive written to {}", summary.root.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("export failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> slx_core::Result<ExportSummary> {
    let cfg = Arc::new(Config::load()?);

    let client = Arc::new(SlackWebClient::new(cfg.token.clone(), cfg.http_timeout));
    let api = Arc::new(PacedApi::new(
        client,
        PaceConfig {
            max_calls: cfg.pace_max_calls,
            window: cfg.pace_window,
        },
    ));
    let exporter = Exporter::new(api, cfg);

    let summary = if args.only_emoji {
        exporter.run_emoji_only().await?
    } else {
        exporter.run().await?
    };

    tracing::info!(
        "exported {} conversations ({} messages, {} threads, {} files), {} users, {} emoji",
        summary.conversations,
        summary.messages,
        summary.threads,
        summary.files,
        summary.users,
        summary.emoji
    );

    Ok(summary)
}

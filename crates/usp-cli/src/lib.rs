//! Library surface behind the `usp` binary, so `main.rs` stays a thin entrypoint wrapping
//! `run()`.

pub mod cli;
pub mod logging;
pub mod output;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use usp_core::{EngineConfig, RecursionFilters};

use cli::{Cli, Commands, LsArgs};

/// Parse arguments and dispatch to the requested subcommand.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Ls(args) => run_ls(args).await,
    }
}

async fn run_ls(args: LsArgs) -> Result<()> {
    logging::initialize_logging(args.verbose, args.log_file.as_deref())
        .context("failed to initialize logging")?;

    let cfg = EngineConfig {
        use_robots_txt: !args.no_robots,
        use_known_paths: !args.no_known_paths,
        ..EngineConfig::default()
    };

    let tree = usp_core::sitemap_tree_for_homepage(&args.url, cfg, RecursionFilters::default(), None)
        .await
        .with_context(|| format!("failed to discover sitemaps for {}", args.url))?;

    if tree.sub_sitemaps().is_empty() {
        anyhow::bail!("no sitemaps discovered at {}", args.url);
    }

    let prefix = args.strip_prefix.then_some(args.url.as_str());
    print!("{}", output::render(args.format, &tree, prefix));
    Ok(())
}

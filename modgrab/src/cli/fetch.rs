// modgrab/src/cli/fetch.rs
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Args;
use colored::Colorize;
use modgrab_common::config::DEFAULT_DOWNLOAD_DIR;
use modgrab_common::error::Result;
use modgrab_common::event::ProgressSink;
use modgrab_core::{DependencyResolver, Downloader};
use modgrab_net::ModrinthClient;

use crate::cli::TargetArgs;
use crate::progress::ProgressReporter;
use crate::{export, report};

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Download directory
    #[arg(long, short = 'd', default_value = DEFAULT_DOWNLOAD_DIR)]
    pub dir: PathBuf,
}

impl FetchArgs {
    pub async fn run(&self) -> Result<()> {
        let mut config = self.target.to_config();
        config.download_dir = self.dir.clone();
        config.validate()?;
        let config = Arc::new(config);

        let registry = Arc::new(ModrinthClient::new(&config)?);
        let sink: Arc<dyn ProgressSink> = Arc::new(ProgressReporter::new());
        let seeds = self.target.seed_mods()?;

        let resolver =
            DependencyResolver::new(Arc::clone(&registry), Arc::clone(&config), Arc::clone(&sink));
        let resolution = tokio::select! {
            result = resolver.resolve(seeds) => result?,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\n{}", "interrupted, stopping".yellow().bold());
                process::exit(130);
            }
        };

        if let Some(path) = &self.target.graph {
            export::write_graph(path, &resolution.graph)?;
            println!(
                "{}dependency graph written to {}",
                "==> ".bold().blue(),
                path.display()
            );
        }
        report::print_notices(&resolution.notices);
        if !resolution.should_continue() {
            report::print_error_tree("will not continue, because:", &resolution.errors);
            process::exit(1);
        }

        let downloader = Downloader::new(registry, Arc::clone(&config), sink);
        let outcome = tokio::select! {
            result = downloader.download(resolution.mods) => result?,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\n{}", "interrupted, stopping".yellow().bold());
                process::exit(130);
            }
        };
        if !outcome.is_complete() {
            report::print_error_tree("some mods could not be downloaded:", &outcome.errors);
            process::exit(1);
        }

        println!(
            "{}{} mods downloaded to {}",
            "==> ".bold().blue(),
            outcome.written.len(),
            config.download_dir.display()
        );
        Ok(())
    }
}

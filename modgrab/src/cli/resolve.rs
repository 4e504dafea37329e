// modgrab/src/cli/resolve.rs
use std::process;
use std::sync::Arc;

use clap::Args;
use colored::Colorize;
use modgrab_common::error::Result;
use modgrab_common::event::ProgressSink;
use modgrab_core::DependencyResolver;
use modgrab_net::ModrinthClient;

use crate::cli::TargetArgs;
use crate::progress::ProgressReporter;
use crate::{export, report};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl ResolveArgs {
    pub async fn run(&self) -> Result<()> {
        let config = self.target.to_config();
        config.validate()?;
        let config = Arc::new(config);

        let registry = Arc::new(ModrinthClient::new(&config)?);
        let sink: Arc<dyn ProgressSink> = Arc::new(ProgressReporter::new());
        let seeds = self.target.seed_mods()?;

        let resolver = DependencyResolver::new(registry, Arc::clone(&config), sink);
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
            report::print_error_tree("resolution failed, because:", &resolution.errors);
            process::exit(1);
        }

        println!(
            "{}{} mods resolved ({} dependency edges)",
            "==> ".bold().blue(),
            resolution.graph.nodes.len(),
            resolution.graph.edges.len()
        );
        for m in &resolution.mods {
            println!("  {} {}", m.title()?, m.version()?.version_number.dimmed());
        }
        Ok(())
    }
}

// modgrab/src/report.rs
use colored::Colorize;
use modgrab_common::error::ModError;

/// Renders aggregated domain errors as an indented cause tree, with a legend
/// line when incompatibilities need explaining.
pub fn print_error_tree(header: &str, errors: &[ModError]) {
    eprintln!("{}{}", "==> ".bold().red(), header.bold());
    for err in errors {
        match err {
            ModError::Incompatible(conflict) => {
                if conflict.required_by.is_empty() {
                    eprintln!("  {} {}", "-".red().bold(), conflict.headline().yellow());
                } else {
                    eprintln!(
                        "  {} {}, but the following mods need it",
                        "-".red().bold(),
                        conflict.headline().yellow()
                    );
                    for name in &conflict.required_by {
                        eprintln!("      {} {}", "-".dimmed(), name.yellow());
                    }
                }
            }
            _ => eprintln!("  {} {}", "-".red().bold(), err.to_string().yellow()),
        }
    }
    if errors
        .iter()
        .any(|e| matches!(e, ModError::Incompatible(_)))
    {
        eprintln!(
            "  {}",
            "incompatible mods cannot be installed together; drop one side of each conflict"
                .dimmed()
        );
    }
}

pub fn print_notices(notices: &[String]) {
    for notice in notices {
        eprintln!("{} {}", "Notice:".yellow().bold(), notice);
    }
}

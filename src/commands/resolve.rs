//! Resolve command
//!
//! Shows which sink a destination string selects, without sending anything.

use colored::*;
use eyre::{Context, Result};

use testinel::config::Config;
use testinel::destination::{self, Destination};

use crate::cli::OutputFormat;

pub fn run(dsn: Option<&str>, format: OutputFormat, config: &Config) -> Result<()> {
    let dsn = super::destination(dsn, config)?;
    let resolved = destination::parse(&dsn)?;
    log::info!("Resolved '{}' to {}", dsn, resolved);

    match format {
        OutputFormat::Text => print_text(&dsn, &resolved),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&resolved).context("Failed to serialize destination")?
            );
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yaml::to_string(&resolved).context("Failed to serialize destination")?
            );
        }
    }

    Ok(())
}

fn print_text(dsn: &str, resolved: &Destination) {
    println!("{} {}", "Destination:".bold(), dsn);
    match resolved {
        Destination::File { path } => {
            println!("  {} {}", "sink:".dimmed(), "file".green());
            println!("  {} {}", "path:".dimmed(), path.display());
        }
        Destination::Http { url } => {
            println!("  {} {}", "sink:".dimmed(), "http".cyan());
            println!("  {} {}", "url:".dimmed(), url);
        }
    }
}

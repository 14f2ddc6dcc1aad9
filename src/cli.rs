use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "testinel",
    about = "Report test-run lifecycle events to a file or HTTP endpoint",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/testinel/logs/testinel.log\n\nThe destination is read from --dsn, then TESTINEL_DSN, then reporter.dsn in the config file."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to testinel.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which sink a destination resolves to
    Resolve {
        /// Destination string (defaults to TESTINEL_DSN or config)
        dsn: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Forward newline-delimited lifecycle records to the destination
    Report {
        /// Destination string (defaults to TESTINEL_DSN or config)
        #[arg(long)]
        dsn: Option<String>,

        /// Read records from this file instead of stdin
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Pretty-print file output with this indent width
        #[arg(long)]
        indent: Option<usize>,

        /// Disable TLS certificate verification for HTTP destinations
        #[arg(long)]
        insecure: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

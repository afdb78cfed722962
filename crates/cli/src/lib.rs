use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tradehall")]
#[command(about = "Tradehall - a batch offer-matching exchange")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the matcher with the given configuration
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = "tradehall.yaml")]
        config: PathBuf,

        /// Override the matching pass interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Validate configuration without starting the matcher
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "tradehall.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "tradehall.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

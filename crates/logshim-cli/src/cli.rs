//! CLI structure and command definitions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use logshim_types::Level;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logshim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check logshim configurations and exercise their routing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show internal diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate a configuration file
    Check {
        /// Configuration file (YAML or JSON)
        file: PathBuf,
    },

    /// Show which targets a logger reaches at each level
    Resolve {
        /// Configuration file (YAML or JSON)
        file: PathBuf,

        /// Logger name
        logger: String,
    },

    /// Emit one message through a configuration
    Log {
        /// Configuration file (YAML or JSON)
        file: PathBuf,

        /// Message level
        #[arg(short, long, default_value = "info")]
        level: Level,

        /// Logger name
        #[arg(short = 'n', long, default_value = "logshim")]
        logger: String,

        /// printf-style template
        template: String,

        /// Template arguments; integers and floats are detected, anything else is a string
        args: Vec<String>,
    },

    /// Show version information
    Version,
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Check { file } => check::execute(file),
            Commands::Resolve { file, logger } => resolve::execute(file, logger),
            Commands::Log {
                file,
                level,
                logger,
                template,
                args,
            } => log::execute(file, *level, logger, template, args),
            Commands::Version => version::execute(self.verbose),
        }
    }
}

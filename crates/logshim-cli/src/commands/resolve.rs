//! Show the routing of one logger.

use anyhow::{Context, Result};
use colored::Colorize;
use logshim_core::{loader, Level};
use std::path::Path;

pub fn execute(file: &Path, logger: &str) -> Result<()> {
    let config = loader::load_configuration(file)
        .with_context(|| format!("Invalid configuration {}", file.display()))?;
    let routes = config.routes(logger);

    println!("{} {}", "Logger:".green().bold(), logger.cyan());
    for level in Level::ALL {
        let names: Vec<&str> = routes.targets(level).iter().map(|t| t.name()).collect();
        let shown = if names.is_empty() {
            "-".dimmed().to_string()
        } else {
            names.join(", ")
        };
        println!("  {:<6} {}", level.as_str(), shown);
    }

    Ok(())
}

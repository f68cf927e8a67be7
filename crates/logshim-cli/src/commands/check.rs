//! Validate a configuration file.

use anyhow::{Context, Result};
use colored::Colorize;
use logshim_core::loader;
use std::path::Path;

pub fn execute(file: &Path) -> Result<()> {
    let config = loader::load_configuration(file)
        .with_context(|| format!("Invalid configuration {}", file.display()))?;

    println!("{} {}", "Valid:".green().bold(), file.display());
    println!("  Threshold: {}", config.threshold());

    println!("\n{}:", "Targets".green().bold());
    if config.targets().is_empty() {
        println!("  (none)");
    }
    for target in config.targets() {
        println!("  {} ({})", target.name().cyan(), target.kind());
    }

    println!("\n{}:", "Rules".green().bold());
    if config.rules().is_empty() {
        println!("  (none)");
    }
    for (i, compiled) in config.rules().iter().enumerate() {
        let rule = compiled.rule();
        let levels = match rule.max() {
            Some(max) => format!("{}..={}", rule.min(), max),
            None => format!("{}..", rule.min()),
        };
        let targets: Vec<&str> = rule.target_names().iter().map(String::as_str).collect();
        println!(
            "  {}. {} [{}] -> {}{}",
            i + 1,
            rule.pattern().to_string().cyan(),
            levels,
            targets.join(", "),
            if rule.is_final() { " (final)" } else { "" }
        );
    }

    Ok(())
}

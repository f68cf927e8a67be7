//! Show version information and library defaults.

use anyhow::Result;
use colored::Colorize;
use logshim_core::diagnostics::{DEFAULT_FILTER, FILTER_ENV};
use logshim_core::engine::DEFAULT_RESOURCE;
use logshim_core::layout::DEFAULT_LAYOUT;
use logshim_core::MAX_MESSAGE_LEN;

pub fn execute(verbose: bool) -> Result<()> {
    println!("{} {}", "logshim".cyan().bold(), env!("CARGO_PKG_VERSION"));
    if !verbose {
        return Ok(());
    }

    let filter = std::env::var(FILTER_ENV).ok();
    let defaults = [
        ("Resource", DEFAULT_RESOURCE.to_string()),
        ("Layout", DEFAULT_LAYOUT.to_string()),
        ("Message limit", format!("{MAX_MESSAGE_LEN} bytes")),
        (
            "Diagnostics",
            match filter {
                Some(filter) => format!("{filter} (from {FILTER_ENV})"),
                None => format!("{DEFAULT_FILTER} (set {FILTER_ENV} to override)"),
            },
        ),
        ("Rust", env!("CARGO_PKG_RUST_VERSION").to_string()),
    ];

    println!("\n{}", "Defaults:".bold());
    for (label, value) in defaults {
        println!("  {:<14} {}", format!("{label}:"), value);
    }
    Ok(())
}

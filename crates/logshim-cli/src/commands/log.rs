//! Emit a single message.

use anyhow::{Context, Result};
use logshim_core::{FormatArg, Level, LogFactory};
use std::path::Path;

/// A command-line argument converted to its most specific type.
#[derive(Debug, PartialEq)]
enum ParsedArg<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

fn parse_arg(raw: &str) -> ParsedArg<'_> {
    if let Ok(v) = raw.parse() {
        ParsedArg::Int(v)
    } else if let Ok(v) = raw.parse() {
        ParsedArg::Float(v)
    } else {
        ParsedArg::Text(raw)
    }
}

impl<'a> From<&ParsedArg<'a>> for FormatArg<'a> {
    fn from(arg: &ParsedArg<'a>) -> Self {
        match *arg {
            ParsedArg::Int(v) => FormatArg::Int(v),
            ParsedArg::Float(v) => FormatArg::Float(v),
            ParsedArg::Text(s) => FormatArg::Str(s),
        }
    }
}

pub fn execute(file: &Path, level: Level, logger: &str, template: &str, args: &[String]) -> Result<()> {
    let factory = LogFactory::new();
    factory
        .load_configuration_from_file(file)
        .with_context(|| format!("Invalid configuration {}", file.display()))?;

    let logger = factory.get_logger(logger);
    if !logger.is_enabled(level) {
        tracing::warn!("logger {} has no target at {}", logger.name(), level);
        return Ok(());
    }

    let parsed: Vec<ParsedArg<'_>> = args.iter().map(|a| parse_arg(a)).collect();
    let args: Vec<FormatArg<'_>> = parsed.iter().map(FormatArg::from).collect();
    logger.log(level, template, &args);
    factory.flush();
    Ok(())
}

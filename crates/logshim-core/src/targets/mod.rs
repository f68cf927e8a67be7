//! Built-in targets and their construction from configuration.

mod buffering;
mod console;
mod file;
mod group;
mod memory;
mod null;

pub use buffering::BufferingTarget;
pub use console::ConsoleTarget;
pub use file::{resolve_path, FileTarget};
pub use group::{RoundRobinTarget, SplitGroupTarget};
pub use memory::MemoryTarget;
pub use null::NullTarget;

use crate::layout::Layout;
use logshim_types::config::TargetConfig;
use logshim_types::{Result, Target};
use std::path::Path;
use std::sync::Arc;

fn layout_of(text: &Option<String>) -> Layout {
    text.as_deref().map(Layout::parse).unwrap_or_default()
}

/// Build a live target, and every child of a group, from its declaration.
///
/// Each target built, children included, is passed to `register` so that
/// the caller can look it up by name.
pub fn build_target(
    config: &TargetConfig,
    base_dir: Option<&Path>,
    register: &mut dyn FnMut(Arc<dyn Target>) -> Result<()>,
) -> Result<Arc<dyn Target>> {
    let target: Arc<dyn Target> = match config {
        TargetConfig::Null { name } => Arc::new(NullTarget::new(name)),
        TargetConfig::Console {
            name,
            stream,
            colored,
            layout,
        } => Arc::new(ConsoleTarget::new(name, *stream, *colored, layout_of(layout))),
        TargetConfig::File {
            name,
            path,
            layout,
            auto_flush,
        } => Arc::new(FileTarget::new(
            name,
            resolve_path(path, base_dir),
            layout_of(layout),
            *auto_flush,
        )),
        TargetConfig::Memory { name, layout } => {
            Arc::new(MemoryTarget::new(name, layout_of(layout)))
        }
        TargetConfig::Split { name, .. } => {
            let children = build_children(config, base_dir, register)?;
            Arc::new(SplitGroupTarget::new(name, children))
        }
        TargetConfig::RoundRobin { name, .. } => {
            let children = build_children(config, base_dir, register)?;
            Arc::new(RoundRobinTarget::new(name, children))
        }
        TargetConfig::Buffering {
            name,
            buffer_size,
            target,
        } => {
            let wrapped = build_target(target, base_dir, register)?;
            Arc::new(BufferingTarget::new(name, wrapped, *buffer_size))
        }
    };
    register(target.clone())?;
    Ok(target)
}

fn build_children(
    parent: &TargetConfig,
    base_dir: Option<&Path>,
    register: &mut dyn FnMut(Arc<dyn Target>) -> Result<()>,
) -> Result<Vec<Arc<dyn Target>>> {
    parent
        .children()
        .iter()
        .map(|child| build_target(child, base_dir, register))
        .collect()
}

//! # apimark
//!
//! Renders a resolved API object tree (modules, classes, functions and
//! attributes with parsed docstrings) into a single Markdown document.
//!
//! The tree comes from an external object-model builder, usually as JSON
//! (see [`parser::load_tree`]). Options are merged over [`config::DEFAULTS`]
//! by [`config::resolve`], then [`Renderer`] walks the tree, builds member
//! sections, protects cross-references from the Markdown normalizer and
//! returns the final text.
//!
//! ```no_run
//! use apimark::{load_tree, render_object_docs, UserOptions};
//!
//! let tree = load_tree("api.json").unwrap();
//! let markdown = render_object_docs(&tree, &UserOptions::default()).unwrap();
//! println!("{}", markdown);
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod parser;
pub mod renderer;

#[cfg(test)]
mod tests;

pub use config::{resolve, MembersOrder, RenderConfig, SummaryFlags, UserOptions, DEFAULTS};
pub use error::{RenderError, Result};
pub use parser::{load_tree, parse_tree, ApiNode, Kind};
pub use renderer::{MarkdownNormalizer, Normalizer, Renderer};

/// Render docs for `root` with the default normalizer.
pub fn render_object_docs(root: &ApiNode, options: &UserOptions) -> Result<String> {
    let config = resolve(options)?;
    Renderer::new().render(root, &config)
}

/// Where a rendered document goes
pub enum Output {
    Stdout,
    File(PathBuf),
    Writer(Box<dyn Write>),
}

/// Render docs for `root` and write them to `output`.
///
/// Nothing is written when rendering fails.
pub fn write_docs(root: &ApiNode, options: &UserOptions, output: Output) -> Result<()> {
    let document = render_object_docs(root, options)?;
    match output {
        Output::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()?;
        }
        Output::File(path) => File::create(path)?.write_all(document.as_bytes())?,
        Output::Writer(mut writer) => {
            writer.write_all(document.as_bytes())?;
            writer.flush()?;
        }
    }
    Ok(())
}

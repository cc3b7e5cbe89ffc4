use tracing::debug;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::parser::*;
use crate::renderer::crossref::StashTable;
use crate::renderer::normalize::{MarkdownNormalizer, Normalizer};
use crate::renderer::sections::rendered_paths;
use crate::renderer::traits::*;

/// Unicode replacement character left behind by upstream decoding problems
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Renders a whole API tree into one Markdown document.
///
/// Holds no state between calls; every [`Renderer::render`] builds its own
/// context and stash table.
#[derive(Debug, Default)]
pub struct Renderer<N = MarkdownNormalizer> {
    normalizer: N,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: Normalizer> Renderer<N> {
    pub fn with_normalizer(normalizer: N) -> Self {
        Self { normalizer }
    }

    pub fn render(&self, root: &ApiNode, config: &RenderConfig) -> Result<String> {
        let known_paths = rendered_paths(root, config);
        let context = RenderContext::new(config, &known_paths);
        let raw = root.render(&context);
        debug!(root = %root.path, bytes = raw.len(), "Rendered raw document");

        let mut stash = StashTable::for_document(&raw);
        let protected = stash.protect(&raw);
        let normalized = self.normalizer.normalize(&protected);
        let restored = stash.restore(&normalized)?;

        Ok(restored.replace(REPLACEMENT_CHARACTER, ""))
    }
}

use std::collections::HashSet;

use crate::config::{RenderConfig, MAX_HEADING_LEVEL};

/// State passed down during one tree walk
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub heading_level: u8,
    pub root: bool,
    pub config: &'a RenderConfig,
    /// Paths of every node in the tree being rendered, for crossrefs
    pub known_paths: &'a HashSet<String>,
}

impl<'a> RenderContext<'a> {
    /// Context for the root of a render
    pub fn new(config: &'a RenderConfig, known_paths: &'a HashSet<String>) -> Self {
        Self {
            heading_level: config.heading_level,
            root: true,
            config,
            known_paths,
        }
    }

    /// Context for the members of the current node, one heading level deeper.
    /// Levels stop at the deepest Markdown heading.
    pub fn for_members(&self) -> Self {
        self.with_heading_level(self.heading_level.saturating_add(1))
    }

    pub fn with_heading_level(&self, heading_level: u8) -> Self {
        Self {
            heading_level: heading_level.min(MAX_HEADING_LEVEL),
            root: false,
            config: self.config,
            known_paths: self.known_paths,
        }
    }
}

/// Core rendering trait for API tree nodes
pub trait Render {
    fn render(&self, context: &RenderContext) -> String;
}

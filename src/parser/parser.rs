use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::parser::types::*;

/// Read a serialized API tree from a JSON file.
pub fn load_tree(path: impl AsRef<Path>) -> Result<ApiNode> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading API tree");
    let json_content = fs::read_to_string(path)?;
    parse_tree(&json_content)
}

/// Parse a serialized API tree.
pub fn parse_tree(json: &str) -> Result<ApiNode> {
    let root: ApiNode = serde_json::from_str(json)?;
    let stats = TreeStats::collect(&root);
    debug!(
        root = %root.path,
        modules = stats.modules,
        classes = stats.classes,
        functions = stats.functions,
        attributes = stats.attributes,
        "Parsed API tree"
    );
    Ok(root)
}

/// Node counts per kind for a tree
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub modules: usize,
    pub classes: usize,
    pub functions: usize,
    pub attributes: usize,
}

impl TreeStats {
    pub fn collect(root: &ApiNode) -> Self {
        let mut stats = TreeStats::default();
        root.walk(&mut |node| match node.kind() {
            Kind::Module => stats.modules += 1,
            Kind::Class => stats.classes += 1,
            Kind::Function => stats.functions += 1,
            Kind::Attribute => stats.attributes += 1,
        });
        stats
    }
}

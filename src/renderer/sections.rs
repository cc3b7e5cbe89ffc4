use std::collections::HashSet;

use crate::config::RenderConfig;
use crate::parser::{ApiNode, Kind};
use crate::renderer::components::*;
use crate::renderer::filter::filter_members;
use crate::renderer::order::order_members;
use crate::renderer::traits::*;

/// Order in which member groups appear under a container. Anchors and test
/// fixtures depend on it.
pub const GROUP_ORDER: [Kind; 4] = [Kind::Attribute, Kind::Class, Kind::Function, Kind::Module];

/// Members of `container` of one kind, filtered then ordered.
pub fn member_group<'a>(container: &'a ApiNode, kind: Kind, config: &RenderConfig) -> Vec<&'a ApiNode> {
    let members: Vec<&ApiNode> = container
        .members
        .iter()
        .filter(|member| member.kind() == kind)
        .collect();
    order_members(filter_members(members, config), config.members_order)
}

/// Summary table for one group: linked name and first docstring line.
pub fn summary_table(kind: Kind, members: &[&ApiNode]) -> String {
    let rows = members.iter().map(|member| {
        vec![
            escape_table_cell(&crossref(&inline_code(&member.name), &member.path)),
            escape_table_cell(&resolve_autorefs(member.summary_line().unwrap_or_default())),
        ]
    });
    table(kind.group_title(), &["Name", "Description"], rows)
}

/// Submodules only get sections under the root unless `show_submodules` is set.
fn skips_group(kind: Kind, root: bool, config: &RenderConfig) -> bool {
    kind == Kind::Module && !root && !config.toggles.show_submodules
}

/// Paths of every object that gets a heading, and so an anchor, when `root`
/// is rendered with `config`.
pub fn rendered_paths(root: &ApiNode, config: &RenderConfig) -> HashSet<String> {
    let mut paths = HashSet::new();
    if config.toggles.show_root_heading {
        paths.insert(root.path.clone());
    }
    collect_rendered(root, true, config, &mut paths);
    paths
}

fn collect_rendered(container: &ApiNode, root: bool, config: &RenderConfig, paths: &mut HashSet<String>) {
    for kind in GROUP_ORDER {
        if skips_group(kind, root, config) {
            continue;
        }
        for member in member_group(container, kind, config) {
            paths.insert(member.path.clone());
            if member.is_container() {
                collect_rendered(member, false, config, paths);
            }
        }
    }
}

/// Render the member groups of a module or class.
///
/// Returns an empty string when no member survives filtering, so the caller
/// emits only its own heading and docstring.
pub fn build_sections(container: &ApiNode, context: &RenderContext) -> String {
    let config = context.config;
    let member_context = if context.root && !config.toggles.show_root_heading {
        context.with_heading_level(context.heading_level)
    } else {
        context.for_members()
    };

    let mut blocks = Vec::new();
    for kind in GROUP_ORDER {
        if skips_group(kind, context.root, config) {
            continue;
        }
        let group = member_group(container, kind, config);
        if group.is_empty() {
            continue;
        }
        if config.summary.for_kind(kind) {
            blocks.push(summary_table(kind, &group));
        }
        for member in group {
            blocks.push(member.render(&member_context));
        }
    }
    blocks.join("\n\n")
}

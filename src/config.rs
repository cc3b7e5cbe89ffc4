//! Configuration resolution.
//!
//! User options arrive as a partial mapping (a JSON config file, CLI flags, or
//! both). [`resolve`] merges them over [`DEFAULTS`] and produces an immutable
//! [`RenderConfig`] that the renderer consumes for one render call.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::parser::Kind;
use crate::renderer::FilterRule;

/// Highest heading level Markdown can express
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Sibling display order policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersOrder {
    Alphabetical,
    Source,
}

impl MembersOrder {
    pub const ALL: [MembersOrder; 2] = [MembersOrder::Alphabetical, MembersOrder::Source];

    pub fn as_str(&self) -> &'static str {
        match self {
            MembersOrder::Alphabetical => "alphabetical",
            MembersOrder::Source => "source",
        }
    }
}

impl fmt::Display for MembersOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembersOrder {
    type Err = RenderError;

    fn from_str(value: &str) -> Result<Self> {
        MembersOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == value)
            .ok_or_else(|| {
                let allowed: Vec<String> =
                    MembersOrder::ALL.iter().map(|o| format!("'{}'", o)).collect();
                RenderError::InvalidConfig {
                    option: "members_order",
                    value: value.to_string(),
                    allowed: allowed.join(", "),
                }
            })
    }
}

/// Per-kind summary switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SummaryFlags {
    pub attributes: bool,
    pub functions: bool,
    pub classes: bool,
    pub modules: bool,
}

impl SummaryFlags {
    pub const fn all(enabled: bool) -> Self {
        SummaryFlags {
            attributes: enabled,
            functions: enabled,
            classes: enabled,
            modules: enabled,
        }
    }

    pub fn for_kind(&self, kind: Kind) -> bool {
        match kind {
            Kind::Attribute => self.attributes,
            Kind::Function => self.functions,
            Kind::Class => self.classes,
            Kind::Module => self.modules,
        }
    }
}

/// The accepted shapes of the `summary` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SummaryOption {
    All(bool),
    PerKind(SummaryFlags),
}

impl From<SummaryOption> for SummaryFlags {
    fn from(option: SummaryOption) -> Self {
        match option {
            SummaryOption::All(enabled) => SummaryFlags::all(enabled),
            SummaryOption::PerKind(flags) => flags,
        }
    }
}

/// Formatting switches passed through to the renderer unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatToggles {
    pub show_root_heading: bool,
    pub show_root_full_path: bool,
    pub show_object_full_path: bool,
    pub show_signature: bool,
    pub show_signature_annotations: bool,
    pub show_bases: bool,
    pub show_submodules: bool,
    pub show_if_no_docstring: bool,
    pub show_docstring_description: bool,
    pub show_docstring_parameters: bool,
    pub show_docstring_other_parameters: bool,
    pub show_docstring_attributes: bool,
    pub show_docstring_raises: bool,
    pub show_docstring_warns: bool,
    pub show_docstring_returns: bool,
    pub show_docstring_yields: bool,
    pub show_docstring_receives: bool,
    pub show_docstring_examples: bool,
}

/// User overrides for [`FormatToggles`]; `None` keeps the default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToggleOverrides {
    pub show_root_heading: Option<bool>,
    pub show_root_full_path: Option<bool>,
    pub show_object_full_path: Option<bool>,
    pub show_signature: Option<bool>,
    pub show_signature_annotations: Option<bool>,
    pub show_bases: Option<bool>,
    pub show_submodules: Option<bool>,
    pub show_if_no_docstring: Option<bool>,
    pub show_docstring_description: Option<bool>,
    pub show_docstring_parameters: Option<bool>,
    pub show_docstring_other_parameters: Option<bool>,
    pub show_docstring_attributes: Option<bool>,
    pub show_docstring_raises: Option<bool>,
    pub show_docstring_warns: Option<bool>,
    pub show_docstring_returns: Option<bool>,
    pub show_docstring_yields: Option<bool>,
    pub show_docstring_receives: Option<bool>,
    pub show_docstring_examples: Option<bool>,
}

impl FormatToggles {
    fn merged(self, o: &ToggleOverrides) -> Self {
        FormatToggles {
            show_root_heading: o.show_root_heading.unwrap_or(self.show_root_heading),
            show_root_full_path: o.show_root_full_path.unwrap_or(self.show_root_full_path),
            show_object_full_path: o.show_object_full_path.unwrap_or(self.show_object_full_path),
            show_signature: o.show_signature.unwrap_or(self.show_signature),
            show_signature_annotations: o
                .show_signature_annotations
                .unwrap_or(self.show_signature_annotations),
            show_bases: o.show_bases.unwrap_or(self.show_bases),
            show_submodules: o.show_submodules.unwrap_or(self.show_submodules),
            show_if_no_docstring: o.show_if_no_docstring.unwrap_or(self.show_if_no_docstring),
            show_docstring_description: o
                .show_docstring_description
                .unwrap_or(self.show_docstring_description),
            show_docstring_parameters: o
                .show_docstring_parameters
                .unwrap_or(self.show_docstring_parameters),
            show_docstring_other_parameters: o
                .show_docstring_other_parameters
                .unwrap_or(self.show_docstring_other_parameters),
            show_docstring_attributes: o
                .show_docstring_attributes
                .unwrap_or(self.show_docstring_attributes),
            show_docstring_raises: o.show_docstring_raises.unwrap_or(self.show_docstring_raises),
            show_docstring_warns: o.show_docstring_warns.unwrap_or(self.show_docstring_warns),
            show_docstring_returns: o.show_docstring_returns.unwrap_or(self.show_docstring_returns),
            show_docstring_yields: o.show_docstring_yields.unwrap_or(self.show_docstring_yields),
            show_docstring_receives: o
                .show_docstring_receives
                .unwrap_or(self.show_docstring_receives),
            show_docstring_examples: o
                .show_docstring_examples
                .unwrap_or(self.show_docstring_examples),
        }
    }
}

/// Default option values, merged under every user configuration
#[derive(Debug)]
pub struct Defaults {
    pub heading_level: u8,
    pub members_order: MembersOrder,
    pub summary: SummaryFlags,
    pub filters: &'static [&'static str],
    pub docstring_style: Option<&'static str>,
    pub toggles: FormatToggles,
}

pub const DEFAULTS: Defaults = Defaults {
    heading_level: 1,
    members_order: MembersOrder::Alphabetical,
    summary: SummaryFlags::all(true),
    filters: &["!^_[^_]"],
    docstring_style: Some("google"),
    toggles: FormatToggles {
        show_root_heading: true,
        show_root_full_path: true,
        show_object_full_path: false,
        show_signature: true,
        show_signature_annotations: true,
        show_bases: true,
        show_submodules: true,
        show_if_no_docstring: false,
        show_docstring_description: true,
        show_docstring_parameters: true,
        show_docstring_other_parameters: true,
        show_docstring_attributes: true,
        show_docstring_raises: true,
        show_docstring_warns: true,
        show_docstring_returns: true,
        show_docstring_yields: true,
        show_docstring_receives: true,
        show_docstring_examples: true,
    },
};

/// Options as supplied by the user. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserOptions {
    pub heading_level: Option<u8>,
    pub members_order: Option<String>,
    pub summary: Option<SummaryOption>,
    pub filters: Option<Vec<String>>,
    pub docstring_style: Option<String>,
    #[serde(flatten)]
    pub toggles: ToggleOverrides,
}

impl UserOptions {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: UserOptions) -> UserOptions {
        let t = other.toggles;
        let base = self.toggles;
        UserOptions {
            heading_level: other.heading_level.or(self.heading_level),
            members_order: other.members_order.or(self.members_order),
            summary: other.summary.or(self.summary),
            filters: other.filters.or(self.filters),
            docstring_style: other.docstring_style.or(self.docstring_style),
            toggles: ToggleOverrides {
                show_root_heading: t.show_root_heading.or(base.show_root_heading),
                show_root_full_path: t.show_root_full_path.or(base.show_root_full_path),
                show_object_full_path: t.show_object_full_path.or(base.show_object_full_path),
                show_signature: t.show_signature.or(base.show_signature),
                show_signature_annotations: t
                    .show_signature_annotations
                    .or(base.show_signature_annotations),
                show_bases: t.show_bases.or(base.show_bases),
                show_submodules: t.show_submodules.or(base.show_submodules),
                show_if_no_docstring: t.show_if_no_docstring.or(base.show_if_no_docstring),
                show_docstring_description: t
                    .show_docstring_description
                    .or(base.show_docstring_description),
                show_docstring_parameters: t
                    .show_docstring_parameters
                    .or(base.show_docstring_parameters),
                show_docstring_other_parameters: t
                    .show_docstring_other_parameters
                    .or(base.show_docstring_other_parameters),
                show_docstring_attributes: t
                    .show_docstring_attributes
                    .or(base.show_docstring_attributes),
                show_docstring_raises: t.show_docstring_raises.or(base.show_docstring_raises),
                show_docstring_warns: t.show_docstring_warns.or(base.show_docstring_warns),
                show_docstring_returns: t.show_docstring_returns.or(base.show_docstring_returns),
                show_docstring_yields: t.show_docstring_yields.or(base.show_docstring_yields),
                show_docstring_receives: t
                    .show_docstring_receives
                    .or(base.show_docstring_receives),
                show_docstring_examples: t
                    .show_docstring_examples
                    .or(base.show_docstring_examples),
            },
        }
    }
}

/// Fully resolved, immutable render configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub heading_level: u8,
    pub members_order: MembersOrder,
    pub summary: SummaryFlags,
    pub filters: Vec<FilterRule>,
    pub docstring_style: Option<String>,
    pub toggles: FormatToggles,
}

/// Merge user options over [`DEFAULTS`] and validate them.
///
/// Fails with [`RenderError::InvalidConfig`] for an unknown `members_order`
/// and with [`RenderError::MalformedPattern`] for a filter that does not
/// compile.
pub fn resolve(options: &UserOptions) -> Result<RenderConfig> {
    let heading_level = options
        .heading_level
        .unwrap_or(DEFAULTS.heading_level)
        .clamp(1, MAX_HEADING_LEVEL);

    let members_order = match options.members_order.as_deref() {
        Some(value) => value.parse()?,
        None => DEFAULTS.members_order,
    };

    let summary = options.summary.map(SummaryFlags::from).unwrap_or(DEFAULTS.summary);

    let filters = match &options.filters {
        Some(patterns) => patterns
            .iter()
            .map(|p| FilterRule::parse(p))
            .collect::<Result<Vec<_>>>()?,
        None => DEFAULTS
            .filters
            .iter()
            .map(|p| FilterRule::parse(p))
            .collect::<Result<Vec<_>>>()?,
    };

    let docstring_style = options
        .docstring_style
        .clone()
        .or_else(|| DEFAULTS.docstring_style.map(str::to_string));

    let config = RenderConfig {
        heading_level,
        members_order,
        summary,
        filters,
        docstring_style,
        toggles: DEFAULTS.toggles.merged(&options.toggles),
    };
    debug!(
        heading_level = config.heading_level,
        members_order = %config.members_order,
        filters = config.filters.len(),
        "Resolved render configuration"
    );
    Ok(config)
}

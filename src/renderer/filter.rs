use regex::Regex;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::parser::ApiNode;

/// Marker that turns a filter pattern into an exclusion
pub const NEGATION_MARKER: char = '!';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Include,
    Exclude,
}

/// A compiled name pattern together with what a match means.
#[derive(Debug, Clone)]
pub struct FilterRule {
    pub pattern: Regex,
    pub polarity: Polarity,
}

impl FilterRule {
    /// Parse a user filter string. A leading `!` makes the rule exclude
    /// matching names; the marker is stripped before compiling.
    pub fn parse(raw: &str) -> Result<Self> {
        let (polarity, source) = match raw.strip_prefix(NEGATION_MARKER) {
            Some(rest) => (Polarity::Exclude, rest),
            None => (Polarity::Include, raw),
        };
        let pattern = Regex::new(source).map_err(|source_err| RenderError::MalformedPattern {
            pattern: source.to_string(),
            source: source_err,
        })?;
        Ok(FilterRule { pattern, polarity })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// Decide whether a member named `name` is shown.
///
/// Everything is kept unless a rule says otherwise, and the last matching
/// rule decides.
pub fn keep(name: &str, rules: &[FilterRule]) -> bool {
    rules.iter().fold(true, |keep, rule| {
        if rule.matches(name) {
            rule.polarity == Polarity::Include
        } else {
            keep
        }
    })
}

/// Filter stage of the member pipeline: name rules first, then the
/// docstring requirement when `show_if_no_docstring` is off.
pub fn filter_members<'a>(members: Vec<&'a ApiNode>, config: &RenderConfig) -> Vec<&'a ApiNode> {
    members
        .into_iter()
        .filter(|member| {
            let kept = keep(&member.name, &config.filters)
                && (config.toggles.show_if_no_docstring || member.has_docstrings());
            if !kept {
                debug!(path = %member.path, "Filtered out member");
            }
            kept
        })
        .collect()
}

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::FormatToggles;
use crate::parser::*;

/// `[title][dotted.path]` references written inside docstrings
static AUTOREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[\]\n]+)\]\[([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\]")
        .expect("autoref pattern is valid")
});

/// Anchor for a dotted path: dots become hyphens, everything is lowercased.
pub fn anchor(path: &str) -> String {
    path.replace('.', "-").to_lowercase()
}

/// Internal link to the object at `path`
pub fn crossref(title: &str, path: &str) -> String {
    format!("[{}](#{})", title, anchor(path))
}

pub fn heading(level: u8, text: &str) -> String {
    format!("{} {}", "#".repeat(level as usize), escape_markdown(text))
}

pub fn anchor_tag(path: &str) -> String {
    format!("<a id=\"{}\"></a>", anchor(path))
}

/// Escape emphasis markers in plain text such as names in headings
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c: char| c != '`').map(str::len).max().unwrap_or(0)
}

/// Inline code span whose delimiters cannot clash with the content.
pub fn inline_code(text: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(text) + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

/// Make text safe for a single table cell
pub fn escape_table_cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

/// Replace docstring autorefs with internal links.
pub fn resolve_autorefs(text: &str) -> String {
    AUTOREF
        .replace_all(text, |caps: &Captures| crossref(&caps[1], &caps[2]))
        .into_owned()
}

/// Helper for rendering signatures and code
pub struct SignatureFormatter {
    pub annotations: bool,
}

impl SignatureFormatter {
    pub fn new(toggles: &FormatToggles) -> Self {
        Self {
            annotations: toggles.show_signature_annotations,
        }
    }

    fn format_parameter(&self, param: &Parameter) -> String {
        let mut text = match param.kind {
            ParameterKind::VarPositional => format!("*{}", param.name),
            ParameterKind::VarKeyword => format!("**{}", param.name),
            _ => param.name.clone(),
        };
        if self.annotations {
            if let Some(annotation) = &param.annotation {
                text.push_str(": ");
                text.push_str(annotation);
            }
        }
        if let Some(default) = &param.default {
            text.push_str(" = ");
            text.push_str(default);
        }
        text
    }

    /// `name(params) -> returns`, parameters in declaration order.
    pub fn format_signature(
        &self,
        name: &str,
        parameters: &[Parameter],
        returns: Option<&str>,
    ) -> String {
        let has_var_positional = parameters
            .iter()
            .any(|p| p.kind == ParameterKind::VarPositional);

        let mut parts: Vec<String> = Vec::with_capacity(parameters.len() + 2);
        let mut previous: Option<ParameterKind> = None;
        for param in parameters {
            if previous == Some(ParameterKind::PositionalOnly)
                && param.kind != ParameterKind::PositionalOnly
            {
                parts.push("/".to_string());
            }
            if param.kind == ParameterKind::KeywordOnly
                && previous != Some(ParameterKind::KeywordOnly)
                && !has_var_positional
            {
                parts.push("*".to_string());
            }
            parts.push(self.format_parameter(param));
            previous = Some(param.kind);
        }
        if previous == Some(ParameterKind::PositionalOnly) {
            parts.push("/".to_string());
        }

        let mut signature = format!("{}({})", name, parts.join(", "));
        if self.annotations {
            if let Some(returns) = returns {
                signature.push_str(" -> ");
                signature.push_str(returns);
            }
        }
        signature
    }

    /// `name: annotation = value`
    pub fn format_attribute(
        &self,
        name: &str,
        annotation: Option<&str>,
        value: Option<&str>,
    ) -> String {
        let mut text = name.to_string();
        if self.annotations {
            if let Some(annotation) = annotation {
                text.push_str(": ");
                text.push_str(annotation);
            }
        }
        if let Some(value) = value {
            text.push_str(" = ");
            text.push_str(value);
        }
        text
    }

    /// Fenced code block. The fence is longer than any backtick run in the
    /// snippet so the block cannot be closed early; the snippet itself is
    /// left untouched.
    pub fn format_code(&self, snippet: &str, language: &str) -> String {
        let fence = "`".repeat(longest_backtick_run(snippet).max(2) + 1);
        format!(
            "{fence}{language}\n{}\n{fence}",
            snippet.trim_end_matches('\n')
        )
    }
}

/// Helper for rendering parsed docstrings
pub struct DocRenderer<'a> {
    pub toggles: &'a FormatToggles,
}

impl<'a> DocRenderer<'a> {
    pub fn new(toggles: &'a FormatToggles) -> Self {
        Self { toggles }
    }

    pub fn render_docs(&self, docstring: Option<&Docstring>) -> String {
        let Some(docstring) = docstring else {
            return String::new();
        };

        docstring
            .sections
            .iter()
            .filter_map(|section| self.render_section(section))
            .filter(|block| !block.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_section(&self, section: &DocstringSection) -> Option<String> {
        let t = self.toggles;
        match section {
            DocstringSection::Text { value } if t.show_docstring_description => {
                Some(resolve_autorefs(value.trim()))
            }
            DocstringSection::Parameters { value } if t.show_docstring_parameters => {
                Some(self.parameters_table("Parameters", value))
            }
            DocstringSection::OtherParameters { value } if t.show_docstring_other_parameters => {
                Some(self.parameters_table("Other Parameters", value))
            }
            DocstringSection::Attributes { value } if t.show_docstring_attributes => {
                Some(self.named_table("Attributes", value))
            }
            DocstringSection::Raises { value } if t.show_docstring_raises => {
                Some(self.typed_table("Raises", value))
            }
            DocstringSection::Warns { value } if t.show_docstring_warns => {
                Some(self.typed_table("Warns", value))
            }
            DocstringSection::Returns { value } if t.show_docstring_returns => {
                Some(self.named_table("Returns", value))
            }
            DocstringSection::Yields { value } if t.show_docstring_yields => {
                Some(self.named_table("Yields", value))
            }
            DocstringSection::Receives { value } if t.show_docstring_receives => {
                Some(self.named_table("Receives", value))
            }
            DocstringSection::Examples { value } if t.show_docstring_examples => {
                Some(self.examples(value))
            }
            DocstringSection::Admonition { title, text } => Some(admonition(title.as_deref(), text)),
            _ => None,
        }
    }

    fn parameters_table(&self, title: &str, params: &[DocstringParameter]) -> String {
        let rows = params.iter().map(|p| {
            vec![
                inline_code(&p.name),
                optional_code(p.annotation.as_deref()),
                description_cell(&p.description),
                match p.default.as_deref() {
                    Some(default) => optional_code(Some(default)),
                    None => "*required*".to_string(),
                },
            ]
        });
        table(title, &["Name", "Type", "Description", "Default"], rows)
    }

    fn named_table(&self, title: &str, elements: &[DocstringNamedElement]) -> String {
        if elements.iter().any(|e| e.name.is_some()) {
            let rows = elements.iter().map(|e| {
                vec![
                    optional_code(e.name.as_deref()),
                    optional_code(e.annotation.as_deref()),
                    description_cell(&e.description),
                ]
            });
            table(title, &["Name", "Type", "Description"], rows)
        } else {
            let rows = elements.iter().map(|e| {
                vec![
                    optional_code(e.annotation.as_deref()),
                    description_cell(&e.description),
                ]
            });
            table(title, &["Type", "Description"], rows)
        }
    }

    fn typed_table(&self, title: &str, elements: &[DocstringElement]) -> String {
        let rows = elements.iter().map(|e| {
            vec![
                optional_code(e.annotation.as_deref()),
                description_cell(&e.description),
            ]
        });
        table(title, &["Type", "Description"], rows)
    }

    fn examples(&self, chunks: &[ExampleChunk]) -> String {
        let formatter = SignatureFormatter::new(self.toggles);
        let mut blocks = vec!["**Examples:**".to_string()];
        for chunk in chunks {
            match chunk {
                ExampleChunk::Text(text) => blocks.push(resolve_autorefs(text.trim())),
                ExampleChunk::Code(code) => blocks.push(formatter.format_code(code, "python")),
            }
        }
        blocks.join("\n\n")
    }
}

fn optional_code(text: Option<&str>) -> String {
    text.map(|t| escape_table_cell(&inline_code(t)))
        .unwrap_or_default()
}

fn description_cell(text: &str) -> String {
    escape_table_cell(&resolve_autorefs(text))
}

/// Titled Markdown table; cells must already be escaped.
pub fn table<I>(title: &str, headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut output = format!("**{}:**\n\n", title);
    output.push_str(&format!("| {} |\n", headers.join(" | ")));
    output.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));
    for row in rows {
        output.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    output.truncate(output.trim_end().len());
    output
}

fn admonition(title: Option<&str>, text: &str) -> String {
    let mut output = format!("> **{}**\n>", title.unwrap_or("Note"));
    for line in resolve_autorefs(text.trim()).lines() {
        if line.trim().is_empty() {
            output.push_str("\n>");
        } else {
            output.push_str(&format!("\n> {}", line));
        }
    }
    output
}

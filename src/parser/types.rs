use serde::{Deserialize, Serialize};

/// The four kinds of node in an API tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Attribute,
    Class,
    Function,
    Module,
}

impl Kind {
    /// Title used for summary listings of a group of this kind
    pub fn group_title(&self) -> &'static str {
        match self {
            Kind::Attribute => "Attributes",
            Kind::Class => "Classes",
            Kind::Function => "Functions",
            Kind::Module => "Modules",
        }
    }
}

/// One entity of the resolved API tree.
///
/// Trees are produced by an external object-model builder and handed over
/// as JSON. The renderer only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiNode {
    pub name: String,
    /// Dotted qualified path, e.g. `pkg.sub.Name`
    pub path: String,
    #[serde(default)]
    pub lineno: Option<u32>,
    #[serde(default)]
    pub docstring: Option<Docstring>,
    #[serde(default)]
    pub members: Vec<ApiNode>,
    #[serde(flatten)]
    pub detail: NodeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDetail {
    Module,
    Class {
        #[serde(default)]
        bases: Vec<String>,
    },
    Function {
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        returns: Option<String>,
    },
    Attribute {
        #[serde(default)]
        annotation: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
}

impl ApiNode {
    pub fn kind(&self) -> Kind {
        match self.detail {
            NodeDetail::Module => Kind::Module,
            NodeDetail::Class { .. } => Kind::Class,
            NodeDetail::Function { .. } => Kind::Function,
            NodeDetail::Attribute { .. } => Kind::Attribute,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind(), Kind::Module | Kind::Class)
    }

    /// Whether this node or anything below it carries a non-empty docstring.
    pub fn has_docstrings(&self) -> bool {
        self.docstring.as_ref().is_some_and(|d| !d.is_empty())
            || self.members.iter().any(ApiNode::has_docstrings)
    }

    /// First line of the first text section, used in summary listings.
    pub fn summary_line(&self) -> Option<&str> {
        self.docstring.as_ref().and_then(Docstring::summary_line)
    }

    /// Visit this node and every descendant, depth first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ApiNode)) {
        visit(self);
        for member in &self.members {
            member.walk(visit);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    PositionalOnly,
    #[default]
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub kind: ParameterKind,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
}

/// An already parsed docstring.
///
/// Accepts either a plain string, which becomes a single text section, or
/// an explicit list of sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "DocstringRepr")]
pub struct Docstring {
    pub sections: Vec<DocstringSection>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocstringRepr {
    Plain(String),
    Parsed { sections: Vec<DocstringSection> },
}

impl From<DocstringRepr> for Docstring {
    fn from(repr: DocstringRepr) -> Self {
        match repr {
            DocstringRepr::Plain(text) => Docstring::from_text(text),
            DocstringRepr::Parsed { sections } => Docstring { sections },
        }
    }
}

impl Docstring {
    pub fn from_text(text: impl Into<String>) -> Self {
        Docstring {
            sections: vec![DocstringSection::Text { value: text.into() }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| match section {
            DocstringSection::Text { value } => value.trim().is_empty(),
            _ => false,
        })
    }

    pub fn summary_line(&self) -> Option<&str> {
        self.sections.iter().find_map(|section| match section {
            DocstringSection::Text { value } => value.lines().map(str::trim).find(|l| !l.is_empty()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocstringSection {
    Text { value: String },
    Parameters { value: Vec<DocstringParameter> },
    OtherParameters { value: Vec<DocstringParameter> },
    Attributes { value: Vec<DocstringNamedElement> },
    Raises { value: Vec<DocstringElement> },
    Warns { value: Vec<DocstringElement> },
    Returns { value: Vec<DocstringNamedElement> },
    Yields { value: Vec<DocstringNamedElement> },
    Receives { value: Vec<DocstringNamedElement> },
    Examples { value: Vec<ExampleChunk> },
    Admonition {
        #[serde(default)]
        title: Option<String>,
        text: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocstringParameter {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocstringNamedElement {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocstringElement {
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExampleChunk {
    Text(String),
    Code(String),
}

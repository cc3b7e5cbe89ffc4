//! Protection of cross-references across text normalization.
//!
//! Internal links such as ``[`Name`](#pkg-name)`` are swapped for opaque
//! tokens before the document goes through the normalizer and swapped back
//! afterwards. A token is `OPEN n CLOSE`: OPEN and CLOSE are private-use
//! characters that do not occur anywhere in the protected document, and `n`
//! numbers the stashed references of that document. Any OPEN or CLOSE left
//! after restoring, or any token that disappeared, is reported.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::error::{RenderError, Result};

/// Internal Markdown link: `[text](#anchor)`
static CROSSREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]\n]*\]\(#[^()\s]+\)").expect("crossref pattern is valid"));

/// Stashed references of one document render
#[derive(Debug)]
pub struct StashTable {
    open: char,
    close: char,
    entries: Vec<String>,
}

impl StashTable {
    /// Create a table whose token markers do not occur in `document`.
    pub fn for_document(document: &str) -> Self {
        let used: HashSet<char> = document
            .chars()
            .filter(|c| is_private_use(*c))
            .collect();
        let (open, close) = (0xE000u32..0xF8FF)
            .chain(0xF0000..0xFFFFD)
            .step_by(2)
            .filter_map(|code| Some((char::from_u32(code)?, char::from_u32(code + 1)?)))
            .find(|(open, close)| !used.contains(open) && !used.contains(close))
            // Unreachable unless the document uses every private-use character.
            .unwrap_or(('\u{E000}', '\u{E001}'));
        Self {
            open,
            close,
            entries: Vec::new(),
        }
    }

    /// Stash one reference and return its token.
    pub fn stash(&mut self, reference: &str) -> String {
        let token = self.token(self.entries.len());
        self.entries.push(reference.to_string());
        token
    }

    /// Reference behind a token produced by this table
    pub fn unstash(&self, token: &str) -> Option<&str> {
        let id = token
            .strip_prefix(self.open)?
            .strip_suffix(self.close)?
            .parse::<usize>()
            .ok()?;
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn token(&self, id: usize) -> String {
        format!("{}{}{}", self.open, id, self.close)
    }

    /// Pre-pass: replace every crossref in `text` with a token.
    pub fn protect(&mut self, text: &str) -> String {
        let protected = CROSSREF
            .replace_all(text, |caps: &Captures| self.stash(&caps[0]))
            .into_owned();
        debug!(crossrefs = self.entries.len(), "Stashed cross-references");
        protected
    }

    /// Post-pass: restore every token in `text`.
    ///
    /// Fails with [`RenderError::StashResidual`] when a token was mangled
    /// beyond recognition or dropped altogether.
    pub fn restore(&self, text: &str) -> Result<String> {
        let mut output = String::with_capacity(text.len());
        let mut restored = vec![false; self.entries.len()];
        let mut residual = Vec::new();

        let mut rest = text;
        while let Some(start) = rest.find(self.open) {
            output.push_str(&rest[..start]);
            let after = &rest[start + self.open.len_utf8()..];
            let digits = after
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after.len());
            let entry = after[..digits]
                .parse::<usize>()
                .ok()
                .filter(|_| after[digits..].starts_with(self.close))
                .and_then(|id| self.entries.get(id).map(|reference| (id, reference)));

            match entry {
                Some((id, reference)) => {
                    output.push_str(reference);
                    restored[id] = true;
                    rest = &after[digits + self.close.len_utf8()..];
                }
                None => {
                    let fragment: String = after.chars().take(12).collect();
                    residual.push(format!("{:?}", format!("{}{}", self.open, fragment)));
                    output.push(self.open);
                    rest = after;
                }
            }
        }
        output.push_str(rest);

        if residual.is_empty() && output.contains(self.close) {
            residual.push(format!("{:?}", self.close));
        }
        for (id, done) in restored.iter().enumerate() {
            if !done {
                residual.push(format!("#{} {}", id, self.entries[id]));
            }
        }

        if residual.is_empty() {
            Ok(output)
        } else {
            warn!(?residual, "Cross-references left unrestored after normalization");
            Err(RenderError::StashResidual { tokens: residual })
        }
    }
}

fn is_private_use(c: char) -> bool {
    matches!(c as u32, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}

use comrak::{format_commonmark, parse_document, Arena, Options};
use tracing::warn;

/// Text-in, text-out Markdown canonicalization applied to a rendered
/// document. Implementations must be pure.
#[cfg_attr(test, mockall::automock)]
pub trait Normalizer {
    fn normalize(&self, text: &str) -> String;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, text: &str) -> String {
        self(text)
    }
}

/// Default normalizer: a CommonMark round trip through comrak with GFM
/// tables enabled.
///
/// Blocks come back separated by exactly one blank line, trailing
/// whitespace is gone and text is re-escaped where CommonMark needs it.
/// Fenced code keeps its content byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownNormalizer;

impl MarkdownNormalizer {
    fn options() -> Options<'static> {
        let mut options = Options::default();
        options.extension.table = true;
        options.render.prefer_fenced = true;
        options
    }
}

impl Normalizer for MarkdownNormalizer {
    fn normalize(&self, text: &str) -> String {
        let arena = Arena::new();
        let options = Self::options();
        let root = parse_document(&arena, text, &options);

        let mut output: Vec<u8> = Vec::with_capacity(text.len());
        if let Err(err) = format_commonmark(root, &options, &mut output) {
            warn!(%err, "Could not format document, keeping it as rendered");
            return text.to_string();
        }
        String::from_utf8_lossy(&output).into_owned()
    }
}

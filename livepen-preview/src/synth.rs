//! Composes the three source buffers into one HTML document.
//!
//! The output is a full rebuild every time. Inputs are embedded verbatim,
//! without escaping or sanitization.

use crate::buffer::Sources;
use std::fmt;

const HEAD_OPEN: &str = "<html><head><style>";
const STYLE_CLOSE: &str = "</style></head><body>";
const SCRIPT_OPEN: &str = "<script>";
const DOC_CLOSE: &str = "</script></body></html>";

/// Synthesized preview document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeDocument(String);

impl CompositeDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CompositeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompositeDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stateless document builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSynthesizer;

impl DocumentSynthesizer {
    pub fn build(&self, markup: &str, style: &str, script: &str) -> CompositeDocument {
        build(markup, style, script)
    }

    pub fn build_sources(&self, sources: &Sources) -> CompositeDocument {
        build(&sources.markup, &sources.style, &sources.script)
    }
}

/// Style goes in the head, markup is the body, script runs after the body content.
pub fn build(markup: &str, style: &str, script: &str) -> CompositeDocument {
    let capacity = HEAD_OPEN.len()
        + style.len()
        + STYLE_CLOSE.len()
        + markup.len()
        + SCRIPT_OPEN.len()
        + script.len()
        + DOC_CLOSE.len();
    let mut doc = String::with_capacity(capacity);
    doc.push_str(HEAD_OPEN);
    doc.push_str(style);
    doc.push_str(STYLE_CLOSE);
    doc.push_str(markup);
    doc.push_str(SCRIPT_OPEN);
    doc.push_str(script);
    doc.push_str(DOC_CLOSE);
    CompositeDocument(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_sources() {
        assert_eq!(
            build("", "", "").as_str(),
            "<html><head><style></style></head><body><script></script></body></html>"
        );
    }

    #[test]
    fn test_markup_embedded_verbatim_in_body() {
        let doc = build("<h1>hi</h1>", "", "");
        assert_eq!(
            doc.as_str(),
            "<html><head><style></style></head><body><h1>hi</h1><script></script></body></html>"
        );
    }

    #[test]
    fn test_each_slot_lands_in_its_block() {
        let doc = build("<p id=\"x\">a & b</p>", "p { color: red; }", "console.log('<ok>');");
        let s = doc.as_str();

        let style = s.find("<style>p { color: red; }</style>").unwrap();
        let body = s.find("<body><p id=\"x\">a & b</p>").unwrap();
        let script = s.find("<script>console.log('<ok>');</script>").unwrap();
        assert!(style < body && body < script);
        assert_eq!(doc.len(), s.len());
    }

    #[test]
    fn test_build_is_deterministic() {
        let inputs = [
            ("", "", ""),
            ("<div>", "}", "</script>"),
            ("ünïcödé ✓", "body{}", "let a = `${1}`;"),
        ];
        for (m, s, j) in inputs {
            assert_eq!(build(m, s, j), build(m, s, j));
        }
    }

    #[test]
    fn test_synthesizer_matches_free_function() {
        let sources = Sources::new("<b>x</b>", "b{}", "1");
        assert_eq!(
            DocumentSynthesizer.build_sources(&sources),
            build("<b>x</b>", "b{}", "1")
        );
    }
}

//! Source buffers: one text slot per language of a project.

use std::fmt;

/// Language slot of a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Markup,
    Style,
    Script,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Markup, SourceKind::Style, SourceKind::Script];

    /// Conventional file name for this slot (used by the watch tool).
    pub fn file_name(self) -> &'static str {
        match self {
            SourceKind::Markup => "index.html",
            SourceKind::Style => "style.css",
            SourceKind::Script => "script.js",
        }
    }

    pub fn from_file_name(name: &str) -> Option<SourceKind> {
        SourceKind::ALL.into_iter().find(|k| k.file_name() == name)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Markup => "HTML",
            SourceKind::Style => "CSS",
            SourceKind::Script => "JavaScript",
        };
        f.write_str(label)
    }
}

/// Current text of one language slot. No validation and no size limit at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    kind: SourceKind,
    content: String,
}

impl SourceBuffer {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            content: String::new(),
        }
    }

    pub fn with_content(kind: SourceKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
    }
}

/// The three source texts of a project, by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl Sources {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    pub fn get(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Markup => &self.markup,
            SourceKind::Style => &self.style,
            SourceKind::Script => &self.script,
        }
    }
}

/// The buffer triple owned by a controller.
#[derive(Debug, Clone)]
pub(crate) struct BufferSet {
    markup: SourceBuffer,
    style: SourceBuffer,
    script: SourceBuffer,
}

impl BufferSet {
    pub(crate) fn from_sources(sources: Sources) -> Self {
        Self {
            markup: SourceBuffer::with_content(SourceKind::Markup, sources.markup),
            style: SourceBuffer::with_content(SourceKind::Style, sources.style),
            script: SourceBuffer::with_content(SourceKind::Script, sources.script),
        }
    }

    pub(crate) fn get(&self, kind: SourceKind) -> &SourceBuffer {
        match kind {
            SourceKind::Markup => &self.markup,
            SourceKind::Style => &self.style,
            SourceKind::Script => &self.script,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: SourceKind) -> &mut SourceBuffer {
        match kind {
            SourceKind::Markup => &mut self.markup,
            SourceKind::Style => &mut self.style,
            SourceKind::Script => &mut self.script,
        }
    }

    pub(crate) fn snapshot(&self) -> Sources {
        Sources {
            markup: self.markup.content().to_string(),
            style: self.style.content().to_string(),
            script: self.script.content().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_content_replaces_text() {
        let mut buf = SourceBuffer::new(SourceKind::Style);
        assert_eq!(buf.content(), "");
        buf.set_content("h1 { color: red; }");
        buf.set_content("h1 { color: blue; }");
        assert_eq!(buf.content(), "h1 { color: blue; }");
        assert_eq!(buf.kind(), SourceKind::Style);
    }

    #[test]
    fn test_buffer_set_routes_by_kind() {
        let mut set = BufferSet::from_sources(Sources::new("<p>a</p>", "p{}", "1;"));
        set.get_mut(SourceKind::Script).set_content("2;");
        assert_eq!(set.get(SourceKind::Markup).content(), "<p>a</p>");
        assert_eq!(set.snapshot(), Sources::new("<p>a</p>", "p{}", "2;"));
    }

    #[test]
    fn test_file_names_round_trip() {
        for kind in SourceKind::ALL {
            assert_eq!(SourceKind::from_file_name(kind.file_name()), Some(kind));
        }
        assert_eq!(SourceKind::from_file_name("readme.md"), None);
    }
}

//! Markdown rendering pipelines
//!
//! Two interchangeable renderers share the same contract: markdown string
//! in, HTML string out. [`RendererKind::Custom`] reproduces the legacy
//! viewer's hand-rolled regex pipeline; [`RendererKind::Library`] delegates
//! to pulldown-cmark with syntect highlighting. Input runs through the
//! normalizer before either pipeline sees it.

pub mod custom;
pub mod library;
pub mod normalize;

use std::fmt;

/// Which rendering pipeline to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    #[default]
    Custom,
    Library,
}

impl RendererKind {
    /// Parse a configuration or CLI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "custom" => Some(Self::Custom),
            "library" => Some(Self::Library),
            _ => None,
        }
    }
}

/// HTML produced by a renderer.
///
/// The wrapped markup is trusted: display surfaces insert it without further
/// escaping. It must only ever be built from markdown authored by the
/// document owner, never from arbitrary third-party input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html(String);

impl Html {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum Backend {
    Custom,
    Library(library::LibraryRenderer),
}

/// A configured renderer.
///
/// Construct once and reuse: the library backend loads its syntax
/// definitions at construction time, and there is no shared global state.
pub struct Renderer {
    backend: Backend,
}

impl Renderer {
    pub fn new(kind: RendererKind) -> Self {
        let backend = match kind {
            RendererKind::Custom => Backend::Custom,
            RendererKind::Library => Backend::Library(library::LibraryRenderer::new()),
        };
        Self { backend }
    }

    /// Render markdown, possibly still JSON-quoted or escape-laden, to
    /// trusted HTML. Total over all string inputs; an empty document renders
    /// to an empty fragment.
    pub fn render(&self, input: &str) -> Html {
        let text = normalize::normalize(input);
        let html = match &self.backend {
            Backend::Custom => custom::convert(&text),
            Backend::Library(renderer) => renderer.render(&text),
        };
        Html(html)
    }
}

/// Escape text for inclusion in an HTML code block.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

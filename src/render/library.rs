//! Library-backed markdown rendering
//!
//! The alternative to the hand-rolled converter: pulldown-cmark drives the
//! markdown parsing while fenced code blocks are routed through syntect for
//! syntax highlighting. Same contract as the custom pipeline, markdown
//! string in, HTML string out.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::escape_html;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Renderer delegating to pulldown-cmark with syntect highlighting.
///
/// Loading the syntax definitions is expensive, so construct once and reuse
/// across render calls.
pub struct LibraryRenderer {
    syntaxes: SyntaxSet,
}

impl LibraryRenderer {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Render markdown to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        let parser = Parser::new_ext(markdown, options);

        // Intercept fenced code blocks and replace them with highlighted
        // markup; everything else is passed straight to the HTML writer.
        let mut events = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_buf = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_buf.clear();
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let block = self.highlight_block(code_lang.take().as_deref(), &code_buf);
                    events.push(Event::Html(block.into()));
                }
                Event::Text(text) if in_code_block => code_buf.push_str(&text),
                other => events.push(other),
            }
        }

        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        html
    }

    /// Pick a syntax for the block: language tag first, then first-line
    /// detection, then plain text.
    fn syntax_for(&self, lang: Option<&str>, code: &str) -> &SyntaxReference {
        lang.and_then(|token| self.syntaxes.find_syntax_by_token(token))
            .or_else(|| {
                self.syntaxes
                    .find_syntax_by_first_line(code.lines().next().unwrap_or(""))
            })
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn highlight_block(&self, lang: Option<&str>, code: &str) -> String {
        let token = lang.unwrap_or("plaintext");
        let syntax = self.syntax_for(lang, code);

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                return format!(
                    "<pre><code class=\"language-{token}\">{}</code></pre>\n",
                    escape_html(code)
                );
            }
        }

        format!(
            "<pre><code class=\"language-{token}\">{}</code></pre>\n",
            generator.finalize()
        )
    }
}

impl Default for LibraryRenderer {
    fn default() -> Self {
        Self::new()
    }
}

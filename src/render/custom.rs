//! Hand-rolled markdown to HTML converter
//!
//! Reproduces the legacy viewer's converter: an ordered sequence of regex
//! rewriting passes over the whole text, each pass seeing the output of the
//! previous one. There is no AST and no recursion; nested lists, nested
//! blockquotes and other stacked constructs are out of scope. Unmatched
//! syntax falls through untouched and ends up as paragraph content.
//!
//! The pass order is load-bearing. Emphasis runs before fenced code blocks,
//! so delimiter characters inside a fence are rewritten and then escaped
//! along with the rest of the body; list detection runs over partially
//! converted text; paragraph wrapping runs last and only touches lines that
//! do not already start with a tag.

use regex_lite::{Captures, Regex};

use super::escape_html;

/// Convert markdown text to HTML.
pub fn convert(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let html = normalize_line_endings(markdown);
    let html = unescape_residuals(&html);
    let html = headers(&html);
    let html = emphasis(&html);
    let html = blockquotes(&html);
    let html = fenced_code_blocks(&html);
    let html = inline_code(&html);
    let html = unordered_lists(&html);
    let html = ordered_lists(&html);
    let html = images(&html);
    let html = links(&html);
    let html = horizontal_rules(&html);
    let html = table_heads(&html);
    let html = table_rows(&html);
    let html = close_tables(&html);
    paragraphs(&html)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// The legacy converter repeats part of the normalizer for content that
/// reaches it directly.
fn unescape_residuals(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\\"", "\"")
}

fn headers(text: &str) -> String {
    const RULES: [(&str, &str, &str); 6] = [
        (
            r"(?m)^# (.*?)$",
            r#"<h1 class="text-3xl font-bold my-6 text-primary border-b pb-2">"#,
            "</h1>",
        ),
        (
            r"(?m)^## (.*?)$",
            r#"<h2 class="text-2xl font-semibold my-5 text-primary">"#,
            "</h2>",
        ),
        (
            r"(?m)^### (.*?)$",
            r#"<h3 class="text-xl font-semibold my-4 text-primary">"#,
            "</h3>",
        ),
        (
            r"(?m)^#### (.*?)$",
            r#"<h4 class="text-lg font-semibold my-4 text-primary">"#,
            "</h4>",
        ),
        (
            r"(?m)^##### (.*?)$",
            r#"<h5 class="text-base font-semibold my-4 text-primary">"#,
            "</h5>",
        ),
        (
            r"(?m)^###### (.*?)$",
            r#"<h6 class="text-sm font-semibold my-4 text-primary">"#,
            "</h6>",
        ),
    ];

    let mut html = text.to_string();
    for (pattern, open, close) in RULES {
        let re = Regex::new(pattern).unwrap();
        html = re.replace_all(&html, format!("{open}$1{close}")).into_owned();
    }
    html
}

/// Double-delimiter patterns run before single-delimiter ones so that `**`
/// is not consumed as two italics.
fn emphasis(text: &str) -> String {
    const RULES: [(&str, &str); 4] = [
        (r"\*\*(.*?)\*\*", r#"<strong class="font-bold">$1</strong>"#),
        (r"\*(.*?)\*", r#"<em class="italic">$1</em>"#),
        (r"__(.*?)__", r#"<strong class="font-bold">$1</strong>"#),
        (r"_(.*?)_", r#"<em class="italic">$1</em>"#),
    ];

    let mut html = text.to_string();
    for (pattern, replacement) in RULES {
        let re = Regex::new(pattern).unwrap();
        html = re.replace_all(&html, replacement).into_owned();
    }
    html
}

/// One blockquote element per matching line; consecutive lines are not
/// merged.
fn blockquotes(text: &str) -> String {
    let re = Regex::new(r"(?m)^>\s*(.*?)$").unwrap();
    re.replace_all(
        text,
        r#"<blockquote class="border-l-4 border-primary/50 pl-4 py-2 my-6 italic bg-secondary/30 rounded-r">$1</blockquote>"#,
    )
    .into_owned()
}

/// Fenced code blocks are the only place where the body is HTML-escaped.
fn fenced_code_blocks(text: &str) -> String {
    let re = Regex::new(r"(?s)```([^\n]*?)\n(.*?)```").unwrap();
    re.replace_all(text, |caps: &Captures| {
        let language = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|lang| !lang.is_empty())
            .unwrap_or("plaintext");
        format!(
            r#"<pre class="bg-gray-100 p-4 rounded-md my-6 overflow-auto shadow-sm"><code class="language-{} text-sm font-mono">{}</code></pre>"#,
            language,
            escape_html(caps[2].trim())
        )
    })
    .into_owned()
}

fn inline_code(text: &str) -> String {
    let re = Regex::new(r"`([^`]+)`").unwrap();
    re.replace_all(
        text,
        r#"<code class="bg-gray-100 px-2 py-0.5 rounded text-sm font-mono text-primary/80">$1</code>"#,
    )
    .into_owned()
}

fn unordered_lists(text: &str) -> String {
    list_pass(
        text,
        r"^\s*[-*+]\s+(.*?)$",
        1,
        r#"<ul class="list-disc pl-6 my-6">"#,
        "</ul>",
    )
}

fn ordered_lists(text: &str) -> String {
    list_pass(
        text,
        r"^\s*(\d+)\.\s+(.*?)$",
        2,
        r#"<ol class="list-decimal pl-6 my-6">"#,
        "</ol>",
    )
}

/// Line loop shared by both list kinds. Item lines are buffered as `<li>`
/// fragments and flushed into a single wrapping element when the run ends,
/// either at the first non-matching line or at the end of input. List
/// numbers are not carried over; order is implied by DOM position.
fn list_pass(text: &str, pattern: &str, group: usize, open: &str, close: &str) -> String {
    let re = Regex::new(pattern).unwrap();
    let mut result: Vec<String> = Vec::new();
    let mut items: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if let Some(caps) = re.captures(line) {
            items.push(format!(
                r#"<li class="ml-6 my-2 text-base">{}</li>"#,
                &caps[group]
            ));
        } else if !items.is_empty() {
            result.push(format!("{open}{}{close}", items.join("")));
            items.clear();
            result.push(line.to_string());
        } else {
            result.push(line.to_string());
        }
    }

    if !items.is_empty() {
        result.push(format!("{open}{}{close}", items.join("")));
    }

    result.join("\n")
}

/// Image syntax is link syntax prefixed with `!`, so this pass has to run
/// before the link pass gets a chance at the overlapping text.
fn images(text: &str) -> String {
    let re = Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap();
    re.replace_all(
        text,
        r#"<img src="$2" alt="$1" class="max-w-full h-auto rounded-md my-6 shadow-sm" />"#,
    )
    .into_owned()
}

fn links(text: &str) -> String {
    let re = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
    re.replace_all(
        text,
        r#"<a href="$2" class="text-accent hover:text-accent/80 underline transition-colors" target="_blank" rel="noopener noreferrer">$1</a>"#,
    )
    .into_owned()
}

fn horizontal_rules(text: &str) -> String {
    let re = Regex::new(r"(?m)^---$").unwrap();
    re.replace_all(text, r#"<hr class="my-8 border-t border-gray-300" />"#)
        .into_owned()
}

/// A header row immediately followed by a separator row opens a table:
/// the wrapper, the `<thead>` and an unclosed `<tbody>` are emitted in one
/// replacement. Body rows and the closing tags come from the next passes.
fn table_heads(text: &str) -> String {
    let re = Regex::new(r"(?m)^\|(.+)\|\s*\n\|([-:\s|]+)\|\s*$").unwrap();
    re.replace_all(text, |caps: &Captures| {
        let cells: String = caps[1]
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(|cell| {
                format!(
                    r#"<th class="border border-gray-300 px-4 py-2 bg-gray-100 text-left font-semibold">{cell}</th>"#
                )
            })
            .collect();
        format!(
            r#"<div class="overflow-x-auto my-6"><table class="w-full border-collapse shadow-sm"><thead><tr>{cells}</tr></thead><tbody>"#
        )
    })
    .into_owned()
}

/// Every remaining `|...|` line becomes a body row.
fn table_rows(text: &str) -> String {
    let re = Regex::new(r"(?m)^\|(.+)\|\s*$").unwrap();
    re.replace_all(text, |caps: &Captures| {
        let matched = &caps[0];
        if matched.contains("<table") {
            return matched.to_string();
        }
        let cells: String = caps[1]
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(|cell| format!(r#"<td class="border border-gray-300 px-4 py-2">{cell}</td>"#))
            .collect();
        format!("<tr>{cells}</tr>")
    })
    .into_owned()
}

/// Close open tables: a `</tr>` that is not followed (after optional
/// whitespace) by another row, a tbody close or the thead close gets the
/// closing tag sequence appended, consuming the skipped whitespace. A table
/// still open at the end of input is closed the same way. The scan is
/// intentionally naive about adjacent tables and trailing content.
fn close_tables(text: &str) -> String {
    const ROW_END: &str = "</tr>";
    const CLOSING: &str = "</tbody></table></div>";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(ROW_END) {
        let end = idx + ROW_END.len();
        out.push_str(&rest[..end]);
        let after = &rest[end..];
        let trimmed = after.trim_start();
        if trimmed.starts_with("<tr") || trimmed.starts_with("</tbody>") || trimmed.starts_with("</thead>") {
            rest = after;
        } else {
            out.push_str(CLOSING);
            rest = trimmed;
        }
    }

    out.push_str(rest);
    out
}

/// Last pass: wrap leftover text lines. Lines are trimmed, blank lines are
/// dropped, and anything already starting with a tag passes through.
fn paragraphs(text: &str) -> String {
    let mut result: Vec<String> = Vec::new();

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('<') {
            result.push(line.to_string());
        } else {
            result.push(format!(r#"<p class="my-4 leading-7 text-base">{line}</p>"#));
        }
    }

    result.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(convert(""), "");
    }

    #[test]
    fn test_h1() {
        assert_eq!(
            convert("# Title"),
            r#"<h1 class="text-3xl font-bold my-6 text-primary border-b pb-2">Title</h1>"#
        );
    }

    #[test]
    fn test_header_levels() {
        let html = convert("### Section\n###### Fine print");
        assert!(html.contains(r#"<h3 class="text-xl font-semibold my-4 text-primary">Section</h3>"#));
        assert!(html.contains("<h6 class=\"text-sm font-semibold my-4 text-primary\">Fine print</h6>"));
    }

    #[test]
    fn test_header_requires_space_after_hashes() {
        let html = convert("#NoSpace");
        assert!(!html.contains("<h1"));
        assert!(html.contains("<p class=\"my-4 leading-7 text-base\">#NoSpace</p>"));
    }

    #[test]
    fn test_emphasis() {
        let html = convert("**bold** and *italic*");
        assert!(html.contains(r#"<strong class="font-bold">bold</strong>"#));
        assert!(html.contains(r#"<em class="italic">italic</em>"#));
        assert!(!html.contains('*'));
    }

    #[test]
    fn test_underscore_emphasis() {
        let html = convert("__bold__ and _italic_");
        assert!(html.contains(r#"<strong class="font-bold">bold</strong>"#));
        assert!(html.contains(r#"<em class="italic">italic</em>"#));
        assert!(!html.contains("__"));
    }

    #[test]
    fn test_blockquote_per_line() {
        let html = convert("> first\n> second");
        assert_eq!(html.matches("<blockquote").count(), 2);
        assert!(html.contains(">first</blockquote>"));
        assert!(html.contains(">second</blockquote>"));
    }

    #[test]
    fn test_fenced_code_block_is_escaped_and_tagged() {
        let html = convert("```js\nlet x = a < b;\n```");
        assert!(html.contains("language-js"));
        assert!(html.contains("let x = a &lt; b;"));
        assert!(!html.contains("a < b"));
    }

    #[test]
    fn test_fenced_code_block_without_language() {
        let html = convert("```\n\"quoted\" & more\n```");
        assert!(html.contains("language-plaintext"));
        assert!(html.contains("&quot;quoted&quot; &amp; more"));
    }

    #[test]
    fn test_emphasis_pass_reaches_inside_fences() {
        // Pass order quirk carried over from the legacy converter: emphasis
        // rewriting happens before the fence body is escaped.
        let html = convert("```\n**x**\n```");
        assert!(html.contains("&lt;strong"));
    }

    #[test]
    fn test_inline_code_is_not_escaped() {
        let html = convert("use `a < b` here");
        assert!(html.contains(
            r#"<code class="bg-gray-100 px-2 py-0.5 rounded text-sm font-mono text-primary/80">a < b</code>"#
        ));
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            convert("- a\n- b\n- c"),
            concat!(
                r#"<ul class="list-disc pl-6 my-6">"#,
                r#"<li class="ml-6 my-2 text-base">a</li>"#,
                r#"<li class="ml-6 my-2 text-base">b</li>"#,
                r#"<li class="ml-6 my-2 text-base">c</li>"#,
                "</ul>"
            )
        );
    }

    #[test]
    fn test_list_run_ends_at_non_list_line() {
        let html = convert("- a\n- b\ntail");
        let ul_end = html.find("</ul>").unwrap();
        let tail = html.find("tail").unwrap();
        assert!(ul_end < tail);
        assert_eq!(html.matches("<ul").count(), 1);
        assert!(html.contains(r#"<p class="my-4 leading-7 text-base">tail</p>"#));
    }

    #[test]
    fn test_ordered_list_drops_explicit_numbers() {
        assert_eq!(
            convert("1. a\n2. b"),
            concat!(
                r#"<ol class="list-decimal pl-6 my-6">"#,
                r#"<li class="ml-6 my-2 text-base">a</li>"#,
                r#"<li class="ml-6 my-2 text-base">b</li>"#,
                "</ol>"
            )
        );
    }

    #[test]
    fn test_alternate_list_markers() {
        let html = convert("* a\n+ b");
        assert_eq!(html.matches("<li").count(), 2);
        assert_eq!(html.matches("<ul").count(), 1);
    }

    #[test]
    fn test_link() {
        let html = convert("[Rust](https://rust-lang.org)");
        assert!(html.contains(r#"href="https://rust-lang.org""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains(">Rust</a>"));
    }

    #[test]
    fn test_image_wins_over_link() {
        let html = convert("![logo](logo.png)");
        assert!(html.contains(r#"<img src="logo.png" alt="logo""#));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_horizontal_rule() {
        let html = convert("above\n---\nbelow");
        assert!(html.contains(r#"<hr class="my-8 border-t border-gray-300" />"#));
    }

    #[test]
    fn test_table() {
        let html = convert("| H1 | H2 |\n|---|---|\n| a | b |");
        assert!(html.contains(
            r#"<th class="border border-gray-300 px-4 py-2 bg-gray-100 text-left font-semibold">H1</th>"#
        ));
        assert!(html.contains(">H2</th>"));
        assert!(html.contains(r#"<td class="border border-gray-300 px-4 py-2">a</td>"#));
        assert!(html.contains(">b</td>"));
        assert_eq!(html.matches("<thead>").count(), 1);
        assert_eq!(html.matches("<tbody>").count(), 1);
        assert_eq!(html.matches("</tbody></table></div>").count(), 1);
    }

    #[test]
    fn test_table_closed_once_after_last_row() {
        let html = convert("| A |\n|---|\n| 1 |\n| 2 |\n\nafter");
        assert_eq!(html.matches("</tbody></table></div>").count(), 1);
        let close = html.find("</tbody></table></div>").unwrap();
        let last_row = html.rfind("<tr><td").unwrap();
        assert!(last_row < close);
        // The close scan consumes the whitespace it skipped, so trailing
        // content ends up glued to the closing tags. Preserved as-is.
        assert!(html.contains("</div>after"));
    }

    #[test]
    fn test_trailing_table_is_closed() {
        let html = convert("| A |\n|---|\n| 1 |");
        assert!(html.ends_with("</tbody></table></div>"));
    }

    #[test]
    fn test_paragraphs_and_blank_lines() {
        let html = convert("first\n\nsecond");
        assert_eq!(
            html,
            "<p class=\"my-4 leading-7 text-base\">first</p>\n<p class=\"my-4 leading-7 text-base\">second</p>"
        );
    }

    #[test]
    fn test_unmatched_syntax_passes_through() {
        let html = convert("some ~odd~ text");
        assert!(html.contains("~odd~"));
    }

    #[test]
    fn test_crlf_input() {
        let html = convert("# A\r\ntext\r\n");
        assert!(html.contains("<h1"));
        assert!(html.contains(r#"<p class="my-4 leading-7 text-base">text</p>"#));
    }
}

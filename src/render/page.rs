//! Whole-page HTML assembly.
//!
//! Renders an ordered list of (heading, body) section pairs into one
//! self-contained document: headings become `<hN>` tags, bodies run through
//! the Markdown pipeline, and the result is spliced into a minimal HTML
//! shell.

use crate::Result;
use crate::markdown::markdown_to_richtext;
use crate::render::html::escape_html;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
</head>
<body>
{{ page_html }}
</body>
</html>
"#;

/// One section of a page: a markdown heading line plus markdown body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSection {
    pub heading: String,
    pub body: String,
}

/// Split a markdown heading line into its level and content.
///
/// Returns `None` when the line carries no `#` prefix or more than six.
pub fn heading_level_and_content(line: &str) -> Option<(u8, &str)> {
    let pounds = line.chars().take_while(|&ch| ch == '#').count();
    if pounds == 0 || pounds > 6 {
        return None;
    }
    Some((pounds as u8, line[pounds..].trim()))
}

/// Format heading text as a markdown heading line, clamping the level to
/// the `h1`..`h6` range.
pub fn markdown_heading(level: u8, text: &str) -> String {
    let level = level.clamp(1, 6);
    format!("{} {text}", "#".repeat(usize::from(level)))
}

/// Render sections into a complete HTML page.
///
/// Headings without a `#` marker render as `<h1>`. Section bodies are
/// parsed as markdown, so a malformed body surfaces its parse error.
pub fn render_page(title: &str, sections: &[PageSection]) -> Result<String> {
    let mut page_html = String::new();
    for section in sections {
        let (level, content) = heading_level_and_content(&section.heading)
            .unwrap_or((1, section.heading.as_str()));
        page_html.push_str(&heading_html(level, content));
        page_html.push_str("<br><br>");
        page_html.push_str(&markdown_to_richtext(&section.body)?.to_html());
    }
    Ok(PAGE_TEMPLATE
        .replace("{{ title }}", &escape_html(title))
        .replace("{{ page_html }}", &page_html))
}

fn heading_html(level: u8, content: &str) -> String {
    format!("<h{level}>{}</h{level}>", escape_html(content))
}

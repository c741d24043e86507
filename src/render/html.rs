//! Rich-text to HTML serialization.
//!
//! Sections, quotes, and code blocks map to single wrapper tags.
//! Consecutive list elements are batched through a nested-list
//! reconciliation pass: adjacency plus `indent` in the flat model becomes
//! real `<ul>`/`<ol>` nesting, with a deeper list opened inside the still
//! dangling `<li>` of the previous item.

use crate::model::{BlockElement, InlineSpan, ListStyle, RichTextBlock};

/// Render a whole block to HTML.
pub fn render_block(block: &RichTextBlock) -> String {
    let mut out = String::new();
    let elements = &block.elements;
    let mut index = 0;
    while index < elements.len() {
        match &elements[index] {
            BlockElement::List { .. } => {
                let start = index;
                while index < elements.len()
                    && matches!(elements[index], BlockElement::List { .. })
                {
                    index += 1;
                }
                render_list_batch(&elements[start..index], &mut out);
            }
            BlockElement::Section { spans } => {
                out.push_str("<p>");
                push_spans(spans, &mut out);
                out.push_str("</p>");
                index += 1;
            }
            BlockElement::Preformatted { spans } => {
                // Code content is raw text: no style wrapping, newlines
                // stay literal instead of becoming <br>.
                out.push_str("<pre><code>");
                for span in spans {
                    out.push_str(&escape_html(&span.text));
                }
                out.push_str("</code></pre>");
                index += 1;
            }
            BlockElement::Quote { spans } => {
                out.push_str("<blockquote>");
                push_spans(spans, &mut out);
                out.push_str("</blockquote>");
                index += 1;
            }
        }
    }
    out
}

// ========================================================================
// Nested-list reconciliation
// ========================================================================

struct ListFrame {
    style: ListStyle,
    indent: usize,
    /// The last emitted `<li>` is left unclosed in case the next list in
    /// the batch nests under it.
    has_open_li: bool,
}

fn render_list_batch(batch: &[BlockElement], out: &mut String) {
    let mut stack: Vec<ListFrame> = Vec::new();
    for element in batch {
        let BlockElement::List {
            style,
            indent,
            items,
            ..
        } = element
        else {
            continue;
        };
        while stack.last().is_some_and(|top| top.indent > *indent) {
            close_list(&mut stack, out);
        }
        match stack.last() {
            Some(top) if top.indent == *indent && top.style == *style => {}
            Some(top) if top.indent == *indent => {
                close_list(&mut stack, out);
                open_list(*style, *indent, &mut stack, out);
            }
            _ => open_list(*style, *indent, &mut stack, out),
        }
        for item in items {
            if let Some(top) = stack.last_mut() {
                if top.has_open_li {
                    out.push_str("</li>");
                }
                top.has_open_li = true;
            }
            out.push_str("<li>");
            push_spans(item, out);
        }
    }
    while !stack.is_empty() {
        close_list(&mut stack, out);
    }
}

fn open_list(style: ListStyle, indent: usize, stack: &mut Vec<ListFrame>, out: &mut String) {
    out.push_str(match style {
        ListStyle::Bullet => "<ul>",
        ListStyle::Ordered => "<ol>",
    });
    stack.push(ListFrame {
        style,
        indent,
        has_open_li: false,
    });
}

fn close_list(stack: &mut Vec<ListFrame>, out: &mut String) {
    let Some(frame) = stack.pop() else { return };
    if frame.has_open_li {
        out.push_str("</li>");
    }
    out.push_str(match frame.style {
        ListStyle::Bullet => "</ul>",
        ListStyle::Ordered => "</ol>",
    });
}

// ========================================================================
// Spans
// ========================================================================

fn push_spans(spans: &[InlineSpan], out: &mut String) {
    for span in spans {
        out.push_str(&span_html(span));
    }
}

fn span_html(span: &InlineSpan) -> String {
    let mut html = escape_html(&span.text).replace('\n', "<br>");
    if let Some(style) = span.style {
        if style.bold {
            html = format!("<strong>{html}</strong>");
        }
        if style.italic {
            html = format!("<em>{html}</em>");
        }
        if style.code {
            html = format!("<code>{html}</code>");
        }
        if style.strike {
            html = format!("<del>{html}</del>");
        }
    }
    if let Some(url) = &span.url {
        html = format!("<a href=\"{}\">{html}</a>", escape_html(url));
    }
    html
}

/// Escape the five HTML-significant characters.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

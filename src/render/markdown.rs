//! Rich-text to Markdown serialization.

use crate::model::{BlockElement, InlineSpan, ListStyle, RichTextBlock};

/// Render a whole block back to Markdown.
///
/// Elements are concatenated in order. A non-section element that is not
/// last gets a trailing newline; sections already self-terminate because
/// the block parser closes them with one.
pub fn render_block(block: &RichTextBlock) -> String {
    let mut out = String::new();
    for (index, element) in block.elements.iter().enumerate() {
        out.push_str(&render_element(element));
        let last = index + 1 == block.elements.len();
        if !last && !matches!(element, BlockElement::Section { .. }) {
            out.push('\n');
        }
    }
    out
}

fn render_element(element: &BlockElement) -> String {
    match element {
        BlockElement::Section { spans } => render_spans(spans),
        BlockElement::List {
            style,
            indent,
            offset,
            items,
        } => render_list(*style, *indent, *offset, items),
        BlockElement::Preformatted { spans } => spans
            .iter()
            .map(|span| format!("```\n{}\n```", render_span(span)))
            .collect(),
        BlockElement::Quote { spans } => render_spans(spans)
            .split('\n')
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_list(
    style: ListStyle,
    indent: usize,
    offset: usize,
    items: &[Vec<InlineSpan>],
) -> String {
    let indentation = " ".repeat(indent * 4);
    let lines: Vec<String> = match style {
        ListStyle::Ordered => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                // Numbering saturates: a marker at the native maximum must
                // not wrap when later items increment past it.
                let number = offset.saturating_add(1).saturating_add(i);
                format!("{indentation}{number}. {}", render_spans(item))
            })
            .collect(),
        ListStyle::Bullet => items
            .iter()
            .map(|item| format!("{indentation}* {}", render_spans(item)))
            .collect(),
    };
    lines.join("\n")
}

fn render_spans(spans: &[InlineSpan]) -> String {
    spans.iter().map(render_span).collect()
}

/// Re-wrap one span in its markers: bold innermost, then italic, code,
/// strike, with any link applied last.
fn render_span(span: &InlineSpan) -> String {
    let mut text = span.text.clone();
    if let Some(style) = span.style {
        if style.bold {
            text = format!("**{text}**");
        }
        if style.italic {
            text = format!("*{text}*");
        }
        if style.code {
            text = format!("`{text}`");
        }
        if style.strike {
            text = format!("~~{text}~~");
        }
    }
    if let Some(url) = &span.url {
        text = format!("[{text}]({url})");
    }
    text
}

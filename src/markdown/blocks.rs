//! Markdown block state machine.
//!
//! Feeds the input one line at a time through a strict classification
//! chain (fence toggle, fence content, quote, ordered item, bullet item,
//! section) and incrementally grows a [`RichTextBlock`]. Exactly one
//! element is open at any time; a line that cannot extend it closes it
//! onto the completed list and opens a fresh one.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::spans::tokenize_line;
use crate::error::{Error, Result};
use crate::model::{BlockElement, InlineSpan, ListStyle, RichTextBlock};

/// Matches a block-quote line; the capture is the content after `> `.
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s(.*)$").unwrap());

/// Matches an ordered-list item: indent, number, content.
static ORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d+)\.\s(.*)$").unwrap());

/// Matches a bullet-list item: indent, content.
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\s*)\*\s(.*)$").unwrap());

/// Convert a Markdown string into a rich-text block.
pub fn markdown_to_richtext(markdown: &str) -> Result<RichTextBlock> {
    let mut parser = BlockParser::default();
    for line in markdown.split('\n') {
        parser.feed_line(line)?;
    }
    Ok(parser.finish())
}

#[derive(Default)]
struct BlockParser {
    completed: Vec<BlockElement>,
    current: Option<BlockElement>,
}

impl BlockParser {
    /// Classify one line and hand it to exactly one handler.
    fn feed_line(&mut self, line: &str) -> Result<()> {
        if line.starts_with("```") {
            self.toggle_fence();
            return Ok(());
        }
        if matches!(self.current, Some(BlockElement::Preformatted { .. })) {
            return self.preformatted_line(line);
        }
        if let Some(caps) = QUOTE_RE.captures(line) {
            let content = caps.get(1).map_or("", |m| m.as_str());
            return self.quote_line(content);
        }
        if let Some(caps) = ORDERED_RE.captures(line) {
            let indent = self.parse_indent(caps.get(1).map_or("", |m| m.as_str()), line)?;
            let number = caps.get(2).map_or("", |m| m.as_str());
            let content = caps.get(3).map_or("", |m| m.as_str());
            // A number too large to represent is not a real list marker.
            if let Ok(number) = number.parse::<usize>() {
                let offset = number.saturating_sub(1);
                return self.list_item(ListStyle::Ordered, indent, offset, content);
            }
            return self.section_line(line);
        }
        if let Some(caps) = BULLET_RE.captures(line) {
            let indent = self.parse_indent(caps.get(1).map_or("", |m| m.as_str()), line)?;
            let content = caps.get(2).map_or("", |m| m.as_str());
            return self.list_item(ListStyle::Bullet, indent, 0, content);
        }
        self.section_line(line)
    }

    /// Push whatever is still open. EOF does not normalize trailing
    /// newlines; only a mid-document close does.
    fn finish(mut self) -> RichTextBlock {
        if let Some(element) = self.current.take() {
            self.completed.push(element);
        }
        RichTextBlock::new(self.completed)
    }

    fn toggle_fence(&mut self) {
        if matches!(self.current, Some(BlockElement::Preformatted { .. })) {
            self.completed.extend(self.current.take());
        } else {
            self.close_current();
            self.current = Some(BlockElement::Preformatted { spans: Vec::new() });
        }
    }

    fn preformatted_line(&mut self, line: &str) -> Result<()> {
        // Tokenizer output is concatenated verbatim; code content never
        // keeps style structure.
        let combined: String = tokenize_line(line)?
            .iter()
            .map(|span| span.text.as_str())
            .collect();
        let Some(BlockElement::Preformatted { spans }) = &mut self.current else {
            return Ok(());
        };
        match spans.last_mut() {
            Some(last) => {
                last.text.push('\n');
                last.text.push_str(&combined);
            }
            None => spans.push(InlineSpan::plain(combined)),
        }
        Ok(())
    }

    fn quote_line(&mut self, content: &str) -> Result<()> {
        let new_spans = tokenize_line(content)?;
        if let Some(BlockElement::Quote { spans }) = &mut self.current {
            append_line_spans(spans, new_spans);
        } else {
            self.close_current();
            self.current = Some(BlockElement::Quote { spans: new_spans });
        }
        Ok(())
    }

    fn list_item(
        &mut self,
        style: ListStyle,
        indent: usize,
        offset: usize,
        content: &str,
    ) -> Result<()> {
        let item = tokenize_line(content)?;
        match &mut self.current {
            Some(BlockElement::List {
                style: open_style,
                indent: open_indent,
                items,
                ..
            }) if *open_style == style && *open_indent == indent => {
                items.push(item);
            }
            _ => {
                self.close_current();
                self.current = Some(BlockElement::List {
                    style,
                    indent,
                    offset,
                    items: vec![item],
                });
            }
        }
        Ok(())
    }

    fn section_line(&mut self, line: &str) -> Result<()> {
        let new_spans = tokenize_line(line)?;
        if let Some(BlockElement::Section { spans }) = &mut self.current {
            append_line_spans(spans, new_spans);
        } else {
            self.close_current();
            self.current = Some(BlockElement::Section { spans: new_spans });
        }
        Ok(())
    }

    fn parse_indent(&self, leading: &str, line: &str) -> Result<usize> {
        let spaces = leading.len();
        if spaces % 4 != 0 {
            return Err(Error::InvalidIndentation {
                spaces,
                line: line.to_string(),
            });
        }
        Ok(spaces / 4)
    }

    /// Close the open element onto the completed list. A closing section
    /// is terminated with a newline so the blank-line separator survives
    /// serialization.
    fn close_current(&mut self) {
        let Some(mut element) = self.current.take() else {
            return;
        };
        if let BlockElement::Section { spans } = &mut element {
            terminate_spans(spans);
        }
        self.completed.push(element);
    }
}

/// Append one source line's spans to an open element, separated from the
/// previous line by a forced newline. Adjacent plain spans fuse.
fn append_line_spans(spans: &mut Vec<InlineSpan>, new_spans: Vec<InlineSpan>) {
    match spans.last_mut() {
        Some(last) if last.is_plain() => last.text.push('\n'),
        Some(_) => spans.push(InlineSpan::plain("\n")),
        None => {}
    }
    for span in new_spans {
        match spans.last_mut() {
            Some(last) if last.is_plain() && span.is_plain() => last.text.push_str(&span.text),
            _ => spans.push(span),
        }
    }
}

/// Make sure the last span ends in `\n`, extending a plain span in place
/// or appending a synthetic newline span after a styled one.
fn terminate_spans(spans: &mut Vec<InlineSpan>) {
    match spans.last_mut() {
        Some(last) if last.is_plain() => {
            if !last.text.ends_with('\n') {
                last.text.push('\n');
            }
        }
        Some(last) => {
            if !last.text.ends_with('\n') {
                spans.push(InlineSpan::plain("\n"));
            }
        }
        None => {}
    }
}

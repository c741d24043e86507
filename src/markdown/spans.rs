//! Inline span tokenizer.
//!
//! Splits one line of Markdown into plain and styled spans. Five pattern
//! families locate style candidates on the raw line, the candidate byte
//! ranges are fused into non-overlapping intervals, and each interval is
//! peeled recursively (one markup layer per pass) into a styled span.
//! Text between intervals becomes plain filler spans.
//!
//! The finder patterns need lookaround (escape and marker-adjacency
//! guards), hence `fancy_regex`; the peelers are anchored and stay on
//! `regex_lite`.

use std::sync::LazyLock;

use fancy_regex::Regex as FancyRegex;
use regex_lite::Regex;

use crate::error::{Error, Result};
use crate::model::{InlineSpan, SpanStyle};

// === Finder patterns (scan the raw line) ===

/// Matches `**bold**` with no further `*` adjacent and no escaping `\`.
static BOLD_RE: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?<!\\)\*\*(.+?)\*\*(?!\*)").unwrap());

/// Matches single-star `*italic*`, rejecting bold/underscore conflicts.
static ITALIC_RE: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?<!\*)\*([^*_]+?)\*(?!\*)").unwrap());

/// Matches `` `code` ``.
static CODE_RE: LazyLock<FancyRegex> = LazyLock::new(|| FancyRegex::new(r"`(.+?)`").unwrap());

/// Matches `~~strike~~` with no further `~` adjacent and no escaping `\`.
static STRIKE_RE: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?<!~|\\)~~(.+?)~~(?!~)").unwrap());

/// Matches `[text](url)`.
static LINK_RE: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?<!\\])\[([^\]]+?)\]\(([^)]+?)\)(?!\))").unwrap());

// === Peeler patterns (anchored, one layer per pass) ===

/// Strips one `**…**` layer off the front of a fused interval.
static BOLD_PEEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\*(.+)\*\*").unwrap());

/// Strips one `*…*` layer.
static ITALIC_PEEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*(.+)\*").unwrap());

/// Strips one `` `…` `` layer; the content is kept verbatim.
static CODE_PEEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^`(.+)`").unwrap());

/// Strips one `~~…~~` layer.
static STRIKE_PEEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^~~(.+)~~").unwrap());

/// Splits `[text](url)`; unlike the other peelers this must consume the
/// whole interval.
static LINK_PEEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+?)\]\(([^)\s]+)\)$").unwrap());

// === Tokenizer ===

/// Tokenize one line of Markdown into spans.
///
/// Returns [`Error::InvalidStyledSpan`] when interval fusion produces text
/// that no wrapper pattern can peel.
pub(crate) fn tokenize_line(text: &str) -> Result<Vec<InlineSpan>> {
    let mut intervals = Vec::new();
    for finder in [&BOLD_RE, &ITALIC_RE, &CODE_RE, &STRIKE_RE, &LINK_RE] {
        // A backtracking failure means no usable match, not a user error.
        for m in finder.find_iter(text).flatten() {
            intervals.push((m.start(), m.end()));
        }
    }
    let merged = merge_intervals(intervals);

    let mut spans = Vec::new();
    let mut cursor = 0;
    for (start, end) in merged {
        if cursor < start {
            spans.push(InlineSpan::plain(&text[cursor..start]));
        }
        spans.push(peel_styled(&text[start..end])?);
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(InlineSpan::plain(&text[cursor..]));
    }
    Ok(spans)
}

/// Fuse candidate ranges into non-overlapping `[start, end)` intervals.
///
/// Sorted by start; a range whose start falls inside the current interval
/// extends it. Ranges that merely touch stay separate.
fn merge_intervals(mut intervals: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    intervals.sort_by_key(|&(start, _)| start);
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn peel_styled(text: &str) -> Result<InlineSpan> {
    let mut span = InlineSpan::plain("");
    peel_into(text, &mut span, true)?;
    Ok(span)
}

/// Recursive single-pass peeler: bold, italic, code, strike, link, in
/// that fixed priority. Code stops recursion (its content is verbatim);
/// unmatched text is an error only at the recursion root.
fn peel_into(text: &str, span: &mut InlineSpan, root: bool) -> Result<()> {
    if let Some(caps) = BOLD_PEEL_RE.captures(text) {
        span.style.get_or_insert_with(SpanStyle::default).bold = true;
        return peel_into(caps.get(1).map_or("", |m| m.as_str()), span, false);
    }
    if let Some(caps) = ITALIC_PEEL_RE.captures(text) {
        span.style.get_or_insert_with(SpanStyle::default).italic = true;
        return peel_into(caps.get(1).map_or("", |m| m.as_str()), span, false);
    }
    if let Some(caps) = CODE_PEEL_RE.captures(text) {
        span.style.get_or_insert_with(SpanStyle::default).code = true;
        span.text = caps.get(1).map_or("", |m| m.as_str()).to_string();
        return Ok(());
    }
    if let Some(caps) = STRIKE_PEEL_RE.captures(text) {
        span.style.get_or_insert_with(SpanStyle::default).strike = true;
        return peel_into(caps.get(1).map_or("", |m| m.as_str()), span, false);
    }
    if let Some(caps) = LINK_PEEL_RE.captures(text) {
        span.url = caps.get(2).map(|m| m.as_str().to_string());
        return peel_into(caps.get(1).map_or("", |m| m.as_str()), span, false);
    }
    if root {
        return Err(Error::InvalidStyledSpan(text.to_string()));
    }
    span.text = text.to_string();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_is_one_span() {
        let spans = tokenize_line("no styles here").unwrap();
        assert_eq!(spans, vec![InlineSpan::plain("no styles here")]);
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(tokenize_line("").unwrap().is_empty());
    }

    #[test]
    fn mixed_styles_split_into_alternating_spans() {
        let spans = tokenize_line("**bold** and *italic* and `code`").unwrap();
        assert_eq!(
            spans,
            vec![
                InlineSpan::styled("bold", SpanStyle::bold()),
                InlineSpan::plain(" and "),
                InlineSpan::styled("italic", SpanStyle::italic()),
                InlineSpan::plain(" and "),
                InlineSpan::styled("code", SpanStyle::code()),
            ]
        );
        for span in spans.iter().filter(|s| !s.is_plain()) {
            let style = span.style.unwrap();
            let flags = [style.bold, style.italic, style.code, style.strike];
            assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
        }
    }

    #[test]
    fn triple_star_peels_to_bold_italic() {
        let spans = tokenize_line("***just***").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "just");
        let style = spans[0].style.unwrap();
        assert!(style.bold && style.italic);
    }

    #[test]
    fn link_span_carries_url() {
        let spans = tokenize_line("see [docs](https://example.com/kb) now").unwrap();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text, "docs");
        assert_eq!(spans[1].url.as_deref(), Some("https://example.com/kb"));
        assert!(spans[1].style.is_none());
    }

    #[test]
    fn link_text_carries_inner_styles() {
        let spans = tokenize_line("[***just***](http://www.example.com)").unwrap();
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.text, "just");
        assert_eq!(span.url.as_deref(), Some("http://www.example.com"));
        let style = span.style.unwrap();
        assert!(style.bold && style.italic);
    }

    #[test]
    fn only_double_tilde_strikes() {
        let spans = tokenize_line("~one~ then ~~two~~").unwrap();
        assert_eq!(
            spans,
            vec![
                InlineSpan::plain("~one~ then "),
                InlineSpan::styled("two", SpanStyle::strike()),
            ]
        );
    }

    #[test]
    fn code_content_is_verbatim() {
        let spans = tokenize_line("`a **b** *c*`").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "a **b** *c*");
        assert!(spans[0].style.unwrap().code);
    }

    #[test]
    fn underscore_blocks_italic() {
        let spans = tokenize_line("*snake_case*").unwrap();
        assert_eq!(spans, vec![InlineSpan::plain("*snake_case*")]);
    }

    #[test]
    fn escaped_stars_stay_plain() {
        let spans = tokenize_line(r"\**not bold**").unwrap();
        assert_eq!(spans, vec![InlineSpan::plain(r"\**not bold**")]);
    }

    #[test]
    fn touching_styles_stay_separate_spans() {
        let spans = tokenize_line("**a**`b`").unwrap();
        assert_eq!(
            spans,
            vec![
                InlineSpan::styled("a", SpanStyle::bold()),
                InlineSpan::styled("b", SpanStyle::code()),
            ]
        );
    }

    #[test]
    fn unpeelable_fusion_is_an_error() {
        // The bold candidate starts inside the link and extends past it,
        // so fusion yields text no single wrapper fully matches.
        let err = tokenize_line("[a](b**)c**").unwrap_err();
        assert!(matches!(err, Error::InvalidStyledSpan(_)));
    }
}

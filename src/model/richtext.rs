//! Rich-text block model.
//!
//! The interchange format between the Markdown pipeline and the serializers:
//! an ordered sequence of typed block elements, each holding styled inline
//! spans. Block kinds never nest inside each other's spans; list nesting is
//! expressed by adjacency plus `indent`.

/// A parsed rich-text document: ordered block elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RichTextBlock {
    pub elements: Vec<BlockElement>,
}

/// An atomic block element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BlockElement {
    /// A paragraph-like run of spans. Internal `\n` spans separate what
    /// were separate source lines.
    Section { spans: Vec<InlineSpan> },
    /// One run of same-style, same-indent list items. Each item is its own
    /// span sequence.
    List {
        style: ListStyle,
        /// Nesting depth in 4-space steps.
        indent: usize,
        /// Starting number minus one; only meaningful for ordered lists.
        offset: usize,
        items: Vec<Vec<InlineSpan>>,
    },
    /// Fenced code content, stored as a single merged plain span chain.
    Preformatted { spans: Vec<InlineSpan> },
    /// Block quote content.
    Quote { spans: Vec<InlineSpan> },
}

/// List marker family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ListStyle {
    Bullet,
    Ordered,
}

/// A contiguous run of inline text.
///
/// A span is "plain" when it carries neither style nor link target; adjacent
/// plain spans are merged by the block state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InlineSpan {
    pub text: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub style: Option<SpanStyle>,
    /// Link target; present iff the span is a link.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub url: Option<String>,
}

/// Style flags for one span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpanStyle {
    #[cfg_attr(feature = "serde", serde(default))]
    pub bold: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub italic: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub code: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strike: bool,
}

impl RichTextBlock {
    pub fn new(elements: Vec<BlockElement>) -> Self {
        RichTextBlock { elements }
    }

    /// Serialize back to Markdown. See [`crate::render::markdown`].
    pub fn to_markdown(&self) -> String {
        crate::render::markdown::render_block(self)
    }

    /// Serialize to HTML. See [`crate::render::html`].
    pub fn to_html(&self) -> String {
        crate::render::html::render_block(self)
    }
}

impl BlockElement {
    /// Spans of a non-list element; `None` for lists.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        match self {
            BlockElement::Section { spans }
            | BlockElement::Preformatted { spans }
            | BlockElement::Quote { spans } => Some(spans),
            BlockElement::List { .. } => None,
        }
    }
}

impl InlineSpan {
    /// An unstyled, unlinked span.
    pub fn plain(text: impl Into<String>) -> Self {
        InlineSpan {
            text: text.into(),
            style: None,
            url: None,
        }
    }

    /// A styled span with no link target.
    pub fn styled(text: impl Into<String>, style: SpanStyle) -> Self {
        InlineSpan {
            text: text.into(),
            style: Some(style),
            url: None,
        }
    }

    /// A link span, optionally styled.
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        InlineSpan {
            text: text.into(),
            style: None,
            url: Some(url.into()),
        }
    }

    pub fn is_plain(&self) -> bool {
        self.style.is_none() && self.url.is_none()
    }
}

impl SpanStyle {
    pub fn bold() -> Self {
        SpanStyle {
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        SpanStyle {
            italic: true,
            ..Default::default()
        }
    }

    pub fn code() -> Self {
        SpanStyle {
            code: true,
            ..Default::default()
        }
    }

    pub fn strike() -> Self {
        SpanStyle {
            strike: true,
            ..Default::default()
        }
    }
}

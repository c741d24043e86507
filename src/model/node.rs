//! Generic markup-node tree.
//!
//! The structural model built from an HTML tag stream. A node is either a
//! pure text leaf or a tag node with children; the tree is owned top-down
//! with no back-references and is consumed immediately by the section
//! parser.

// ============================================================================
// Tags
// ============================================================================

/// The closed set of tag names the tree builder materializes.
///
/// `b` and `strong` render identically but stay distinct so end-tag matching
/// remains name-exact (`</strong>` never closes `<b>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// h1 through h6; the payload is the level.
    Heading(u8),
    Paragraph,
    BulletList,
    OrderedList,
    ListItem,
    Link,
    Emphasis,
    Strong,
    Bold,
    Preformatted,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Image,
    /// Synthetic document root.
    Root,
}

impl Tag {
    /// Map a lowercase tag name to its variant. Unrecognized names (which
    /// the builder treats as structurally transparent) return `None`.
    pub fn parse(name: &str) -> Option<Tag> {
        Some(match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "ul" => Tag::BulletList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "a" => Tag::Link,
            "em" => Tag::Emphasis,
            "strong" => Tag::Strong,
            "b" => Tag::Bold,
            "pre" => Tag::Preformatted,
            "dl" => Tag::DefinitionList,
            "dt" => Tag::DefinitionTerm,
            "dd" => Tag::DefinitionDescription,
            "img" => Tag::Image,
            _ => return None,
        })
    }

    pub fn is_heading(self) -> bool {
        matches!(self, Tag::Heading(_))
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            Tag::Heading(level) => Some(level),
            _ => None,
        }
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A node in the parsed markup tree.
///
/// Invariant (enforced by the constructors): a text leaf has `text` set and
/// no tag or children; a tag node has `tag` set and no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    pub tag: Option<Tag>,
    pub text: Option<String>,
    /// Absolute URL for link/image nodes.
    pub url: Option<String>,
    /// True when the node was synthesized to hold stray text that arrived
    /// with no enclosing tag.
    pub placeholder: bool,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// The synthetic root of a parsed document.
    pub fn root() -> Self {
        MarkupNode::element(Tag::Root)
    }

    /// A tag node with no children yet.
    pub fn element(tag: Tag) -> Self {
        MarkupNode {
            tag: Some(tag),
            text: None,
            url: None,
            placeholder: false,
            children: Vec::new(),
        }
    }

    /// A pure text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        MarkupNode {
            tag: None,
            text: Some(text.into()),
            url: None,
            placeholder: false,
            children: Vec::new(),
        }
    }

    /// The synthetic paragraph that collects stray top-level text.
    pub fn placeholder() -> Self {
        MarkupNode {
            placeholder: true,
            ..MarkupNode::element(Tag::Paragraph)
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag.is_none()
    }

    pub fn is_heading(&self) -> bool {
        self.tag.is_some_and(Tag::is_heading)
    }

    pub fn heading_level(&self) -> Option<u8> {
        self.tag.and_then(Tag::heading_level)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the subtree to markdown-ish plain text.
    ///
    /// Text leaves render as their raw text. Tag nodes join their children's
    /// renderings (text children have newlines collapsed to spaces unless
    /// the parent is `pre`, tag children are indented one extra space per
    /// nesting level) and then wrap per tag: links append `" (URL)"`, images
    /// prefix `"Reference Image: URL "`, `em` wraps in backticks,
    /// `strong`/`b` in double quotes, `pre` in a fenced block, list items
    /// under `ul`/`dl` take a bullet and under `ol` a per-parent ordinal.
    pub fn to_text(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }

        let mut out = String::new();
        let mut ordinal = 0usize;
        for child in &self.children {
            let mut part = child.to_text();
            if child.is_text() {
                if self.tag != Some(Tag::Preformatted) {
                    part = part.replace('\n', " ");
                }
            } else {
                part = indent_block(&part);
            }
            match (self.tag, child.tag) {
                (Some(Tag::BulletList), Some(Tag::ListItem))
                | (Some(Tag::DefinitionList), Some(Tag::ListItem))
                | (Some(Tag::DefinitionList), Some(Tag::DefinitionTerm)) => {
                    part = format!("\n\n\u{2022} {}", part.trim_start());
                }
                (Some(Tag::OrderedList), Some(Tag::ListItem)) => {
                    ordinal += 1;
                    part = format!("\n\n{}. {}", ordinal, part.trim_start());
                }
                _ => {}
            }
            out.push_str(&part);
        }
        self.wrap(out)
    }

    fn wrap(&self, content: String) -> String {
        match self.tag {
            Some(Tag::Link) => match &self.url {
                Some(url) => format!("{content} ({url})"),
                None => content,
            },
            Some(Tag::Image) => match &self.url {
                Some(url) => format!("Reference Image: {url} {content}"),
                None => content,
            },
            Some(Tag::Emphasis) => format!("`{content}`"),
            Some(Tag::Strong) | Some(Tag::Bold) => format!("\"{content}\""),
            Some(Tag::Preformatted) => format!("\n\n```\n{content}```"),
            Some(Tag::BulletList) | Some(Tag::OrderedList) | Some(Tag::DefinitionList) => {
                format!("\n{content}")
            }
            Some(Tag::Paragraph) => format!("\n\n{content}"),
            Some(Tag::Heading(_)) => format!("\n\n\n\n{content}"),
            _ => content,
        }
    }
}

/// Indent every line containing non-whitespace by one space.
fn indent_block(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.trim().is_empty() {
            out.push(' ');
        }
        out.push_str(line);
    }
    out
}

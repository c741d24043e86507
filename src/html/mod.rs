//! HTML ingestion.
//!
//! Converts raw HTML into the section tree in three stages: the tokenizer
//! adapter flattens the document into tag events, the tree builder
//! assembles markup nodes, and the section builder folds headings into a
//! nested [`Section`] hierarchy.
//!
//! Parsing is anchored to the most significant heading level present in
//! the document (h1 before h2 before h3 before h4); a document with none
//! of those is rejected rather than guessed at.

mod builder;
mod events;

pub use builder::TreeBuilder;
pub use events::{TagEvent, collect_events};

use crate::error::{Error, Result};
use crate::model::{MarkupNode, Section, SectionOptions, Tag, build_section_tree};

/// Parse HTML into a markup-node tree rooted at a synthetic root.
///
/// Relative link and image targets are resolved against `base_url`.
/// Returns [`Error::NoHeadingFound`] when the document has no h1-h4
/// heading to anchor the parse.
pub fn parse_tree(html: &str, base_url: &str) -> Result<MarkupNode> {
    let events = collect_events(html);
    let gate = anchor_level(&events).ok_or(Error::NoHeadingFound)?;
    log::debug!("anchoring parse at h{gate}");
    let mut builder = TreeBuilder::new(gate, base_url);
    for event in events {
        builder.feed(event);
    }
    Ok(builder.finish())
}

/// Parse HTML into a section tree with default options.
pub fn parse_sections(html: &str, base_url: &str) -> Result<Section> {
    parse_sections_with(html, base_url, &SectionOptions::default())
}

/// Parse HTML into a section tree, flattening subsections deeper than
/// `options.max_depth` into their parent's body.
pub fn parse_sections_with(
    html: &str,
    base_url: &str,
    options: &SectionOptions,
) -> Result<Section> {
    let tree = parse_tree(html, base_url)?;
    Ok(build_section_tree(&tree, options))
}

/// The most significant h1-h4 level present anywhere in the document, or
/// `None` when the document has no anchor heading at all.
fn anchor_level(events: &[TagEvent]) -> Option<u8> {
    let mut seen = [false; 5];
    for event in events {
        if let TagEvent::Open { name, .. } = event
            && let Some(level @ 1..=4) = Tag::parse(name).and_then(Tag::heading_level)
        {
            seen[usize::from(level)] = true;
        }
    }
    (1..=4).find(|&level| seen[usize::from(level)])
}

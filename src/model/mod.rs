//! Core data model for document conversion.
//!
//! This module contains:
//! - Markup node tree (the structural model parsed from HTML)
//! - Section tree (the heading-derived outline)
//! - Rich-text block model (the Markdown/HTML interchange format)

mod node;
mod richtext;
pub mod section_tree;

// Re-export node types
pub use node::{MarkupNode, Tag};

// Re-export rich-text types
pub use richtext::{BlockElement, InlineSpan, ListStyle, RichTextBlock, SpanStyle};

// Re-export section tree
pub use section_tree::{Section, SectionOptions, Walk, build_section_tree};

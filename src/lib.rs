//! # vellum
//!
//! A fast, lightweight library for converting HTML documents into section
//! outlines and Markdown text into a styled rich-text model.
//!
//! ## Features
//!
//! - Parse HTML into a heading-anchored [`Section`] tree
//! - Parse Markdown into a typed [`RichTextBlock`] of styled inline spans
//! - Serialize rich text back to Markdown or to an HTML fragment
//! - Assemble complete HTML pages from heading/body section pairs
//!
//! ## Quick Start
//!
//! ```
//! use vellum::markdown_to_richtext;
//!
//! let block = markdown_to_richtext("A *quick* example:\n* parse\n* render").unwrap();
//!
//! // The block model serializes back to markdown or to HTML.
//! assert_eq!(block.to_markdown(), "A *quick* example:\n* parse\n* render");
//! assert_eq!(
//!     block.to_html(),
//!     "<p>A <em>quick</em> example:<br></p><ul><li>parse</li><li>render</li></ul>"
//! );
//! ```
//!
//! ## Working with Sections
//!
//! HTML documents become a tree of [`Section`]s, one per heading, each
//! owning the text beneath it:
//!
//! ```
//! use vellum::parse_sections;
//!
//! let html = "<h1>Guide</h1><p>Welcome.</p><h2>Install</h2><p>Steps.</p>";
//! let root = parse_sections(html, "https://example.com/docs").unwrap();
//!
//! let guide = &root.children[0];
//! assert_eq!(guide.body, "Guide\n\nWelcome.");
//! assert_eq!(guide.children[0].body, "Install\n\nSteps.");
//! ```

pub mod error;
pub mod html;
pub mod markdown;
pub mod model;
pub mod render;

pub use error::{Error, Result};
pub use html::{parse_sections, parse_sections_with, parse_tree};
pub use markdown::markdown_to_richtext;
pub use model::{
    BlockElement, InlineSpan, ListStyle, MarkupNode, RichTextBlock, Section, SectionOptions,
    SpanStyle, Tag,
};
pub use render::page::{PageSection, heading_level_and_content, markdown_heading, render_page};

//! Markdown ingestion.
//!
//! Converts Markdown text into the rich-text block model. The design
//! separates line classification from inline tokenization:
//!
//! - [`blocks`]: line-oriented state machine that grows block elements
//! - [`spans`]: inline tokenizer that splits one line into styled spans
//!
//! Serialization back out of the model lives in [`crate::render`].

mod blocks;
mod spans;

pub use blocks::markdown_to_richtext;

//! Serializers for the rich-text model.
//!
//! [`markdown`] re-emits a block as markdown text, [`html`] renders it as
//! an HTML fragment, and [`page`] assembles whole documents from
//! heading/body section pairs.

pub mod html;
pub mod markdown;
pub mod page;

//! Section tree extraction from a markup-node tree.
//!
//! Transforms the flat heading-anchored markup tree (where a heading node
//! owns the content up to the next heading of equal-or-lower level) into a
//! section outline keyed by heading level.

use std::collections::VecDeque;

use super::node::MarkupNode;

// ============================================================================
// Public Types
// ============================================================================

/// A node in the heading-derived document outline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Heading level 1-6, or 0 for the synthetic root.
    pub level: u8,
    /// Rendered text of everything under this heading that is not itself a
    /// deeper heading (the heading's own title text included).
    pub body: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<Section>,
}

/// Knobs for section extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionOptions {
    /// Heading depth beyond which subtrees are serialized flat into the
    /// enclosing section body instead of becoming child sections.
    pub max_depth: usize,
}

impl Default for SectionOptions {
    fn default() -> Self {
        SectionOptions { max_depth: 1 }
    }
}

impl Section {
    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Depth-first iterator over this section and all descendants, in
    /// document order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Iterator returned by [`Section::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Section>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<&'a Section> {
        let section = self.stack.pop()?;
        self.stack.extend(section.children.iter().rev());
        Some(section)
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Build the section tree for a parsed markup root.
///
/// Breadth-first: each visited node renders its non-heading children into
/// the section body and spawns a child section per heading child, until the
/// depth limit is hit, after which whole subtrees are rendered flat.
pub fn build_section_tree(root: &MarkupNode, options: &SectionOptions) -> Section {
    let mut arena = vec![PendingSection {
        level: 0,
        body: String::new(),
        children: Vec::new(),
    }];

    let mut queue: VecDeque<(&MarkupNode, usize, usize)> = VecDeque::new();
    queue.push_back((root, 0, 0));

    while let Some((node, section_idx, depth)) = queue.pop_front() {
        let exceeded = depth > options.max_depth;
        let mut body = String::new();
        for child in &node.children {
            match child.heading_level() {
                Some(level) if !exceeded => {
                    let idx = arena.len();
                    arena.push(PendingSection {
                        level,
                        body: String::new(),
                        children: Vec::new(),
                    });
                    arena[section_idx].children.push(idx);
                    queue.push_back((child, idx, depth + 1));
                }
                _ => body.push_str(&child.to_text()),
            }
        }
        arena[section_idx].body = body;
    }

    materialize(&mut arena, 0)
}

struct PendingSection {
    level: u8,
    body: String,
    children: Vec<usize>,
}

fn materialize(arena: &mut [PendingSection], idx: usize) -> Section {
    let level = arena[idx].level;
    let body = std::mem::take(&mut arena[idx].body);
    let child_ids = std::mem::take(&mut arena[idx].children);
    Section {
        level,
        body,
        children: child_ids
            .into_iter()
            .map(|child| materialize(arena, child))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Tag;

    fn el(tag: Tag, children: Vec<MarkupNode>) -> MarkupNode {
        MarkupNode {
            children,
            ..MarkupNode::element(tag)
        }
    }

    fn paragraph(text: &str) -> MarkupNode {
        el(Tag::Paragraph, vec![MarkupNode::text(text)])
    }

    fn sample_tree() -> MarkupNode {
        // h1 owns an intro paragraph and an h2 with its own content.
        let h2 = el(
            Tag::Heading(2),
            vec![MarkupNode::text("Sub"), paragraph("Deep")],
        );
        let h1 = el(
            Tag::Heading(1),
            vec![MarkupNode::text("Title"), paragraph("Intro"), h2],
        );
        el(Tag::Root, vec![h1])
    }

    #[test]
    fn root_is_level_zero() {
        let tree = build_section_tree(&sample_tree(), &SectionOptions::default());
        assert!(tree.is_root());
        assert_eq!(tree.body, "");
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn body_holds_title_and_non_heading_content() {
        let tree = build_section_tree(&sample_tree(), &SectionOptions::default());
        let s1 = &tree.children[0];
        assert_eq!(s1.level, 1);
        assert_eq!(s1.body, "Title\n\nIntro");
    }

    #[test]
    fn depth_limit_flattens_subtrees() {
        // Default max_depth = 1: the h2 still becomes a section, but its
        // subtree is rendered flat instead of descending further.
        let tree = build_section_tree(&sample_tree(), &SectionOptions::default());
        let s2 = &tree.children[0].children[0];
        assert_eq!(s2.level, 2);
        assert_eq!(s2.body, "Sub\n\nDeep");
        assert!(s2.children.is_empty());
    }

    #[test]
    fn deeper_headings_flatten_into_body_past_limit() {
        let h3 = el(Tag::Heading(3), vec![MarkupNode::text("Fine print")]);
        let h2 = el(Tag::Heading(2), vec![MarkupNode::text("Sub"), h3]);
        let h1 = el(Tag::Heading(1), vec![MarkupNode::text("Title"), h2]);
        let root = el(Tag::Root, vec![h1]);

        let tree = build_section_tree(&root, &SectionOptions::default());
        let s2 = &tree.children[0].children[0];
        assert_eq!(s2.body, "Sub\n\n\n\nFine print");
        assert!(s2.children.is_empty());

        let deeper = build_section_tree(&root, &SectionOptions { max_depth: 2 });
        let s2 = &deeper.children[0].children[0];
        assert_eq!(s2.body, "Sub");
        assert_eq!(s2.children.len(), 1);
        assert_eq!(s2.children[0].level, 3);
    }

    #[test]
    fn sibling_sections_keep_document_order() {
        let first = el(Tag::Heading(2), vec![MarkupNode::text("First")]);
        let second = el(Tag::Heading(2), vec![MarkupNode::text("Second")]);
        let h1 = el(Tag::Heading(1), vec![MarkupNode::text("Top"), first, second]);
        let root = el(Tag::Root, vec![h1]);

        let tree = build_section_tree(&root, &SectionOptions { max_depth: 3 });
        let children = &tree.children[0].children;
        assert_eq!(children[0].body, "First");
        assert_eq!(children[1].body, "Second");
    }

    #[test]
    fn child_levels_strictly_greater_than_parent() {
        let tree = build_section_tree(&sample_tree(), &SectionOptions { max_depth: 4 });
        for section in tree.walk() {
            for child in &section.children {
                assert!(child.level > section.level);
            }
        }
    }

    #[test]
    fn walk_yields_document_order() {
        let tree = build_section_tree(&sample_tree(), &SectionOptions { max_depth: 4 });
        let levels: Vec<u8> = tree.walk().map(|s| s.level).collect();
        assert_eq!(levels, vec![0, 1, 2]);
    }
}

//! Node tree builder.
//!
//! Assembles a markup-node tree from the tag-event stream: gates on the
//! anchor heading, discards unwanted subtrees, stops at the footer,
//! synthesizes placeholder paragraphs for stray text, and resolves link
//! targets against the document base URL.
//!
//! Nodes live in an index arena while the parse is in flight (open nodes
//! and the active-heading stack both reference the arena); `finish`
//! materializes the owned tree.

use url::Url;

use super::events::TagEvent;
use crate::model::{MarkupNode, Tag};

const FOOTER: &str = "footer";

/// Event-driven builder for one document parse.
pub struct TreeBuilder {
    nodes: Vec<BuildNode>,
    /// Currently-open nodes, innermost last.
    open: Vec<usize>,
    /// Closed top-level headings (id, level) that can still adopt content.
    headings: Vec<(usize, u8)>,
    /// Heading level whose first occurrence starts the parse.
    gate: u8,
    started: bool,
    stopped: bool,
    /// Unwanted tag whose raw contents are currently being discarded.
    skipping: Option<&'static str>,
    base: Option<Url>,
}

struct BuildNode {
    tag: Option<Tag>,
    text: Option<String>,
    url: Option<String>,
    placeholder: bool,
    children: Vec<usize>,
}

impl BuildNode {
    fn element(tag: Tag) -> Self {
        BuildNode {
            tag: Some(tag),
            text: None,
            url: None,
            placeholder: false,
            children: Vec::new(),
        }
    }

    fn text(text: String) -> Self {
        BuildNode {
            tag: None,
            text: Some(text),
            url: None,
            placeholder: false,
            children: Vec::new(),
        }
    }

    fn placeholder() -> Self {
        BuildNode {
            placeholder: true,
            ..BuildNode::element(Tag::Paragraph)
        }
    }

    fn heading_level(&self) -> Option<u8> {
        self.tag.and_then(Tag::heading_level)
    }
}

impl TreeBuilder {
    /// A builder that starts parsing at the first `h{gate}` and resolves
    /// URLs against `base_url`.
    pub fn new(gate: u8, base_url: &str) -> Self {
        let base = match Url::parse(base_url) {
            Ok(url) => Some(url),
            Err(err) => {
                log::debug!("base url {base_url:?} is not absolute: {err}");
                None
            }
        };
        TreeBuilder {
            nodes: vec![BuildNode::element(Tag::Root)],
            open: Vec::new(),
            headings: Vec::new(),
            gate,
            started: false,
            stopped: false,
            skipping: None,
            base,
        }
    }

    pub fn feed(&mut self, event: TagEvent) {
        match event {
            TagEvent::Open { name, attrs } => self.open_tag(&name, &attrs),
            TagEvent::Text(text) => self.text(text),
            TagEvent::Close { name } => self.close_tag(&name),
        }
    }

    /// Materialize the owned tree. Nodes still open (never closed by the
    /// document) are dropped rather than attached.
    pub fn finish(mut self) -> MarkupNode {
        self.materialize(0)
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) {
        if self.stopped {
            return;
        }
        if !self.started {
            if Tag::parse(name) != Some(Tag::Heading(self.gate)) {
                return;
            }
            self.started = true;
        }
        if name == FOOTER || has_footer_class(attrs) {
            self.stopped = true;
            return;
        }
        match name {
            "script" => {
                self.skipping = Some("script");
                return;
            }
            "style" => {
                self.skipping = Some("style");
                return;
            }
            // Void tag: nothing to discard beyond the tag itself.
            "hr" => return,
            _ => {}
        }
        // Unrecognized tags are transparent: children land in the nearest
        // recognized ancestor.
        let Some(tag) = Tag::parse(name) else { return };

        let mut node = BuildNode::element(tag);
        match tag {
            Tag::Link => node.url = attr_value(attrs, "href").map(|v| self.resolve_url(v)),
            Tag::Image => node.url = attr_value(attrs, "src").map(|v| self.resolve_url(v)),
            _ => {}
        }
        let id = self.push_node(node);
        self.open.push(id);
        if tag == Tag::Image {
            self.close_innermost();
        }
    }

    fn text(&mut self, text: String) {
        if self.stopped || !self.started || self.skipping.is_some() {
            return;
        }
        if self.open.is_empty() {
            if text.trim().is_empty() {
                return;
            }
            let id = self.push_node(BuildNode::placeholder());
            self.open.push(id);
        }
        let Some(&top) = self.open.last() else { return };
        if let Some(&last_child) = self.nodes[top].children.last()
            && self.nodes[last_child].tag.is_none()
        {
            if let Some(leaf) = self.nodes[last_child].text.as_mut() {
                leaf.push_str(&text);
            }
            return;
        }
        let leaf = self.push_node(BuildNode::text(text));
        self.nodes[top].children.push(leaf);
    }

    fn close_tag(&mut self, name: &str) {
        if self.stopped {
            return;
        }
        // Unwanted end tags only ever terminate a raw-content skip; they
        // never close a node (not even a placeholder).
        if matches!(name, "script" | "style" | "hr") {
            if self.skipping.is_some_and(|s| s == name) {
                self.skipping = None;
            }
            return;
        }
        if !self.started {
            return;
        }
        let Some(&top) = self.open.last() else { return };
        let node = &self.nodes[top];
        if !node.placeholder && Tag::parse(name) != node.tag {
            log::trace!("ignoring unmatched end tag {name:?}");
            return;
        }
        self.close_innermost();
    }

    // ========================================================================
    // Tree assembly
    // ========================================================================

    fn push_node(&mut self, node: BuildNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn close_innermost(&mut self) {
        let Some(id) = self.open.pop() else { return };
        if let Some(&parent) = self.open.last() {
            self.nodes[parent].children.push(id);
        } else {
            self.attach_top_level(id);
        }
    }

    /// Attach a closed top-level node under the active heading that should
    /// adopt it: headings pop the stack down to a strictly lower level,
    /// everything else attaches to the stack top, and an empty stack means
    /// the root.
    fn attach_top_level(&mut self, id: usize) {
        let level = self.nodes[id].heading_level();
        let parent = loop {
            match (self.headings.last(), level) {
                (None, _) => break 0,
                (Some(&(top, _)), None) => break top,
                (Some(&(top, top_level)), Some(level)) => {
                    if top_level < level {
                        break top;
                    }
                    self.headings.pop();
                }
            }
        };
        self.nodes[parent].children.push(id);
        if let Some(level) = level {
            self.headings.push((id, level));
        }
    }

    fn resolve_url(&self, raw: &str) -> String {
        match &self.base {
            Some(base) => match base.join(raw) {
                Ok(url) => url.to_string(),
                Err(err) => {
                    log::debug!("keeping unresolvable url {raw:?}: {err}");
                    raw.to_string()
                }
            },
            None => raw.to_string(),
        }
    }

    fn materialize(&mut self, id: usize) -> MarkupNode {
        let child_ids = std::mem::take(&mut self.nodes[id].children);
        let children = child_ids
            .into_iter()
            .map(|child| self.materialize(child))
            .collect();
        let node = &mut self.nodes[id];
        MarkupNode {
            tag: node.tag,
            text: node.text.take(),
            url: node.url.take(),
            placeholder: node.placeholder,
            children,
        }
    }
}

fn attr_value<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(attr, _)| attr == name)
        .map(|(_, value)| value.as_str())
}

fn has_footer_class(attrs: &[(String, String)]) -> bool {
    attrs.iter().any(|(name, value)| {
        name == "class" && value.split_whitespace().any(|token| token == FOOTER)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://docs.example.com/guide/intro";

    fn open(name: &str) -> TagEvent {
        TagEvent::Open {
            name: name.to_string(),
            attrs: vec![],
        }
    }

    fn open_with(name: &str, attrs: &[(&str, &str)]) -> TagEvent {
        TagEvent::Open {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn text(value: &str) -> TagEvent {
        TagEvent::Text(value.to_string())
    }

    fn close(name: &str) -> TagEvent {
        TagEvent::Close {
            name: name.to_string(),
        }
    }

    fn build(gate: u8, events: Vec<TagEvent>) -> MarkupNode {
        let mut builder = TreeBuilder::new(gate, BASE);
        for event in events {
            builder.feed(event);
        }
        builder.finish()
    }

    fn heading(title: &str) -> Vec<TagEvent> {
        vec![open("h1"), text(title), close("h1")]
    }

    #[test]
    fn ignores_everything_before_gate_heading() {
        let mut events = vec![open("p"), text("preamble"), close("p")];
        events.extend(heading("Title"));
        let root = build(1, events);

        assert_eq!(root.children.len(), 1);
        let h1 = &root.children[0];
        assert_eq!(h1.tag, Some(Tag::Heading(1)));
        assert_eq!(h1.children[0].text.as_deref(), Some("Title"));
    }

    #[test]
    fn content_nests_under_active_heading() {
        let mut events = heading("Title");
        events.extend([open("p"), text("Body"), close("p")]);
        let root = build(1, events);

        let h1 = &root.children[0];
        assert_eq!(h1.children.len(), 2);
        assert_eq!(h1.children[1].tag, Some(Tag::Paragraph));
    }

    #[test]
    fn sibling_headings_attach_to_root() {
        let mut events = heading("One");
        events.extend([open("h2"), text("Sub"), close("h2")]);
        events.extend(heading("Two"));
        let root = build(1, events);

        assert_eq!(root.children.len(), 2);
        let first = &root.children[0];
        assert_eq!(first.children.len(), 2); // title text + h2
        assert_eq!(first.children[1].tag, Some(Tag::Heading(2)));
        assert_eq!(root.children[1].children[0].text.as_deref(), Some("Two"));
    }

    #[test]
    fn deeper_heading_nests_shallower_pops() {
        let mut events = heading("Top");
        events.extend([open("h3"), text("Deep"), close("h3")]);
        events.extend([open("h2"), text("Mid"), close("h2")]);
        let root = build(1, events);

        let h1 = &root.children[0];
        // h3 nests under h1; the later h2 pops the h3 and also nests
        // under h1.
        assert_eq!(h1.children[1].tag, Some(Tag::Heading(3)));
        assert_eq!(h1.children[2].tag, Some(Tag::Heading(2)));
    }

    #[test]
    fn stray_text_gets_placeholder_paragraph() {
        let mut events = heading("Title");
        events.push(text("stray words"));
        events.push(close("div"));
        let root = build(1, events);

        let h1 = &root.children[0];
        let stray = &h1.children[1];
        assert!(stray.placeholder);
        assert_eq!(stray.tag, Some(Tag::Paragraph));
        assert_eq!(stray.children[0].text.as_deref(), Some("stray words"));
    }

    #[test]
    fn whitespace_only_stray_text_dropped() {
        let mut events = heading("Title");
        events.push(text("\n   \n"));
        let root = build(1, events);
        assert_eq!(root.children[0].children.len(), 1);
    }

    #[test]
    fn consecutive_text_events_merge() {
        let events = vec![open("h1"), text("Hello "), text("world"), close("h1")];
        let root = build(1, events);
        let h1 = &root.children[0];
        assert_eq!(h1.children.len(), 1);
        assert_eq!(h1.children[0].text.as_deref(), Some("Hello world"));
    }

    #[test]
    fn mismatched_end_tags_ignored() {
        let events = vec![
            open("h1"),
            text("Title"),
            close("h2"),
            close("div"),
            close("h1"),
        ];
        let root = build(1, events);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].tag, Some(Tag::Heading(1)));
    }

    #[test]
    fn transparent_tags_pass_children_through() {
        let mut events = heading("Title");
        events.extend([
            open("div"),
            open("p"),
            text("inside"),
            close("p"),
            close("div"),
        ]);
        let root = build(1, events);

        let h1 = &root.children[0];
        assert_eq!(h1.children[1].tag, Some(Tag::Paragraph));
    }

    #[test]
    fn script_and_style_subtrees_discarded() {
        let mut events = heading("Title");
        events.extend([
            open("script"),
            text("var x = 1;"),
            close("script"),
            open("p"),
            text("after"),
            close("p"),
        ]);
        let root = build(1, events);

        let h1 = &root.children[0];
        assert_eq!(h1.children.len(), 2);
        assert_eq!(h1.children[1].children[0].text.as_deref(), Some("after"));
    }

    #[test]
    fn hr_produces_no_node_and_no_poison() {
        let mut events = heading("Title");
        events.extend([open("hr"), open("p"), text("still here"), close("p")]);
        let root = build(1, events);
        assert_eq!(root.children[0].children.len(), 2);
    }

    #[test]
    fn footer_tag_stops_parsing() {
        let mut events = heading("Title");
        events.extend([open("footer"), open("p"), text("gone"), close("p")]);
        let root = build(1, events);
        assert_eq!(root.children[0].children.len(), 1);
    }

    #[test]
    fn footer_class_stops_parsing() {
        let mut events = heading("Title");
        events.extend([
            open_with("div", &[("class", "site-info footer")]),
            open("p"),
            text("gone"),
            close("p"),
        ]);
        let root = build(1, events);
        assert_eq!(root.children[0].children.len(), 1);
    }

    #[test]
    fn footer_before_gate_does_not_stop() {
        let mut events = vec![open("footer"), close("footer")];
        events.extend(heading("Title"));
        let root = build(1, events);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn relative_urls_resolve_against_base() {
        let mut events = heading("Title");
        events.extend([
            open("p"),
            open_with("a", &[("href", "../api/reference")]),
            text("link"),
            close("a"),
            close("p"),
        ]);
        let root = build(1, events);

        let link = &root.children[0].children[1].children[0];
        assert_eq!(link.tag, Some(Tag::Link));
        assert_eq!(
            link.url.as_deref(),
            Some("https://docs.example.com/api/reference")
        );
    }

    #[test]
    fn absolute_urls_kept_verbatim() {
        let mut events = heading("Title");
        events.extend([
            open_with("img", &[("src", "https://cdn.example.com/x.png")]),
            close("img"),
        ]);
        let root = build(1, events);

        let img = &root.children[0].children[1];
        assert_eq!(img.tag, Some(Tag::Image));
        assert_eq!(img.url.as_deref(), Some("https://cdn.example.com/x.png"));
    }

    #[test]
    fn img_self_closes_immediately() {
        let mut events = heading("Title");
        events.extend([
            open("p"),
            open_with("img", &[("src", "i.png")]),
            text("caption"),
            close("p"),
        ]);
        let root = build(1, events);

        let p = &root.children[0].children[1];
        assert_eq!(p.children[0].tag, Some(Tag::Image));
        assert_eq!(p.children[1].text.as_deref(), Some("caption"));
    }

    #[test]
    fn unclosed_nodes_dropped_at_eof() {
        let mut events = heading("Title");
        events.extend([open("p"), text("dangling")]);
        let root = build(1, events);
        assert_eq!(root.children[0].children.len(), 1);
    }

    #[test]
    fn gate_level_three_starts_at_h3() {
        let events = vec![
            open("h1"),
            text("ignored when gate is 3"),
            close("h1"),
            open("h3"),
            text("anchor"),
            close("h3"),
        ];
        let root = build(3, events);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].tag, Some(Tag::Heading(3)));
    }
}

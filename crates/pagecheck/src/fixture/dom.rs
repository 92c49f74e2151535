//! In-memory DOM used by the static driver.

use std::collections::BTreeMap;

/// Tags rendered on their own line in visible text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// A DOM element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<Node>,
    hidden: bool,
    selected: bool,
    reveals: Option<String>,
}

impl Node {
    /// Create an element with a tag name
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the `class` attribute
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Set the element's own text, rendered before its children
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child element
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Hide the element (`display: none`)
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark the element selected (checked)
    #[must_use]
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Clicking this element shows the element with the given id
    #[must_use]
    pub fn reveals(mut self, id: impl Into<String>) -> Self {
        self.reveals = Some(id.into());
        self
    }

    /// Tag name, lowercase
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    /// Raw attribute value
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whitespace-separated class tokens
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class").unwrap_or_default().split_whitespace()
    }

    /// Whether the element carries a class token
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Child elements
    #[must_use]
    pub fn child_nodes(&self) -> &[Self] {
        &self.children
    }

    /// Whether the element itself is hidden
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the element is selected
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Id of the element a click reveals
    #[must_use]
    pub fn reveal_target(&self) -> Option<&str> {
        self.reveals.as_deref()
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn toggle_selected(&mut self) {
        self.selected = !self.selected;
    }

    fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.tag.as_str())
    }

    fn is_checkable(&self) -> bool {
        self.tag == "input"
            && matches!(self.get_attr("type"), Some("checkbox" | "radio"))
    }

    /// Rendered text: own text, then children; block children start on a
    /// new line. Hidden children are skipped unless `include_hidden`.
    #[must_use]
    pub fn render_text(&self, include_hidden: bool) -> String {
        let mut out = String::new();
        self.render_into(&mut out, include_hidden);
        normalize_lines(&out)
    }

    fn render_into(&self, out: &mut String, include_hidden: bool) {
        out.push_str(&self.text);
        for child in &self.children {
            if child.hidden && !include_hidden {
                continue;
            }
            if child.tag == "br" {
                out.push('\n');
            } else if child.is_block() {
                out.push('\n');
                child.render_into(out, include_hidden);
                out.push('\n');
            } else {
                child.render_into(out, include_hidden);
            }
        }
    }

    /// Concatenated text of the subtree, hidden content included
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }
}

/// Trim every line, drop empty ones
fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Index path from the root element to a node
pub type NodeId = Vec<usize>;

/// A page: a title plus a root `html` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    root: Node,
}

impl Document {
    /// Create a document from a title and a root element
    #[must_use]
    pub fn new(title: impl Into<String>, root: Node) -> Self {
        Self {
            title: title.into(),
            root,
        }
    }

    /// Create a document whose `body` holds the given elements
    #[must_use]
    pub fn with_body(title: impl Into<String>, body: impl IntoIterator<Item = Node>) -> Self {
        Self::new(
            title,
            Node::new("html").child(Node::new("body").children(body)),
        )
    }

    /// Document title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Root element
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Node at an index path
    #[must_use]
    pub fn get(&self, id: &[usize]) -> Option<&Node> {
        id.iter()
            .try_fold(&self.root, |node, &i| node.children.get(i))
    }

    fn get_mut(&mut self, id: &[usize]) -> Option<&mut Node> {
        id.iter()
            .try_fold(&mut self.root, |node, &i| node.children.get_mut(i))
    }

    /// Nodes from the root down to (excluding) the node at `id`
    #[must_use]
    pub fn ancestors(&self, id: &[usize]) -> Vec<&Node> {
        (0..id.len()).filter_map(|depth| self.get(&id[..depth])).collect()
    }

    /// Whether the node and all its ancestors are shown
    #[must_use]
    pub fn is_displayed(&self, id: &[usize]) -> bool {
        match self.get(id) {
            Some(node) => !node.hidden && self.ancestors(id).iter().all(|a| !a.hidden),
            None => false,
        }
    }

    /// Every node under `scope` in document order. The whole document,
    /// root included, when `scope` is `None`; descendants only otherwise.
    #[must_use]
    pub fn descendants(&self, scope: Option<&[usize]>) -> Vec<NodeId> {
        let mut out = Vec::new();
        match scope {
            None => collect(&self.root, Vec::new(), &mut out),
            Some(id) => {
                if let Some(node) = self.get(id) {
                    for (i, child) in node.children.iter().enumerate() {
                        let mut child_id = id.to_vec();
                        child_id.push(i);
                        collect(child, child_id, &mut out);
                    }
                }
            }
        }
        out
    }

    /// First node, in document order, with the given `id` attribute
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(None)
            .into_iter()
            .find(|n| self.get(n).and_then(|node| node.get_attr("id")) == Some(id))
    }

    /// Apply a click: reveal the target element and toggle checkables
    pub(crate) fn click(&mut self, id: &[usize]) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.is_checkable() {
            node.toggle_selected();
        }
        let target = node.reveals.clone();
        if let Some(target_id) = target.and_then(|t| self.find_by_id(&t)) {
            if let Some(revealed) = self.get_mut(&target_id) {
                revealed.set_hidden(false);
            }
        }
    }
}

fn collect(node: &Node, id: NodeId, out: &mut Vec<NodeId>) {
    out.push(id.clone());
    for (i, child) in node.children.iter().enumerate() {
        let mut child_id = id.clone();
        child_id.push(i);
        collect(child, child_id, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::with_body(
            "Sample",
            [
                Node::new("h1").text("Title"),
                Node::new("div")
                    .class("menu open")
                    .child(Node::new("li").text("One"))
                    .child(Node::new("li").text("Two").hidden()),
                Node::new("label").id("toggle").reveals("panel"),
                Node::new("div").id("panel").hidden().text("Panel"),
            ],
        )
    }

    #[test]
    fn test_descendants_document_order() {
        let doc = sample();
        let tags: Vec<_> = doc
            .descendants(None)
            .iter()
            .map(|id| doc.get(id).unwrap().tag_name().to_string())
            .collect();
        assert_eq!(
            tags,
            ["html", "body", "h1", "div", "li", "li", "label", "div"]
        );
    }

    #[test]
    fn test_scoped_descendants_exclude_scope() {
        let doc = sample();
        let menu = vec![0, 1];
        let ids = doc.descendants(Some(&menu));
        assert_eq!(ids, vec![vec![0, 1, 0], vec![0, 1, 1]]);
    }

    #[test]
    fn test_render_skips_hidden() {
        let doc = sample();
        let menu = doc.get(&[0, 1]).unwrap();
        assert_eq!(menu.render_text(false), "One");
        assert_eq!(menu.render_text(true), "One\nTwo");
    }

    #[test]
    fn test_render_line_breaks() {
        let h2 = Node::new("h2")
            .text("We need")
            .child(Node::new("br"))
            .child(Node::new("span").text("more aapi"))
            .child(Node::new("br"))
            .child(Node::new("span").text("voters"));
        assert_eq!(h2.render_text(false), "We need\nmore aapi\nvoters");
    }

    #[test]
    fn test_inline_children_join() {
        let p = Node::new("p")
            .text("150% spike ")
            .child(Node::new("span").text("in anti-AAPI"));
        assert_eq!(p.render_text(false), "150% spike in anti-AAPI");
        assert_eq!(p.text_content(), "150% spike in anti-AAPI");
    }

    #[test]
    fn test_displayed_checks_ancestors() {
        let doc = sample();
        assert!(doc.is_displayed(&[0, 1, 0]));
        assert!(!doc.is_displayed(&[0, 1, 1]));
        assert!(!doc.is_displayed(&[0, 3]));
        assert!(!doc.is_displayed(&[9]));
    }

    #[test]
    fn test_click_reveals_target() {
        let mut doc = sample();
        doc.click(&[0, 2]);
        assert!(doc.is_displayed(&[0, 3]));
    }

    #[test]
    fn test_click_toggles_checkbox() {
        let mut doc = Document::with_body(
            "x",
            [Node::new("input").attr("type", "checkbox").class("hidden")],
        );
        assert!(!doc.get(&[0, 0]).unwrap().is_selected());
        doc.click(&[0, 0]);
        assert!(doc.get(&[0, 0]).unwrap().is_selected());
    }

    #[test]
    fn test_classes() {
        let node = Node::new("p").class("b2  color_white");
        assert!(node.has_class("b2"));
        assert!(node.has_class("color_white"));
        assert!(!node.has_class("b"));
    }
}

//! Locator matching against the in-memory DOM.
//!
//! Supports the subset of CSS and XPath the homepage suite uses: compound CSS
//! selectors (`tag`, `*`, `.class`, `#id`, `[attr]`, `[attr=value]`) joined by
//! descendant combinators, and XPath of the form `//tag`, `//tag[@attr='v']`
//! or `.//tag[...]`.

use super::dom::{Document, Node, NodeId};
use crate::locator::{Locator, Strategy};
use crate::result::{PagecheckError, PagecheckResult};
use regex::Regex;
use std::sync::LazyLock;

static CSS_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r#"^(?:\.([\w-]+)|#([\w-]+)|\[\s*([\w-]+)\s*(?:=\s*(?:"([^"]*)"|'([^']*)'|([^\]\s]+))\s*)?\])"#,
    )
    .expect("CSS token pattern is invalid")
});

static CSS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(\*|[A-Za-z][\w-]*)").expect("CSS tag pattern is invalid")
});

static XPATH_STEP: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r#"^\s*(\.)?//(\*|[A-Za-z][\w-]*)(?:\[\s*@([\w-]+)\s*=\s*(?:'([^']*)'|"([^"]*)")\s*\])?\s*$"#,
    )
    .expect("XPath step pattern is invalid")
});

/// Every match of `locator` under `scope`, in document order
pub(crate) fn find_all(
    doc: &Document,
    scope: Option<&[usize]>,
    locator: &Locator,
) -> PagecheckResult<Vec<NodeId>> {
    let value = locator.value();
    let matches = match locator.strategy() {
        Strategy::TagName => filter(doc, doc.descendants(scope), |node, _| {
            node.tag_name().eq_ignore_ascii_case(value)
        }),
        Strategy::ClassName => {
            let wanted: Vec<&str> = value.split_whitespace().collect();
            filter(doc, doc.descendants(scope), |node, _| {
                !wanted.is_empty() && wanted.iter().all(|c| node.has_class(c))
            })
        }
        Strategy::PartialLinkText => filter(doc, doc.descendants(scope), |node, id| {
            node.tag_name() == "a"
                && doc.is_displayed(id)
                && node.render_text(false).contains(value)
        }),
        Strategy::Css => {
            let selector = CssSelector::parse(value)?;
            filter(doc, doc.descendants(scope), |_, id| selector.matches(doc, id))
        }
        Strategy::XPath => {
            let xpath = XPath::parse(value)?;
            // `//` searches the whole document even under a scope
            let candidates = if xpath.relative {
                doc.descendants(scope)
            } else {
                doc.descendants(None)
            };
            filter(doc, candidates, |node, _| xpath.step.matches(node))
        }
    };
    Ok(matches)
}

fn filter(
    doc: &Document,
    candidates: Vec<NodeId>,
    pred: impl Fn(&Node, &[usize]) -> bool,
) -> Vec<NodeId> {
    candidates
        .into_iter()
        .filter(|id| doc.get(id).is_some_and(|node| pred(node, id)))
        .collect()
}

/// Attribute condition inside a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    value: Option<String>,
}

/// One compound selector: `tag.class#id[attr=v]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        self.tag
            .as_deref()
            .is_none_or(|tag| node.tag_name().eq_ignore_ascii_case(tag))
            && self.classes.iter().all(|c| node.has_class(c))
            && self.attrs.iter().all(|attr| match &attr.value {
                Some(value) => node.get_attr(&attr.name) == Some(value.as_str()),
                None => node.get_attr(&attr.name).is_some(),
            })
    }
}

/// Compound selectors joined by descendant combinators
#[derive(Debug, Clone, PartialEq, Eq)]
struct CssSelector {
    parts: Vec<Compound>,
}

impl CssSelector {
    fn parse(selector: &str) -> PagecheckResult<Self> {
        let token = &*CSS_TOKEN;
        let tag = &*CSS_TAG;

        let reject = || unsupported("CSS selector", selector);
        let mut parts = Vec::new();
        for raw in split_compounds(selector) {
            let mut compound = Compound::default();
            let mut rest = raw;
            if let Some(m) = tag.find(rest) {
                if m.as_str() != "*" {
                    compound.tag = Some(m.as_str().to_string());
                }
                rest = &rest[m.end()..];
            }
            while !rest.is_empty() {
                let caps = token.captures(rest).ok_or_else(reject)?;
                if let Some(class) = caps.get(1) {
                    compound.classes.push(class.as_str().to_string());
                } else if let Some(id) = caps.get(2) {
                    compound.attrs.push(AttrTest {
                        name: "id".to_string(),
                        value: Some(id.as_str().to_string()),
                    });
                } else if let Some(name) = caps.get(3) {
                    let value = caps
                        .get(4)
                        .or_else(|| caps.get(5))
                        .or_else(|| caps.get(6))
                        .map(|v| v.as_str().to_string());
                    compound.attrs.push(AttrTest {
                        name: name.as_str().to_string(),
                        value,
                    });
                }
                rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
            }
            parts.push(compound);
        }
        if parts.is_empty() {
            return Err(reject());
        }
        Ok(Self { parts })
    }

    /// The last compound matches the node; the others match ancestors,
    /// innermost first
    fn matches(&self, doc: &Document, id: &[usize]) -> bool {
        let Some((last, outer)) = self.parts.split_last() else {
            return false;
        };
        if !doc.get(id).is_some_and(|node| last.matches(node)) {
            return false;
        }
        let mut ancestors = doc.ancestors(id).into_iter().rev();
        outer
            .iter()
            .rev()
            .all(|compound| ancestors.any(|node| compound.matches(node)))
    }
}

/// Split on whitespace outside attribute brackets
fn split_compounds(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in selector.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&selector[s..i]);
                }
                continue;
            }
            _ => {}
        }
        start.get_or_insert(i);
    }
    if let Some(s) = start {
        parts.push(&selector[s..]);
    }
    parts
}

/// A single XPath location step
#[derive(Debug, Clone, PartialEq, Eq)]
struct XPath {
    relative: bool,
    step: Compound,
}

impl XPath {
    fn parse(expr: &str) -> PagecheckResult<Self> {
        let caps = XPATH_STEP
            .captures(expr)
            .ok_or_else(|| unsupported("XPath expression", expr))?;

        let mut step = Compound::default();
        if let Some(tag) = caps.get(2).filter(|t| t.as_str() != "*") {
            step.tag = Some(tag.as_str().to_string());
        }
        if let Some(name) = caps.get(3) {
            let value = caps.get(4).or_else(|| caps.get(5)).map(|v| v.as_str());
            step.attrs.push(AttrTest {
                name: name.as_str().to_string(),
                value: value.map(str::to_string),
            });
        }
        Ok(Self {
            relative: caps.get(1).is_some(),
            step,
        })
    }
}

fn unsupported(kind: &str, value: &str) -> PagecheckError {
    PagecheckError::script(format!("unsupported {kind} for the static driver: {value}"))
}

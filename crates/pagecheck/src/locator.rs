//! Locators, queries and resolved element paths.
//!
//! A [`Locator`] is a `(strategy, value)` pair. A [`Query`] adds which of the
//! matches is wanted and an optional parent scope. Resolving a query against a
//! driver yields one or more [`ElementPath`]s: the chain of `(locator, index)`
//! steps leading from the document to a single element. Paths are re-resolved
//! on every access, so element reads are always live.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy used to find elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Tag name (e.g. `h1`)
    TagName,
    /// CSS selector (e.g. `.btn_gradient.btn_wide`)
    Css,
    /// XPath expression (e.g. `//img[@alt='mic']`)
    XPath,
    /// Anchor whose visible text contains the value
    PartialLinkText,
    /// Class name; every space-separated class must be present
    ClassName,
}

impl Strategy {
    /// Human-readable strategy name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TagName => "tag name",
            Self::Css => "css selector",
            Self::XPath => "xpath",
            Self::PartialLinkText => "partial link text",
            Self::ClassName => "class name",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `(strategy, value)` pair identifying zero or more DOM nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator from a strategy and value
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Locate by tag name
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, name)
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Locate by XPath
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expr)
    }

    /// Locate anchors by partial link text
    #[must_use]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::PartialLinkText, text)
    }

    /// Locate by class name
    #[must_use]
    pub fn class_name(name: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, name)
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the raw value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// JavaScript expression evaluating to an array of every match under the
    /// node bound to `root`, in document order
    #[must_use]
    pub fn to_js_collect(&self, root: &str) -> String {
        let v = js_string(&self.value);
        match self.strategy {
            Strategy::TagName => format!("Array.from({root}.getElementsByTagName({v}))"),
            Strategy::ClassName => format!("Array.from({root}.getElementsByClassName({v}))"),
            Strategy::Css => format!("Array.from({root}.querySelectorAll({v}))"),
            Strategy::XPath => format!(
                "(() => {{ const r = document.evaluate({v}, {root}, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})()"
            ),
            Strategy::PartialLinkText => format!(
                "Array.from({root}.querySelectorAll('a')).filter(a => (a.innerText || '').includes({v}))"
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy, self.value)
    }
}

/// Encode a Rust string as a JavaScript string literal
fn js_string(s: &str) -> String {
    // JSON string literals are valid JavaScript string literals
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

/// Which of a locator's matches a query selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pick {
    /// The first match; zero matches is not-found
    First,
    /// The match at a zero-based document-order index
    Nth(usize),
    /// Every match, treated as an ordered list
    All,
    /// Every match present when looked up, checked one by one; zero
    /// matches is allowed and nothing is waited for
    Each,
}

/// A locator plus a pick and an optional single-element parent scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    parent: Option<Box<Query>>,
    locator: Locator,
    pick: Pick,
}

impl Query {
    /// Select the first match
    #[must_use]
    pub const fn first(locator: Locator) -> Self {
        Self {
            parent: None,
            locator,
            pick: Pick::First,
        }
    }

    /// Select the match at a zero-based index
    #[must_use]
    pub const fn nth(locator: Locator, index: usize) -> Self {
        Self {
            parent: None,
            locator,
            pick: Pick::Nth(index),
        }
    }

    /// Select all matches as an ordered list
    #[must_use]
    pub const fn all(locator: Locator) -> Self {
        Self {
            parent: None,
            locator,
            pick: Pick::All,
        }
    }

    /// Select every match individually
    #[must_use]
    pub const fn each(locator: Locator) -> Self {
        Self {
            parent: None,
            locator,
            pick: Pick::Each,
        }
    }

    /// Restrict the search to descendants of the element `parent` selects.
    ///
    /// The parent should select a single element (`First` or `Nth`); for
    /// `All` and `Each` its first match is the scope. A parent with no
    /// match makes the whole query not-found.
    #[must_use]
    pub fn within(mut self, parent: Self) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Get the locator
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Get the pick
    #[must_use]
    pub const fn pick(&self) -> Pick {
        self.pick
    }

    /// Get the parent scope
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locator)?;
        if let Pick::Nth(i) = self.pick {
            write!(f, " [{i}]")?;
        }
        if let Some(parent) = &self.parent {
            write!(f, " within {parent}")?;
        }
        Ok(())
    }
}

/// One step of an element path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Locator evaluated under the previous step's element
    pub locator: Locator,
    /// Index into that locator's matches
    pub index: usize,
}

/// Chain of steps from the document to a single element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementPath {
    steps: Vec<PathStep>,
}

impl ElementPath {
    /// A path rooted at the document with a single step
    #[must_use]
    pub fn root(locator: Locator, index: usize) -> Self {
        Self {
            steps: vec![PathStep { locator, index }],
        }
    }

    /// Extend the path with a step under the current element
    #[must_use]
    pub fn child(&self, locator: Locator, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep { locator, index });
        Self { steps }
    }

    /// Path under an optional scope
    #[must_use]
    pub fn under(scope: Option<&Self>, locator: Locator, index: usize) -> Self {
        match scope {
            Some(parent) => parent.child(locator, index),
            None => Self::root(locator, index),
        }
    }

    /// The steps of this path
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// JavaScript walking the steps and binding the result to `root`.
    /// Returns `{found: false}` from the enclosing function when a step misses.
    fn js_walk(&self) -> String {
        let mut js = String::from("let root = document; ");
        for step in &self.steps {
            js.push_str(&format!(
                "root = ({})[{}]; if (!root) {{ return {{ found: false }}; }} ",
                step.locator.to_js_collect("root"),
                step.index
            ));
        }
        js
    }

    /// Script evaluating `expr` (which may use `el`) on the resolved element,
    /// wrapped as `{found, value}`
    #[must_use]
    pub fn script(&self, expr: &str) -> String {
        format!(
            "(() => {{ {}const el = root; return {{ found: true, value: ({expr}) }}; }})()",
            self.js_walk()
        )
    }

    /// Script counting matches of `locator` under an optional scope,
    /// wrapped as `{found, value}`
    #[must_use]
    pub fn count_script(scope: Option<&Self>, locator: &Locator) -> String {
        let walk = scope.map_or_else(|| String::from("let root = document; "), Self::js_walk);
        format!(
            "(() => {{ {walk}return {{ found: true, value: ({}).length }}; }})()",
            locator.to_js_collect("root")
        )
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{} [{}]", step.locator, step.index)?;
        }
        Ok(())
    }
}

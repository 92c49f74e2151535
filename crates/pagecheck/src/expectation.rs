//! Expectations: an expected literal plus a comparison rule, bound to a target.
//!
//! ```
//! use pagecheck::{expect, expect_title, Locator, Query};
//!
//! let title = expect_title().equals("8by8 Challenge");
//! let heading = expect(Query::first(Locator::tag("h1"))).text().equals_ignore_case("get 8");
//! let section = expect(Query::nth(Locator::tag("section"), 1))
//!     .attribute("class")
//!     .equals("styles_section_2__wgjjP");
//! # let _ = (title, heading, section);
//! ```

use crate::assertion::TextRule;
use crate::locator::Query;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an expectation is evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// The document itself
    Page,
    /// Elements selected by a query
    Elements(Query),
}

/// Which value is read from the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probe {
    /// Document title
    Title,
    /// Visible text
    Text,
    /// DOM property
    Property(String),
    /// Attribute (property value when one exists)
    Attribute(String),
    /// Displayed flag
    Displayed,
    /// Selected flag
    Selected,
    /// Number of matches
    Count,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Text => f.write_str("text"),
            Self::Property(name) => write!(f, "property `{name}`"),
            Self::Attribute(name) => write!(f, "attribute `{name}`"),
            Self::Displayed => f.write_str("displayed"),
            Self::Selected => f.write_str("selected"),
            Self::Count => f.write_str("count"),
        }
    }
}

/// How many items an ordered list must have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceLength {
    /// Exactly as many elements as expected items
    Exact,
    /// At least as many; extra trailing elements are ignored
    AtLeast,
}

/// Expected value and comparison rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expected {
    /// String comparison
    Text {
        /// Comparison rule
        rule: TextRule,
        /// Expected literal
        value: String,
    },
    /// Boolean equality
    Flag(bool),
    /// Match count equality
    Count(usize),
    /// Ordered list comparison, item by item in document order
    Sequence {
        /// Rule applied to each item
        rule: TextRule,
        /// Expected items
        items: Vec<String>,
        /// Length rule
        length: SequenceLength,
    },
}

/// An immutable check, evaluated once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    target: Target,
    probe: Probe,
    expected: Expected,
    message: Option<String>,
    missing_message: Option<String>,
}

impl Expectation {
    /// Get the target
    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }

    /// Get the probe
    #[must_use]
    pub const fn probe(&self) -> &Probe {
        &self.probe
    }

    /// Get the expected value
    #[must_use]
    pub const fn expected(&self) -> &Expected {
        &self.expected
    }

    /// Custom mismatch message, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Custom not-found message, if any
    #[must_use]
    pub fn missing_message(&self) -> Option<&str> {
        self.missing_message.as_deref()
    }

    /// Replace the mismatch message.
    ///
    /// `{actual}` in the message is substituted with the actual value.
    #[must_use]
    pub fn or_fail(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Replace the not-found message
    #[must_use]
    pub fn or_missing(mut self, message: impl Into<String>) -> Self {
        self.missing_message = Some(message.into());
        self
    }

    /// Human-readable subject for mismatch errors
    #[must_use]
    pub fn subject(&self) -> String {
        match &self.target {
            Target::Page => self.probe.to_string(),
            Target::Elements(query) => format!("{} of {query}", self.probe),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.subject())?;
        match &self.expected {
            Expected::Text { rule, value } => match rule {
                TextRule::Exact => write!(f, "equals {value:?}"),
                TextRule::IgnoreCase => write!(f, "equals (ignoring case) {value:?}"),
                TextRule::Contains => write!(f, "contains {value:?}"),
            },
            Expected::Flag(flag) => write!(f, "is {flag}"),
            Expected::Count(n) => write!(f, "is {n}"),
            Expected::Sequence { items, length, .. } => match length {
                SequenceLength::Exact => write!(f, "matches {} items in order", items.len()),
                SequenceLength::AtLeast => write!(f, "starts with {} items in order", items.len()),
            },
        }
    }
}

/// Start an expectation on the document title
#[must_use]
pub fn expect_title() -> Probed {
    Probed {
        target: Target::Page,
        probe: Probe::Title,
    }
}

/// Start an expectation on the elements a query selects
#[must_use]
pub fn expect(query: Query) -> ExpectBuilder {
    ExpectBuilder { query }
}

/// Expectation builder awaiting a probe
#[derive(Debug, Clone)]
pub struct ExpectBuilder {
    query: Query,
}

impl ExpectBuilder {
    fn probed(self, probe: Probe) -> Probed {
        Probed {
            target: Target::Elements(self.query),
            probe,
        }
    }

    fn flag(self, probe: Probe, value: bool) -> Expectation {
        self.probed(probe).finish(Expected::Flag(value))
    }

    /// Compare visible text
    #[must_use]
    pub fn text(self) -> Probed {
        self.probed(Probe::Text)
    }

    /// Compare a DOM property
    #[must_use]
    pub fn property(self, name: impl Into<String>) -> Probed {
        self.probed(Probe::Property(name.into()))
    }

    /// Compare an attribute
    #[must_use]
    pub fn attribute(self, name: impl Into<String>) -> Probed {
        self.probed(Probe::Attribute(name.into()))
    }

    /// The element is displayed
    #[must_use]
    pub fn displayed(self) -> Expectation {
        self.flag(Probe::Displayed, true)
    }

    /// The element is not displayed
    #[must_use]
    pub fn hidden(self) -> Expectation {
        self.flag(Probe::Displayed, false)
    }

    /// The element is selected
    #[must_use]
    pub fn selected(self) -> Expectation {
        self.flag(Probe::Selected, true)
    }

    /// The element is not selected
    #[must_use]
    pub fn not_selected(self) -> Expectation {
        self.flag(Probe::Selected, false)
    }

    /// The query matches exactly `n` elements
    #[must_use]
    pub fn count(self, n: usize) -> Expectation {
        self.probed(Probe::Count).finish(Expected::Count(n))
    }
}

/// Expectation builder awaiting a comparison
#[derive(Debug, Clone)]
pub struct Probed {
    target: Target,
    probe: Probe,
}

impl Probed {
    fn finish(self, expected: Expected) -> Expectation {
        Expectation {
            target: self.target,
            probe: self.probe,
            expected,
            message: None,
            missing_message: None,
        }
    }

    fn text_rule(self, rule: TextRule, value: impl Into<String>) -> Expectation {
        self.finish(Expected::Text {
            rule,
            value: value.into(),
        })
    }

    fn sequence<I, S>(self, rule: TextRule, items: I, length: SequenceLength) -> Expectation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finish(Expected::Sequence {
            rule,
            items: items.into_iter().map(Into::into).collect(),
            length,
        })
    }

    /// Exact match
    #[must_use]
    pub fn equals(self, value: impl Into<String>) -> Expectation {
        self.text_rule(TextRule::Exact, value)
    }

    /// Case-insensitive match
    #[must_use]
    pub fn equals_ignore_case(self, value: impl Into<String>) -> Expectation {
        self.text_rule(TextRule::IgnoreCase, value)
    }

    /// Substring containment
    #[must_use]
    pub fn contains(self, value: impl Into<String>) -> Expectation {
        self.text_rule(TextRule::Contains, value)
    }

    /// Every match, in document order, equals the items exactly; the counts
    /// must agree
    #[must_use]
    pub fn sequence_exact<I, S>(self, items: I) -> Expectation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequence(TextRule::Exact, items, SequenceLength::Exact)
    }

    /// Like [`Probed::sequence_exact`], ignoring case
    #[must_use]
    pub fn sequence_ignore_case<I, S>(self, items: I) -> Expectation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequence(TextRule::IgnoreCase, items, SequenceLength::Exact)
    }

    /// The first matches equal the items exactly; extra matches are ignored
    #[must_use]
    pub fn starts_with_sequence<I, S>(self, items: I) -> Expectation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequence(TextRule::Exact, items, SequenceLength::AtLeast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;

    #[test]
    fn test_title_expectation() {
        let e = expect_title().equals("8by8 Challenge");
        assert_eq!(e.target(), &Target::Page);
        assert_eq!(e.probe(), &Probe::Title);
        assert_eq!(e.to_string(), "title equals \"8by8 Challenge\"");
    }

    #[test]
    fn test_attribute_subject_names_query() {
        let e = expect(Query::first(Locator::xpath("//img[@alt='mic']")))
            .attribute("src")
            .equals("http://localhost:3000/x.png");
        assert_eq!(e.subject(), "attribute `src` of xpath `//img[@alt='mic']`");
    }

    #[test]
    fn test_flags() {
        let q = Query::first(Locator::tag("h1"));
        assert_eq!(expect(q.clone()).displayed().expected(), &Expected::Flag(true));
        assert_eq!(expect(q.clone()).hidden().expected(), &Expected::Flag(false));
        assert_eq!(expect(q.clone()).not_selected().probe(), &Probe::Selected);
        assert_eq!(expect(q).selected().expected(), &Expected::Flag(true));
    }

    #[test]
    fn test_sequence_ignore_case() {
        let e = expect(Query::all(Locator::tag("li")))
            .property("innerText")
            .sequence_ignore_case(["", "Take the challenge"]);
        match e.expected() {
            Expected::Sequence {
                rule,
                items,
                length,
            } => {
                assert_eq!(*rule, TextRule::IgnoreCase);
                assert_eq!(items.len(), 2);
                assert_eq!(*length, SequenceLength::Exact);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(e.to_string().contains("matches 2 items in order"));
    }

    #[test]
    fn test_prefix_sequence() {
        let e = expect(Query::all(Locator::tag("h3")))
            .text()
            .starts_with_sequence(vec!["a".to_string()]);
        assert!(e.to_string().contains("starts with 1 items"));
    }

    #[test]
    fn test_custom_messages() {
        let e = expect(Query::first(Locator::class_name("hidden")))
            .not_selected()
            .or_fail("Hamburger Menu Tests have failed!")
            .or_missing("menu toggle missing");
        assert_eq!(e.message(), Some("Hamburger Menu Tests have failed!"));
        assert_eq!(e.missing_message(), Some("menu toggle missing"));
    }

    #[test]
    fn test_count() {
        let e = expect(Query::all(Locator::tag("section"))).count(7);
        assert_eq!(e.expected(), &Expected::Count(7));
        assert_eq!(e.to_string(), "count of tag name `section` is 7");
    }
}

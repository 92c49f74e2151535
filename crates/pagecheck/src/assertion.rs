//! Comparison rules applied to located values.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Result of a single comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the comparison passed
    pub passed: bool,
    /// Expected value as reported on failure
    pub expected: String,
    /// Actual value as reported on failure
    pub actual: String,
}

impl AssertionResult {
    fn new(passed: bool, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            passed,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Failure message naming expected and actual values
    #[must_use]
    pub fn message(&self) -> String {
        format!("Expected {} but got {}", self.expected, self.actual)
    }
}

/// How two strings are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextRule {
    /// Byte-for-byte equality
    Exact,
    /// Equality after lowercasing both sides
    IgnoreCase,
    /// The actual value contains the expected one
    Contains,
}

/// Comparison helpers
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug>(expected: &T, actual: &T) -> AssertionResult {
        AssertionResult::new(
            expected == actual,
            format!("{expected:?}"),
            format!("{actual:?}"),
        )
    }

    /// Assert two strings are equal ignoring case.
    ///
    /// Both sides are lowercased before comparing and reported lowercased.
    #[must_use]
    pub fn equals_ignore_case(expected: &str, actual: &str) -> AssertionResult {
        let expected = expected.to_lowercase();
        let actual = actual.to_lowercase();
        AssertionResult::new(expected == actual, expected, actual)
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
        AssertionResult::new(
            haystack.contains(needle),
            format!("a value containing {needle:?}"),
            format!("{haystack:?}"),
        )
    }

    /// Compare text according to a rule
    #[must_use]
    pub fn text(rule: TextRule, expected: &str, actual: &str) -> AssertionResult {
        match rule {
            TextRule::Exact => Self::equals(&expected, &actual),
            TextRule::IgnoreCase => Self::equals_ignore_case(expected, actual),
            TextRule::Contains => Self::contains(actual, expected),
        }
    }

    /// Assert a collection has the expected length
    #[must_use]
    pub fn has_length<T>(collection: &[T], expected: usize) -> AssertionResult {
        AssertionResult::new(
            collection.len() == expected,
            format!("{expected} items"),
            format!("{} items", collection.len()),
        )
    }

    /// Assert a collection has at least `expected` items
    #[must_use]
    pub fn has_at_least<T>(collection: &[T], expected: usize) -> AssertionResult {
        AssertionResult::new(
            collection.len() >= expected,
            format!("at least {expected} items"),
            format!("{} items", collection.len()),
        )
    }
}

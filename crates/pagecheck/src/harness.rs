//! Test cases and suites.

use crate::expectation::Expectation;
use crate::locator::Query;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One action or check within a test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Evaluate an expectation
    Expect(Expectation),
    /// Click the element a query selects
    Click(Query),
    /// Move the pointer over the element, then click it
    HoverClick(Query),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expect(expectation) => write!(f, "expect {expectation}"),
            Self::Click(query) => write!(f, "click {query}"),
            Self::HoverClick(query) => write!(f, "hover and click {query}"),
        }
    }
}

impl From<Expectation> for Step {
    fn from(expectation: Expectation) -> Self {
        Self::Expect(expectation)
    }
}

/// A single test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Test name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Steps, executed in order
    pub steps: Vec<Step>,
}

impl TestCase {
    /// Create a new test case
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            steps: Vec::new(),
        }
    }

    /// Append an expectation
    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.steps.push(Step::Expect(expectation));
        self
    }

    /// Append a click
    #[must_use]
    pub fn click(mut self, query: Query) -> Self {
        self.steps.push(Step::Click(query));
        self
    }

    /// Append a hover-and-click
    #[must_use]
    pub fn hover_click(mut self, query: Query) -> Self {
        self.steps.push(Step::HoverClick(query));
        self
    }
}

/// A test suite containing multiple tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Tests in this suite
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Add a test case, builder style
    #[must_use]
    pub fn with_test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Keep only the cases whose name contains `pattern`
    #[must_use]
    pub fn filter(mut self, pattern: &str) -> Self {
        self.tests.retain(|test| test.name.contains(pattern));
        self
    }

    /// Look a case up by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.tests.iter().find(|test| test.name == name)
    }
}

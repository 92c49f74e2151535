//! Pagecheck: headless-browser assertions for the 8by8 Challenge homepage
//!
//! A suite is a list of named test cases. Each case loads the target page,
//! then runs steps in order: expectations on the title or on located
//! elements, and clicks. The first failing step ends the case; the suite
//! goes on with the next case unless fail-fast is set.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────────┐    ┌─────────────────┐
//! │ TestSuite    │───►│ PageAssertionRunner  │───►│ PageDriver      │
//! │ (homepage)   │    │ implicit wait, picks │    │ Chromium (CDP)  │
//! └──────────────┘    └──────────┬───────────┘    │ StaticDriver    │
//!                                ▼                └─────────────────┘
//!                     ┌──────────────────────┐
//!                     │ Reporter             │
//!                     │ summary, JUnit, JSON │
//!                     └──────────────────────┘
//! ```
//!
//! ```
//! use pagecheck::fixture::{Document, Node};
//! use pagecheck::{
//!     expect_title, PageAssertionRunner, StaticDriver, SuiteConfig, TestCase, TestSuite,
//!     WaitConfig,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let page = Document::with_body("8by8 Challenge", [Node::new("h1").text("Hello")]);
//! let config = SuiteConfig::default().with_wait(WaitConfig::immediate());
//! let suite = TestSuite::new("smoke")
//!     .with_test(TestCase::new("title", "title").expect(expect_title().equals("8by8 Challenge")));
//!
//! let mut runner = PageAssertionRunner::new(StaticDriver::new(page), config);
//! let report = runner.run_suite(&suite).await;
//! assert!(report.all_passed());
//! # });
//! ```

#![warn(missing_docs)]

mod assertion;
mod browser;
mod config;
mod driver;
mod expectation;
mod harness;
mod locator;
mod reporter;
mod result;
mod runner;
mod wait;

/// In-memory DOM and driver for exercising suites without a browser
pub mod fixture;

/// Built-in suites
pub mod suites;

pub use assertion::{Assertion, AssertionResult, TextRule};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use browser::{BrowserConfig, CHROMIUM_PATH_VAR};
pub use config::{
    SuiteConfig, ACCESS_TOKEN_VAR, BYPASS_PARAM, DEFAULT_BASE_URL, PREVIEW_URL_VAR,
};
pub use driver::PageDriver;
pub use expectation::{
    expect, expect_title, ExpectBuilder, Expectation, Expected, Probe, Probed, SequenceLength,
    Target,
};
pub use fixture::StaticDriver;
pub use harness::{Step, TestCase, TestSuite};
pub use locator::{ElementPath, Locator, PathStep, Pick, Query, Strategy};
pub use reporter::{FailureMode, Reporter, TestResultEntry, TestStatus};
pub use result::{PagecheckError, PagecheckResult};
pub use runner::PageAssertionRunner;
pub use suites::homepage_suite;
pub use wait::{Deadline, WaitConfig, DEFAULT_IMPLICIT_WAIT, DEFAULT_POLL_INTERVAL};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::*;
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::expectation::*;
    pub use super::fixture::StaticDriver;
    pub use super::harness::*;
    pub use super::locator::*;
    pub use super::reporter::*;
    pub use super::result::*;
    pub use super::runner::*;
    pub use super::suites::homepage_suite;
    pub use super::wait::*;
}

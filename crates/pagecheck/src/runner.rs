//! PageAssertionRunner - executes test suites against a [`PageDriver`].
//!
//! Each case navigates to the configured URL once, then runs its steps in
//! order. The first failing step ends the case. Element lookups poll until
//! something matches or the implicit wait runs out; comparisons happen once.

use crate::assertion::{Assertion, AssertionResult, TextRule};
use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::expectation::{Expectation, Expected, Probe, SequenceLength, Target};
use crate::harness::{Step, TestCase, TestSuite};
use crate::locator::{ElementPath, Pick, Query};
use crate::reporter::{FailureMode, Reporter, TestResultEntry};
use crate::result::{PagecheckError, PagecheckResult};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A value read from the page
#[derive(Debug, Clone, PartialEq, Eq)]
enum Observed {
    /// String value; `None` when the property or attribute does not exist
    Text(Option<String>),
    /// Boolean state
    Flag(bool),
}

/// Runs test cases against one browser session
#[derive(Debug)]
pub struct PageAssertionRunner<D: PageDriver> {
    driver: D,
    config: SuiteConfig,
    failure_mode: FailureMode,
    screenshot_dir: Option<PathBuf>,
}

impl<D: PageDriver> PageAssertionRunner<D> {
    /// Create a runner over a driver
    #[must_use]
    pub fn new(driver: D, config: SuiteConfig) -> Self {
        Self {
            driver,
            config,
            failure_mode: FailureMode::default(),
            screenshot_dir: None,
        }
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Write a screenshot to `<dir>/<case>.png` when a case fails
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    /// Suite configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// The underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Consume the runner, returning the driver
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Run every case, then release the browser session
    pub async fn run_suite(&mut self, suite: &TestSuite) -> Reporter {
        self.run_suite_with(suite, |_| {}).await
    }

    /// Like [`Self::run_suite`], calling `on_result` after each case
    pub async fn run_suite_with<F>(&mut self, suite: &TestSuite, mut on_result: F) -> Reporter
    where
        F: FnMut(&TestResultEntry),
    {
        let mut reporter = Reporter::with_mode(self.failure_mode).with_name(&suite.name);
        info!(suite = %suite.name, cases = suite.test_count(), "running suite");

        let mut cases = suite.tests.iter();
        for case in cases.by_ref() {
            let entry = self.run_recorded(case).await;
            on_result(&entry);
            if let Err(stop) = reporter.record(entry) {
                warn!(%stop, "stopping suite");
                break;
            }
        }
        for case in cases {
            reporter.record_skipped(&case.name);
            if let Some(entry) = reporter.results().last() {
                on_result(entry);
            }
        }

        if let Err(e) = self.driver.quit().await {
            warn!(error = %e, "failed to release browser session");
        }
        info!(summary = %reporter.summary(), "suite finished");
        reporter
    }

    async fn run_recorded(&mut self, case: &TestCase) -> TestResultEntry {
        info!(case = %case.name, "start");
        let started = Instant::now();
        let outcome = self.run_case(case).await;
        let duration = started.elapsed();
        match outcome {
            Ok(()) => {
                info!(case = %case.name, ?duration, "passed");
                TestResultEntry::passed(&case.name, duration)
            }
            Err(e) => {
                info!(case = %case.name, ?duration, error = %e, "failed");
                let entry = TestResultEntry::failed(&case.name, duration, e.to_string());
                match self.capture(case).await {
                    Some(path) => entry.with_screenshot(path),
                    None => entry,
                }
            }
        }
    }

    /// Navigate to the target URL and run one case's steps
    ///
    /// # Errors
    ///
    /// Returns the first step failure, or the navigation error
    pub async fn run_case(&mut self, case: &TestCase) -> PagecheckResult<()> {
        let url = self.config.target_url();
        debug!(case = %case.name, %url, "navigate");
        self.driver.navigate(&url).await?;
        for (index, step) in case.steps.iter().enumerate() {
            debug!(case = %case.name, index, %step, "step");
            self.run_step(step).await?;
        }
        Ok(())
    }

    async fn run_step(&mut self, step: &Step) -> PagecheckResult<()> {
        match step {
            Step::Expect(expectation) => self.check(expectation).await,
            Step::Click(query) => {
                for path in self.resolve(query).await? {
                    self.driver.click(&path).await?;
                }
                Ok(())
            }
            Step::HoverClick(query) => {
                for path in self.resolve(query).await? {
                    self.driver.hover_click(&path).await?;
                }
                Ok(())
            }
        }
    }

    /// Resolve a query and its parent scopes to element paths
    async fn resolve(&mut self, query: &Query) -> PagecheckResult<Vec<ElementPath>> {
        let mut chain = vec![query];
        let mut current = query;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }

        let mut scope: Option<ElementPath> = None;
        while let Some(next) = chain.pop() {
            let paths = self.locate(scope.as_ref(), next).await?;
            if chain.is_empty() {
                return Ok(paths);
            }
            match paths.into_iter().next() {
                Some(path) => scope = Some(path),
                None => return Err(PagecheckError::not_found(next.to_string())),
            }
        }
        Ok(Vec::new())
    }

    /// Find matches under a scope, polling within the implicit wait
    async fn locate(
        &mut self,
        scope: Option<&ElementPath>,
        query: &Query,
    ) -> PagecheckResult<Vec<ElementPath>> {
        let locator = query.locator();
        let deadline = self.config.wait().start();
        let count = loop {
            let count = self.driver.find_elements(scope, locator).await?;
            // `Each` takes whatever the loaded page holds
            if count > 0 || deadline.expired() || query.pick() == Pick::Each {
                break count;
            }
            deadline.pause().await;
        };
        debug!(%query, count, elapsed = ?deadline.elapsed(), "located");

        let path = |index| ElementPath::under(scope, locator.clone(), index);
        match query.pick() {
            Pick::First if count > 0 => Ok(vec![path(0)]),
            Pick::Nth(index) if index < count => Ok(vec![path(index)]),
            Pick::All | Pick::Each => Ok((0..count).map(path).collect()),
            Pick::First | Pick::Nth(_) => Err(PagecheckError::not_found(query.to_string())),
        }
    }

    /// Evaluate one expectation
    async fn check(&mut self, expectation: &Expectation) -> PagecheckResult<()> {
        let query = match expectation.target() {
            Target::Page => {
                if *expectation.probe() != Probe::Title {
                    return Err(invalid(expectation));
                }
                let title = self.driver.title().await?;
                return compare(
                    expectation,
                    &expectation.subject(),
                    Observed::Text(Some(title)),
                );
            }
            Target::Elements(query) => query,
        };

        let paths = self.resolve(query).await.map_err(|e| match e {
            PagecheckError::ElementNotFound { .. } => expectation
                .missing_message()
                .map_or(e, PagecheckError::failed),
            other => other,
        })?;

        match (expectation.expected(), expectation.probe()) {
            (Expected::Count(expected), Probe::Count) => {
                let result = Assertion::equals(expected, &paths.len());
                if result.passed {
                    Ok(())
                } else {
                    Err(fail(
                        expectation,
                        PagecheckError::mismatch(
                            format!("count of {query}"),
                            expected.to_string(),
                            paths.len().to_string(),
                        ),
                        &paths.len().to_string(),
                    ))
                }
            }
            (Expected::Sequence { rule, items, length }, probe) => {
                let mut actual = Vec::with_capacity(paths.len());
                for path in &paths {
                    match self.read(path, probe).await? {
                        Observed::Text(value) => actual.push(value),
                        Observed::Flag(_) => return Err(invalid(expectation)),
                    }
                }
                compare_sequence(expectation, query, *rule, items, *length, &actual)
            }
            (_, Probe::Count | Probe::Title) => Err(invalid(expectation)),
            (_, probe) => {
                for path in &paths {
                    let observed = self.read(path, probe).await?;
                    compare(expectation, &format!("{probe} of {path}"), observed)?;
                }
                Ok(())
            }
        }
    }

    async fn read(&mut self, path: &ElementPath, probe: &Probe) -> PagecheckResult<Observed> {
        Ok(match probe {
            Probe::Text => Observed::Text(Some(self.driver.text(path).await?)),
            Probe::Property(name) => Observed::Text(self.driver.property(path, name).await?),
            Probe::Attribute(name) => Observed::Text(self.driver.attribute(path, name).await?),
            Probe::Displayed => Observed::Flag(self.driver.is_displayed(path).await?),
            Probe::Selected => Observed::Flag(self.driver.is_selected(path).await?),
            Probe::Title | Probe::Count => {
                return Err(PagecheckError::Config {
                    message: format!("{probe} cannot be read from an element"),
                })
            }
        })
    }

    /// Save a screenshot of the current page for a failed case
    async fn capture(&mut self, case: &TestCase) -> Option<PathBuf> {
        let dir = self.screenshot_dir.clone()?;
        let png = match self.driver.screenshot().await {
            Ok(png) if !png.is_empty() => png,
            Ok(_) => return None,
            Err(e) => {
                warn!(case = %case.name, error = %e, "screenshot failed");
                return None;
            }
        };
        let path = dir.join(format!("{}.png", case.name));
        let written = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, &png).await
        }
        .await;
        match written {
            Ok(()) => {
                debug!(path = %path.display(), "screenshot saved");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not write screenshot");
                None
            }
        }
    }
}

fn invalid(expectation: &Expectation) -> PagecheckError {
    PagecheckError::Config {
        message: format!("unsupported expectation: {expectation}"),
    }
}

/// Replace `error` with the expectation's custom message, if any
fn fail(expectation: &Expectation, error: PagecheckError, actual: &str) -> PagecheckError {
    match expectation.message() {
        Some(message) => PagecheckError::failed(message.replace("{actual}", actual)),
        None => error,
    }
}

/// Failure for one text comparison under a rule
fn text_failure(rule: TextRule, subject: &str, expected: &str, actual: &str) -> PagecheckError {
    match rule {
        TextRule::Exact => PagecheckError::mismatch(subject, expected, actual),
        TextRule::IgnoreCase => {
            PagecheckError::failed(Assertion::equals_ignore_case(expected, actual).message())
        }
        TextRule::Contains => PagecheckError::failed(format!(
            "{subject}: {}",
            Assertion::contains(actual, expected).message()
        )),
    }
}

/// Compare a single observed value
fn compare(expectation: &Expectation, subject: &str, observed: Observed) -> PagecheckResult<()> {
    match (expectation.expected(), observed) {
        (Expected::Text { rule, value }, Observed::Text(Some(actual))) => {
            if Assertion::text(*rule, value, &actual).passed {
                Ok(())
            } else {
                Err(fail(
                    expectation,
                    text_failure(*rule, subject, value, &actual),
                    &actual,
                ))
            }
        }
        (Expected::Text { value, .. }, Observed::Text(None)) => Err(fail(
            expectation,
            PagecheckError::failed(format!("{subject}: expected {value:?}, got null")),
            "null",
        )),
        (Expected::Flag(expected), Observed::Flag(actual)) => {
            let result: AssertionResult = Assertion::equals(expected, &actual);
            if result.passed {
                Ok(())
            } else {
                Err(fail(
                    expectation,
                    PagecheckError::mismatch(subject, result.expected, result.actual),
                    &actual.to_string(),
                ))
            }
        }
        _ => Err(invalid(expectation)),
    }
}

/// Compare an ordered list of values, item by item
fn compare_sequence(
    expectation: &Expectation,
    query: &Query,
    rule: TextRule,
    items: &[String],
    length: SequenceLength,
    actual: &[Option<String>],
) -> PagecheckResult<()> {
    let length_check = match length {
        SequenceLength::Exact => Assertion::has_length(actual, items.len()),
        SequenceLength::AtLeast => Assertion::has_at_least(actual, items.len()),
    };
    if !length_check.passed {
        return Err(fail(
            expectation,
            PagecheckError::mismatch(
                format!("count of {query}"),
                length_check.expected,
                length_check.actual,
            ),
            &actual.len().to_string(),
        ));
    }
    for (index, (expected, value)) in items.iter().zip(actual).enumerate() {
        let subject = format!("{} of {query} item {index}", expectation.probe());
        let Some(value) = value else {
            return Err(fail(
                expectation,
                PagecheckError::failed(format!("{subject}: expected {expected:?}, got null")),
                "null",
            ));
        };
        if !Assertion::text(rule, expected, value).passed {
            return Err(fail(
                expectation,
                text_failure(rule, &subject, expected, value),
                value,
            ));
        }
    }
    Ok(())
}

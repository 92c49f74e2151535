//! Reporter - test results, summary line, JUnit XML and JSON output.
//!
//! # Failure modes
//!
//! - [`FailureMode::CollectAll`] (default): every case runs; failures are
//!   collected.
//! - [`FailureMode::FailFast`]: recording the first failure returns an error
//!   and the runner marks the remaining cases skipped.

use crate::result::{PagecheckError, PagecheckResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Failure mode for test execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailureMode {
    /// Run every case, collect all failures
    #[default]
    CollectAll,
    /// Stop on the first failed case
    FailFast,
}

/// Test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test was skipped
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Check if status is skipped
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Individual test result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Test name
    pub name: String,
    /// Test status
    pub status: TestStatus,
    /// Duration of test execution
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Screenshot written on failure
    pub screenshot: Option<PathBuf>,
}

impl TestResultEntry {
    /// Create a passing test result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            error: None,
            screenshot: None,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            error: Some(error.into()),
            screenshot: None,
        }
    }

    /// Create a skipped test result
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            screenshot: None,
        }
    }

    /// Attach the path of a failure screenshot
    #[must_use]
    pub fn with_screenshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot = Some(path.into());
        self
    }
}

/// Serialized report
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    suite: &'a str,
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    duration_ms: u128,
    results: &'a [TestResultEntry],
}

/// Test reporter
///
/// # Example
///
/// ```
/// use pagecheck::{Reporter, TestResultEntry};
/// use std::time::Duration;
///
/// let mut reporter = Reporter::fail_fast().with_name("homepage");
/// reporter.record(TestResultEntry::passed("test_1", Duration::from_millis(100))).unwrap();
/// let stop = reporter.record(TestResultEntry::failed("test_2", Duration::ZERO, "boom"));
/// assert!(stop.is_err());
/// assert_eq!(reporter.summary(), "homepage: 1/2 passed (50.0%)");
/// ```
#[derive(Debug, Default)]
pub struct Reporter {
    results: Vec<TestResultEntry>,
    failure_mode: FailureMode,
    suite_name: String,
}

impl Reporter {
    /// Create new reporter with default settings (CollectAll mode)
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(FailureMode::CollectAll)
    }

    /// Create reporter with a failure mode
    #[must_use]
    pub fn with_mode(failure_mode: FailureMode) -> Self {
        Self {
            failure_mode,
            suite_name: "Test Suite".to_string(),
            ..Default::default()
        }
    }

    /// Create reporter with FailFast mode
    #[must_use]
    pub fn fail_fast() -> Self {
        Self::with_mode(FailureMode::FailFast)
    }

    /// Create reporter with CollectAll mode
    #[must_use]
    pub fn collect_all() -> Self {
        Self::with_mode(FailureMode::CollectAll)
    }

    /// Set suite name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Suite name
    #[must_use]
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    /// Failure mode
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Record a test result
    ///
    /// # Errors
    ///
    /// In FailFast mode, returns an error if the test failed
    pub fn record(&mut self, result: TestResultEntry) -> PagecheckResult<()> {
        let stop = (self.failure_mode == FailureMode::FailFast && result.status.is_failed())
            .then(|| {
                format!(
                    "fail-fast: test '{}' failed: {}",
                    result.name,
                    result.error.as_deref().unwrap_or_default()
                )
            });
        self.results.push(result);
        match stop {
            Some(message) => Err(PagecheckError::failed(message)),
            None => Ok(()),
        }
    }

    /// Record a case that never ran
    pub fn record_skipped(&mut self, name: impl Into<String>) {
        self.results.push(TestResultEntry::skipped(name));
    }

    /// Get number of passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Get number of failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Get number of skipped tests
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_skipped()).count()
    }

    /// Get total test count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Get pass rate (0.0 to 1.0)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 1.0;
        }
        self.passed_count() as f64 / self.results.len() as f64
    }

    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0 && self.skipped_count() == 0
    }

    /// Get total duration
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// Get test results
    #[must_use]
    pub fn results(&self) -> &[TestResultEntry] {
        &self.results
    }

    /// Get failing tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResultEntry> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {}/{} passed ({:.1}%)",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0
        );
        let skipped = self.skipped_count();
        if skipped > 0 {
            summary.push_str(&format!(", {skipped} skipped"));
        }
        summary
    }

    /// Generate JUnit XML for CI integration
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn generate_junit(&self, output_path: &Path) -> PagecheckResult<()> {
        std::fs::write(output_path, self.render_junit())?;
        Ok(())
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.suite_name),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        ));
        xml.push('\n');

        for result in &self.results {
            xml.push_str(&format!(
                r#"  <testcase name="{}" classname="{}" time="{:.3}">"#,
                escape_xml(&result.name),
                escape_xml(&self.suite_name),
                result.duration.as_secs_f64()
            ));
            xml.push('\n');

            match (&result.status, &result.error) {
                (TestStatus::Failed, Some(error)) => {
                    let first_line = error.lines().next().unwrap_or_default();
                    xml.push_str(&format!(
                        r#"    <failure message="{}">{}</failure>"#,
                        escape_xml(first_line),
                        escape_xml(error)
                    ));
                    xml.push('\n');
                }
                (TestStatus::Failed, None) => xml.push_str("    <failure/>\n"),
                (TestStatus::Skipped, _) => xml.push_str("    <skipped/>\n"),
                (TestStatus::Passed, _) => {}
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Render the results as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn render_json(&self) -> PagecheckResult<String> {
        let report = JsonReport {
            suite: &self.suite_name,
            total: self.total_count(),
            passed: self.passed_count(),
            failed: self.failed_count(),
            skipped: self.skipped_count(),
            duration_ms: self.total_duration().as_millis(),
            results: &self.results,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Write the JSON report to a file
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn generate_json(&self, output_path: &Path) -> PagecheckResult<()> {
        std::fs::write(output_path, self.render_json()?)?;
        Ok(())
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    mod failure_mode_tests {
        use super::*;

        #[test]
        fn test_default_failure_mode() {
            assert_eq!(FailureMode::default(), FailureMode::CollectAll);
            assert_eq!(Reporter::new().failure_mode(), FailureMode::CollectAll);
        }

        #[test]
        fn test_collect_all_never_stops() {
            let mut reporter = Reporter::collect_all();
            assert!(reporter.record(TestResultEntry::failed("a", ms(1), "x")).is_ok());
            assert!(reporter.record(TestResultEntry::failed("b", ms(1), "y")).is_ok());
            assert_eq!(reporter.failed_count(), 2);
        }

        #[test]
        fn test_fail_fast_stops_on_failure() {
            let mut reporter = Reporter::fail_fast();
            assert!(reporter.record(TestResultEntry::passed("a", ms(1))).is_ok());
            let err = reporter
                .record(TestResultEntry::failed("b", ms(1), "title mismatch"))
                .unwrap_err();
            assert!(err.to_string().contains("test 'b' failed: title mismatch"));
            assert_eq!(reporter.total_count(), 2);
        }
    }

    mod test_status_tests {
        use super::*;

        #[test]
        fn test_status_predicates() {
            assert!(TestStatus::Passed.is_passed());
            assert!(!TestStatus::Failed.is_passed());
            assert!(TestStatus::Failed.is_failed());
            assert!(TestStatus::Skipped.is_skipped());
            assert!(!TestStatus::Skipped.is_failed());
        }
    }

    mod summary_tests {
        use super::*;

        #[test]
        fn test_empty_reporter_passes() {
            let reporter = Reporter::new();
            assert!(reporter.all_passed());
            assert!((reporter.pass_rate() - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_summary_counts() {
            let mut reporter = Reporter::new().with_name("homepage");
            reporter.record(TestResultEntry::passed("a", ms(10))).unwrap();
            reporter.record(TestResultEntry::failed("b", ms(20), "boom")).unwrap();
            reporter.record_skipped("c");
            assert_eq!(reporter.summary(), "homepage: 1/3 passed (33.3%), 1 skipped");
            assert_eq!(reporter.total_duration(), ms(30));
            assert_eq!(reporter.failures().len(), 1);
            assert!(!reporter.all_passed());
        }
    }

    mod junit_tests {
        use super::*;

        #[test]
        fn test_junit_escapes_and_marks_status() {
            let mut reporter = Reporter::new().with_name("homepage");
            reporter.record(TestResultEntry::passed("ok", ms(5))).unwrap();
            reporter
                .record(TestResultEntry::failed(
                    "bad",
                    ms(5),
                    "title: expected \"8by8 Challenge\", got \"<none>\"",
                ))
                .unwrap();
            reporter.record(TestResultEntry::skipped("later")).unwrap();
            let xml = reporter.render_junit();
            assert!(xml.contains(r#"tests="3" failures="1" skipped="1""#));
            assert!(xml.contains("&quot;8by8 Challenge&quot;"));
            assert!(xml.contains("&lt;none&gt;"));
            assert!(xml.contains("<skipped/>"));
        }

        #[test]
        fn test_generate_junit_writes_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("junit.xml");
            let mut reporter = Reporter::new();
            reporter.record(TestResultEntry::passed("a", ms(1))).unwrap();
            reporter.generate_junit(&path).unwrap();
            let written = std::fs::read_to_string(&path).unwrap();
            assert!(written.starts_with("<?xml"));
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn test_json_report_shape() {
            let mut reporter = Reporter::new().with_name("homepage");
            reporter
                .record(TestResultEntry::failed("bad", ms(7), "boom").with_screenshot("shots/bad.png"))
                .unwrap();
            let json: serde_json::Value =
                serde_json::from_str(&reporter.render_json().unwrap()).unwrap();
            assert_eq!(json["suite"], "homepage");
            assert_eq!(json["failed"], 1);
            assert_eq!(json["results"][0]["status"], "Failed");
            assert_eq!(json["results"][0]["screenshot"], "shots/bad.png");
        }

        #[test]
        fn test_generate_json_writes_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("report.json");
            Reporter::new().generate_json(&path).unwrap();
            assert!(std::fs::read_to_string(&path).unwrap().contains("\"total\": 0"));
        }
    }
}

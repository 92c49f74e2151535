//! Suite runner with console progress and report files

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use pagecheck::{PageAssertionRunner, PageDriver, Reporter, SuiteConfig, TestSuite};
use std::path::Path;
use tracing::info;

/// Runs a suite over a driver and reports to the terminal
#[derive(Debug)]
pub struct SuiteRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a new suite runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Run the suite, print outcomes, then write any configured reports.
    ///
    /// Returns the report even when cases fail; only report writing errors.
    ///
    /// # Errors
    ///
    /// Returns error if a report file cannot be written
    pub async fn run<D: PageDriver>(
        &mut self,
        driver: D,
        suite_config: SuiteConfig,
        suite: &TestSuite,
    ) -> CliResult<Reporter> {
        if suite.tests.is_empty() {
            self.reporter.warning("No test cases match");
        }

        self.reporter.header(&format!("Running {}", suite.name));
        self.reporter
            .info(&format!("target: {}", suite_config.base_url()));
        self.reporter
            .start_progress(suite.test_count() as u64, &suite.name);

        let mut runner = PageAssertionRunner::new(driver, suite_config)
            .with_failure_mode(self.config.failure_mode());
        if let Some(dir) = &self.config.screenshots {
            runner = runner.with_screenshot_dir(dir);
        }

        let reporter = &self.reporter;
        let report = runner
            .run_suite_with(suite, |entry| reporter.case_result(entry))
            .await;

        self.reporter.finish();
        self.reporter.summary(
            report.passed_count(),
            report.failed_count(),
            report.skipped_count(),
            report.total_duration(),
        );

        self.write_reports(&report)?;
        Ok(report)
    }

    /// Write the JUnit and JSON reports that were asked for
    ///
    /// # Errors
    ///
    /// Returns error if a directory cannot be created or a file written
    pub fn write_reports(&self, report: &Reporter) -> CliResult<()> {
        if let Some(path) = &self.config.junit {
            ensure_parent(path)?;
            report
                .generate_junit(path)
                .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            info!(path = %path.display(), "junit report written");
            self.reporter
                .info(&format!("JUnit report: {}", path.display()));
        }
        if let Some(path) = &self.config.json {
            ensure_parent(path)?;
            report
                .generate_json(path)
                .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            info!(path = %path.display(), "json report written");
            self.reporter
                .info(&format!("JSON report: {}", path.display()));
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> CliResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

//! CLI configuration

use crate::commands::{RunArgs, TargetArgs};
use crate::error::CliResult;
use pagecheck::{BrowserConfig, FailureMode, SuiteConfig, ACCESS_TOKEN_VAR, PREVIEW_URL_VAR};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Level from the `-q` flag and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Log filter used when `RUST_LOG` is not set
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "pagecheck=info,warn",
            Self::Debug => "pagecheck=debug,info",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Stop at the first failing case
    pub fail_fast: bool,
    /// JUnit XML report path
    pub junit: Option<PathBuf>,
    /// JSON report path
    pub json: Option<PathBuf>,
    /// Failure screenshot directory
    pub screenshots: Option<PathBuf>,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set fail fast
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Take report and screenshot destinations from run arguments
    #[must_use]
    pub fn with_outputs(mut self, args: &RunArgs) -> Self {
        self.junit.clone_from(&args.junit);
        self.json.clone_from(&args.json);
        self.screenshots.clone_from(&args.screenshots);
        self
    }

    /// Failure mode for the suite runner
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        if self.fail_fast {
            FailureMode::FailFast
        } else {
            FailureMode::CollectAll
        }
    }
}

/// Suite configuration from the target flags; empty values count as unset
///
/// # Errors
///
/// Returns an error if the URL is invalid.
pub fn suite_config(target: &TargetArgs) -> CliResult<SuiteConfig> {
    let config = SuiteConfig::from_lookup(|key| match key {
        PREVIEW_URL_VAR => target.url.clone(),
        ACCESS_TOKEN_VAR => target.access_token.clone(),
        _ => None,
    })?;
    Ok(config)
}

/// Suite configuration for a run, including the implicit wait
///
/// # Errors
///
/// Returns an error if the URL is invalid.
pub fn run_suite_config(args: &RunArgs) -> CliResult<SuiteConfig> {
    Ok(suite_config(&args.target)?
        .with_implicit_wait(Duration::from_millis(args.implicit_wait_ms)))
}

/// Browser launch configuration for a run
#[must_use]
pub fn browser_config(args: &RunArgs) -> BrowserConfig {
    let mut config = BrowserConfig::default().with_headless(!args.headed);
    if let Some(path) = &args.chromium_path {
        config = config.with_chromium_path(path);
    }
    if args.no_sandbox {
        config = config.with_no_sandbox();
    }
    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["pagecheck", "run", "--url", "http://localhost:3000"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
            Commands::List(_) => panic!("expected Run command"),
        }
    }

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
        }

        #[test]
        fn test_is_verbose() {
            assert!(!Verbosity::Quiet.is_verbose());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Verbose.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
            assert!(Verbosity::Quiet.is_quiet());
        }

        #[test]
        fn test_log_directive() {
            assert_eq!(Verbosity::Quiet.log_directive(), "error");
            assert_eq!(Verbosity::Normal.log_directive(), "warn");
            assert!(Verbosity::Debug.log_directive().contains("pagecheck=debug"));
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod cli_config_tests {
        use super::*;

        #[test]
        fn test_failure_mode() {
            assert_eq!(CliConfig::new().failure_mode(), FailureMode::CollectAll);
            assert_eq!(
                CliConfig::new().with_fail_fast(true).failure_mode(),
                FailureMode::FailFast
            );
        }

        #[test]
        fn test_outputs_from_args() {
            let args = run_args(&["--json", "out/report.json", "--screenshots", "shots"]);
            let config = CliConfig::new().with_outputs(&args);
            assert_eq!(config.json, Some(PathBuf::from("out/report.json")));
            assert_eq!(config.screenshots, Some(PathBuf::from("shots")));
            assert!(config.junit.is_none());
        }
    }

    mod suite_config_tests {
        use super::*;

        #[test]
        fn test_url_and_token() {
            let target = TargetArgs {
                url: Some("https://preview.example.app/".to_string()),
                access_token: Some("tok".to_string()),
            };
            let config = suite_config(&target).unwrap();
            assert_eq!(
                config.target_url(),
                "https://preview.example.app?x-vercel-protection-bypass=tok"
            );
        }

        #[test]
        fn test_empty_values_are_unset() {
            let target = TargetArgs {
                url: Some(String::new()),
                access_token: Some("  ".to_string()),
            };
            let config = suite_config(&target).unwrap();
            assert_eq!(config.target_url(), "http://localhost:3000");
        }

        #[test]
        fn test_invalid_url() {
            let target = TargetArgs {
                url: Some("ftp://example.com".to_string()),
                access_token: None,
            };
            let err = suite_config(&target).unwrap_err();
            assert!(err.to_string().contains("Configuration error"));
        }

        #[test]
        fn test_implicit_wait_from_args() {
            let args = run_args(&["--implicit-wait-ms", "250"]);
            let config = run_suite_config(&args).unwrap();
            assert_eq!(config.wait().timeout, Duration::from_millis(250));
        }

        #[test]
        fn test_browser_config_from_args() {
            let args = run_args(&["--headed", "--no-sandbox", "--chromium-path", "/opt/chromium"]);
            let config = browser_config(&args);
            assert!(!config.headless);
            assert!(!config.sandbox);
            assert_eq!(config.chromium_path, Some(PathBuf::from("/opt/chromium")));
        }
    }
}

//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pagecheck: headless-browser checks for the 8by8 Challenge homepage
#[derive(Parser, Debug)]
#[command(name = "pagecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit log events as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the homepage suite in Chromium
    Run(RunArgs),

    /// List the homepage test cases
    List(ListArgs),
}

/// Where the app under test lives
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Base URL of the app (default http://localhost:3000)
    #[arg(long, env = "PREVIEW_URL")]
    pub url: Option<String>,

    /// Deployment protection bypass token
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Only run cases whose name contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop at the first failing case
    #[arg(long)]
    pub fail_fast: bool,

    /// How long element lookups poll before giving up, in milliseconds
    #[arg(long, default_value = "10000")]
    pub implicit_wait_ms: u64,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<PathBuf>,

    /// Disable the Chromium sandbox (needed in most containers)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Write a JUnit XML report
    #[arg(long)]
    pub junit: Option<PathBuf>,

    /// Write a JSON report
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Directory for failure screenshots
    #[arg(long)]
    pub screenshots: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Only list cases whose name contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Print the cases, with their steps, as JSON
    #[arg(long)]
    pub json: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::try_parse_from(["pagecheck", "run"]).unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected Run command");
            };
            assert_eq!(args.implicit_wait_ms, 10_000);
            assert!(!args.fail_fast);
            assert!(!args.headed);
            assert!(args.filter.is_none());
        }

        #[test]
        fn test_parse_run_flags() {
            let cli = Cli::try_parse_from([
                "pagecheck",
                "run",
                "--url",
                "https://preview.example.app",
                "--access-token",
                "tok",
                "--filter",
                "image",
                "--fail-fast",
                "--implicit-wait-ms",
                "500",
                "--headed",
                "--no-sandbox",
                "--junit",
                "out/junit.xml",
            ])
            .unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected Run command");
            };
            assert_eq!(args.target.url.as_deref(), Some("https://preview.example.app"));
            assert_eq!(args.target.access_token.as_deref(), Some("tok"));
            assert_eq!(args.filter.as_deref(), Some("image"));
            assert!(args.fail_fast);
            assert_eq!(args.implicit_wait_ms, 500);
            assert!(args.headed);
            assert!(args.no_sandbox);
            assert_eq!(args.junit, Some(PathBuf::from("out/junit.xml")));
        }

        #[test]
        fn test_parse_list() {
            let cli = Cli::try_parse_from(["pagecheck", "list", "--json", "-f", "section"]).unwrap();
            let Commands::List(args) = cli.command else {
                panic!("expected List command");
            };
            assert!(args.json);
            assert_eq!(args.filter.as_deref(), Some("section"));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from(["pagecheck", "list", "-vv", "--color", "never"]).unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["pagecheck"]).is_err());
        }
    }

    mod color_arg_tests {
        use super::*;
        use crate::config::ColorChoice;

        #[test]
        fn test_color_arg_into_choice() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}

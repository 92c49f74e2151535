//! pagecheck CLI: run the 8by8 Challenge homepage suite
//!
//! ## Usage
//!
//! ```bash
//! pagecheck run                                  # Run against http://localhost:3000
//! pagecheck run --url https://... --access-token ...
//! pagecheck run --filter image --junit target/pagecheck/junit.xml
//! pagecheck list --json                          # Show the cases as data
//! ```

use clap::Parser;
use pagecheck::{homepage_suite, ChromiumDriver};
use pagecheck_cli::{
    browser_config, run_suite_config, suite_config, Cli, CliConfig, CliError, CliResult,
    ColorChoice, Commands, ListArgs, RunArgs, SuiteRunner, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity, cli.log_json);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: CliConfig) -> CliResult<()> {
    match cli.command {
        Commands::Run(args) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_suite(config, &args))
        }
        Commands::List(args) => run_list(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked from -v/-q
fn init_tracing(verbosity: Verbosity, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity.is_verbose());
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

async fn run_suite(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let suite_config = run_suite_config(args)?;
    let mut suite = homepage_suite(&suite_config);
    if let Some(pattern) = &args.filter {
        suite = suite.filter(pattern);
    }

    let driver = ChromiumDriver::launch(&browser_config(args)).await?;
    let config = config.with_fail_fast(args.fail_fast).with_outputs(args);
    let mut runner = SuiteRunner::new(config);
    let report = runner.run(driver, suite_config, &suite).await?;

    if report.failed_count() == 0 {
        Ok(())
    } else {
        Err(CliError::test_execution(format!(
            "{} test(s) failed",
            report.failed_count()
        )))
    }
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let mut suite = homepage_suite(&suite_config(&args.target)?);
    if let Some(pattern) = &args.filter {
        suite = suite.filter(pattern);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&suite)
            .map_err(|e| CliError::report_generation(e.to_string()))?;
        println!("{json}");
    } else {
        for case in &suite.tests {
            println!("{:<28} {}", case.name, case.description);
        }
    }
    Ok(())
}

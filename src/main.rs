use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use benefits_api_tester::runner::{ConformanceRunner, ConsoleEventListener};
use benefits_api_tester::utils::config::{
    HoneypotPolicy, SuiteConfig, DEFAULT_ADMIN_KEY, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use benefits_api_tester::report;

#[derive(Parser)]
#[command(name = "benefits-api-tester")]
#[command(version)]
#[command(about = "Conformance tests for the benefits-matching submission API", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conformance suite (default)
    Run(RunArgs),

    /// Generate report from saved test results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format (json, html, junit)
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Base URL of the service under test
    #[arg(long, env = "BENEFITS_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Admin key for the admin endpoints
    #[arg(long, env = "BENEFITS_API_ADMIN_KEY", default_value = DEFAULT_ADMIN_KEY, hide_env_values = true)]
    admin_key: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// How to judge an accepted honeypot submission
    #[arg(long, value_enum, default_value_t = HoneypotPolicy::Strict)]
    honeypot: HoneypotPolicy,

    /// Also run the extended admin checks
    #[arg(long, default_value = "false")]
    extended: bool,

    /// Generate reports (JSON, HTML, JUnit)
    #[arg(long, default_value = "false")]
    report: bool,

    /// Output directory for reports
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::Run(args) => run(args).await,

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let config = SuiteConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        honeypot_policy: args.honeypot,
        extended: args.extended,
        ..SuiteConfig::new(&args.base_url, &args.admin_key)
    };

    if config.honeypot_policy == HoneypotPolicy::Lenient {
        println!("  Honeypot policy: {}", "lenient".yellow());
    }
    if config.extended {
        println!("  Extended checks: {}", "Enabled".green());
    }

    let runner = ConformanceRunner::new(config)?;
    let listener = tokio::spawn(ConsoleEventListener::listen(runner.subscribe()));

    let suite_report = runner.run().await;
    listener.await?;

    if args.report {
        report::write_reports(&suite_report, &args.output)?;
    }

    Ok(ExitCode::from(suite_report.summary.exit_code()))
}

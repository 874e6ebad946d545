//! `stduritemplate` binary: expands template files, runs conformance suites and reports
//! the build's limits.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stduritemplate::config::build_info;
use stduritemplate::config::compile_time::conformance::MAX_WORKER_THREADS;
use stduritemplate::config::runtime::ConformancePreferences;
use stduritemplate::conformance::RunnerConfig;
use stduritemplate::logging::{self, codes};
use stduritemplate_cli::{init_logging, run_conformance, run_expand};

#[derive(Parser)]
#[command(name = "stduritemplate")]
#[command(version)]
#[command(about = "Expand RFC 6570 URI Templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show library log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Emit library events as JSON lines on stderr
    #[arg(long, global = true)]
    structured_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a template file against a JSON substitution file
    Expand {
        /// File holding the template (surrounding whitespace is trimmed)
        template: PathBuf,

        /// JSON object with the substitution values
        data: PathBuf,
    },

    /// Run uritemplate-test style suite files or directories of them
    Conformance {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Run groups on the current thread only
        #[arg(long)]
        sequential: bool,

        /// Stop at the first failing case
        #[arg(long)]
        fail_fast: bool,

        /// Worker threads for parallel runs
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Print build profile, compile-time limits and logging configuration
    Info,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.structured_logs) {
        logging::safe_log_error(
            codes::system::INITIALIZATION_FAILURE,
            &format!("Failed to initialize logging: {}", e),
        );
    }

    match cli.command {
        Commands::Expand { template, data } => cmd_expand(template, data),
        Commands::Conformance {
            paths,
            sequential,
            fail_fast,
            threads,
        } => cmd_conformance(paths, sequential, fail_fast, threads),
        Commands::Info => cmd_info(),
    }
}

fn cmd_info() -> ExitCode {
    use stduritemplate::config::compile_time::{expansion, template};

    println!("stduritemplate v{}", env!("CARGO_PKG_VERSION"));
    println!("{}\n", build_info::source_info());
    println!("=== Limits ===");
    println!("- Max template size: {} bytes", template::MAX_TEMPLATE_SIZE);
    println!("- Max expressions: {}", template::MAX_EXPRESSION_COUNT);
    println!("- Max output size: {} bytes", expansion::MAX_OUTPUT_SIZE);
    println!("- Max worker threads: {}\n", MAX_WORKER_THREADS);
    println!("{}\n", logging::diagnostics());
    println!("=== Log codes ===");
    for code in codes::all() {
        println!("{:<6} {:<12} {}", code, code.stage().as_str(), code.summary());
    }
    ExitCode::SUCCESS
}

fn cmd_expand(template: PathBuf, data: PathBuf) -> ExitCode {
    match run_expand(&template, &data) {
        Ok(expanded) => {
            println!("{}", expanded);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("false");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_conformance(
    paths: Vec<PathBuf>,
    sequential: bool,
    fail_fast: bool,
    threads: Option<usize>,
) -> ExitCode {
    let preferences = ConformancePreferences::default();
    let config = RunnerConfig {
        max_threads: threads
            .unwrap_or_else(num_cpus::get)
            .clamp(1, MAX_WORKER_THREADS),
        parallel: preferences.parallel && !sequential,
        fail_fast: preferences.fail_fast || fail_fast,
    };

    match run_conformance(&paths, &config) {
        Ok(results) => {
            for failure in &results.failures {
                println!(
                    "FAIL {} [{}] {}: {}",
                    failure.suite.display(),
                    failure.group,
                    failure.template,
                    failure.reason()
                );
            }
            println!("{}", results.summary());

            if results.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

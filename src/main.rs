//! rulekit CLI entry point
//!
//! Serves the built-in rules as a plugin process. Replies go to stdout,
//! logs go to stderr.

use anyhow::Context as _;
use clap::Parser;
use rulekit::cli::args::{Args, OutputFormat};
use rulekit::cli::output::get_formatter;
use rulekit::cli::{execute, exit_code, load_config, EXIT_FAILURE};
use rulekit::config::{EngineConfig, DEFAULT_LOG_FILTER};
use rulekit::wire::WireError;
use rulekit::Error;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let (wire, code) = match err.downcast_ref::<Error>() {
                Some(rulekit_err) => (WireError::from(rulekit_err), exit_code(rulekit_err)),
                None => (
                    WireError {
                        code: rulekit::ErrorCode::Unknown,
                        message: format!("{:#}", err),
                    },
                    EXIT_FAILURE,
                ),
            };
            let formatted = get_formatter(args.format).format_error(&wire);
            match args.format {
                OutputFormat::Json => println!("{}", formatted),
                OutputFormat::Text => eprintln!("{}", formatted),
            }
            ExitCode::from(code)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let config = load_config(args)?;
    init_tracing(&config);
    tracing::debug!(?config, "loaded engine config");

    let mut stdin = std::io::stdin().lock();
    let output = execute(args, &config, &mut stdin)?;
    Ok(output)
}

fn init_tracing(config: &EngineConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter {:?}", config.log_filter));
    let filter = match filter {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("warning: {:#}, using {:?}", err, DEFAULT_LOG_FILTER);
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    };

    Registry::default()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

//! CLI module for argument parsing, command dispatch and output formatting.
//!
//! Every command runs against the built-in rules through an in-process
//! [`Client`], the same path a host takes through a real transport.

pub mod args;
pub mod output;

use crate::client::Client;
use crate::config::EngineConfig;
use crate::engine::context::Context;
use crate::error::{Error, ErrorCode, RequestError, Result};
use crate::request::Request;
use crate::rules::builtin_spec;
use crate::server::{CheckService, Transport};
use crate::version::VersionInfo;
use crate::wire;
use args::{Args, Command, PageArgs};
use output::get_formatter;
use std::io::Read;

/// Exit code for invalid arguments and unimplemented calls
pub const EXIT_INVALID: u8 = 2;
/// Exit code for every other failure
pub const EXIT_FAILURE: u8 = 3;

/// Engine config from, in order: defaults, `--config`, environment, flags.
pub fn load_config(args: &Args) -> Result<EngineConfig> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(parallelism) = args.parallelism {
        config.parallelism = parallelism;
    }
    Ok(config)
}

/// Run the parsed command and return its formatted reply.
///
/// `input` is read only by `check` without `--input`.
pub fn execute(args: &Args, config: &EngineConfig, input: &mut dyn Read) -> Result<String> {
    let formatter = get_formatter(args.format);
    let ctx = Context::background();
    match &args.command {
        Command::Version => {
            let client = client(config)?;
            let catalog = client.transport().orchestrator().catalog();
            formatter.format_version(&VersionInfo::for_catalog(catalog))
        }
        Command::Check { input: path } => {
            let content = match path {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut content = String::new();
                    input.read_to_string(&mut content)?;
                    content
                }
            };
            let request = parse_check_request(&content)?;
            let response = client(config)?.check(&ctx, &request)?;
            formatter.format_check(&response)
        }
        Command::ListRules(page) => {
            let client = client(config)?;
            let reply = if page.all {
                let rules = client.list_rules(&ctx)?;
                wire::ListRulesResponse {
                    rules: rules.iter().map(wire::WireRule::from).collect(),
                    next_page_token: String::new(),
                }
            } else {
                client.transport().list_rules(
                    &ctx,
                    wire::ListRulesRequest {
                        page_size: page.page_size,
                        page_token: page.page_token.clone(),
                    },
                )?
            };
            formatter.format_rules(&reply)
        }
        Command::ListCategories(page) => {
            let reply = list_categories(&client(config)?, &ctx, page)?;
            formatter.format_categories(&reply)
        }
        Command::Info => {
            let info = client(config)?.get_plugin_info(&ctx)?;
            formatter.format_plugin_info(&info)
        }
    }
}

/// Process exit code for a failed command.
pub fn exit_code(err: &Error) -> u8 {
    match err.code() {
        ErrorCode::InvalidArgument | ErrorCode::Unimplemented => EXIT_INVALID,
        ErrorCode::Unknown => EXIT_FAILURE,
    }
}

fn client(config: &EngineConfig) -> Result<Client<CheckService>> {
    Client::for_spec(&builtin_spec(), config)
}

fn parse_check_request(content: &str) -> Result<Request> {
    let message: wire::CheckRequest = serde_json::from_str(content)
        .map_err(|e| RequestError::Malformed(format!("cannot decode check request: {}", e)))?;
    Ok(Request::from_wire(message)?)
}

fn list_categories(
    client: &Client<CheckService>,
    ctx: &Context,
    page: &PageArgs,
) -> Result<wire::ListCategoriesResponse> {
    if page.all {
        let categories = client.list_categories(ctx)?;
        return Ok(wire::ListCategoriesResponse {
            categories: categories.iter().map(wire::WireCategory::from).collect(),
            next_page_token: String::new(),
        });
    }
    client.transport().list_categories(
        ctx,
        wire::ListCategoriesRequest {
            page_size: page.page_size,
            page_token: page.page_token.clone(),
        },
    )
}

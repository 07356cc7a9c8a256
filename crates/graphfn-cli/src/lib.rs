//! graphfn command line
//!
//! Runs the directory query function against request files and inspects
//! documents with the path grammar:
//!
//! ```text
//! graphfn run --request req.yaml --results results.json [--config cfg.yaml] [--out rsp.json]
//! graphfn resolve --request req.yaml --reference status.groups --array
//! graphfn get --document doc.json --path 'metadata.[example.org/name]'
//! ```

#![warn(unreachable_pub)]

pub mod commands;
pub mod files;
pub mod fixture;
pub mod logging;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::RunArgs;
use logging::LogFormat;
use std::io::Write;
use std::path::PathBuf;

/// Build the argument parser
#[must_use]
pub fn command() -> Command {
    Command::new("graphfn")
        .version(graphfn_core::VERSION)
        .about("Directory query pipeline function")
        .subcommand_required(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log line format"),
        )
        .subcommand(
            Command::new("run")
                .about("Run the function against a request and a results fixture")
                .arg(path_arg("request", "Request file (observed, desired, context, input)").required(true))
                .arg(path_arg("results", "Results fixture mapping queryType to result").required(true))
                .arg(path_arg("config", "Function configuration file"))
                .arg(path_arg("out", "Write the response here instead of stdout")),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a reference against a request's documents")
                .arg(path_arg("request", "Request file").required(true))
                .arg(
                    Arg::new("reference")
                        .long("reference")
                        .required(true)
                        .help("Reference such as status.groupInfo.name"),
                )
                .arg(
                    Arg::new("array")
                        .long("array")
                        .action(ArgAction::SetTrue)
                        .help("Resolve to a list of strings"),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Print the value at a path of a document")
                .arg(path_arg("document", "JSON or YAML document").required(true))
                .arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .help("Dot/bracket path"),
                ),
        )
}

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Selected log format
#[must_use]
pub fn log_format(matches: &ArgMatches) -> LogFormat {
    matches
        .get_one::<String>("log-format")
        .and_then(|value| LogFormat::from_arg(value))
        .unwrap_or_default()
}

/// Run the selected subcommand
///
/// Returns `false` when the command completed but reported a failure
/// (fatal outcome, unresolved reference, missing path).
///
/// # Errors
/// Unreadable or malformed files, and output write failures.
pub async fn dispatch(matches: &ArgMatches, out: &mut dyn Write) -> Result<bool> {
    match matches.subcommand() {
        Some(("run", args)) => {
            let args = RunArgs {
                request: required_path(args, "request")?,
                results: required_path(args, "results")?,
                config: args.get_one::<PathBuf>("config").cloned(),
                out: args.get_one::<PathBuf>("out").cloned(),
            };
            commands::run(&args, out).await
        }
        Some(("resolve", args)) => {
            let request = required_path(args, "request")?;
            let reference = args
                .get_one::<String>("reference")
                .context("missing --reference")?;
            commands::resolve(&request, reference, args.get_flag("array"), out)
        }
        Some(("get", args)) => {
            let document = required_path(args, "document")?;
            let path = args.get_one::<String>("path").context("missing --path")?;
            commands::get_path(&document, path, out)
        }
        Some((other, _)) => anyhow::bail!("unknown subcommand {other}"),
        None => anyhow::bail!("no subcommand given"),
    }
}

fn required_path(args: &ArgMatches, name: &str) -> Result<PathBuf> {
    args.get_one::<PathBuf>(name)
        .cloned()
        .with_context(|| format!("missing --{name}"))
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn log_format_is_global() {
        let matches = command()
            .try_get_matches_from(["graphfn", "get", "--document", "d.json", "--path", "a", "--log-format", "json"])
            .unwrap();
        assert_eq!(log_format(&matches), LogFormat::Json);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(command().try_get_matches_from(["graphfn"]).is_err());
    }
}

//! Subcommand implementations
//!
//! Each command writes its output to the given writer and reports whether
//! it succeeded. I/O and parse failures surface as errors.

use crate::files::{read_document, to_pretty_json};
use crate::fixture::FixtureGraphQuery;
use anyhow::{Context, Result};
use graphfn_core::{
    resolve_array, resolve_scalar, FunctionConfig, FunctionRequest, QueryFunction, RootsContext,
};
use graphfn_document::{get, FieldPath, Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Arguments of `graphfn run`
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Request file
    pub request: PathBuf,
    /// Results fixture file
    pub results: PathBuf,
    /// Optional configuration file
    pub config: Option<PathBuf>,
    /// Optional response file; stdout when absent
    pub out: Option<PathBuf>,
}

/// Run the function and write its response
///
/// Returns `false` when the outcome is fatal.
pub async fn run(args: &RunArgs, out: &mut dyn Write) -> Result<bool> {
    let request: FunctionRequest = read_document(&args.request)?;
    let results: Map<String, Value> = read_document(&args.results)?;
    let config = match &args.config {
        Some(path) => read_document(path)?,
        None => FunctionConfig::default(),
    };

    let function = QueryFunction::new(FixtureGraphQuery::new(results)).with_config(config);
    let response = function.run_function(request).await;
    let rendered = to_pretty_json(&response)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote response");
        }
        None => out.write_all(rendered.as_bytes())?,
    }

    if let Some(message) = response.fatal_message() {
        tracing::error!(error = message, "function returned a fatal outcome");
        return Ok(false);
    }
    Ok(true)
}

/// Resolve one reference against a request's documents
pub fn resolve(request: &Path, reference: &str, array: bool, out: &mut dyn Write) -> Result<bool> {
    let request: FunctionRequest = read_document(request)?;
    let mut roots = RootsContext::new(request.observed, request.desired, request.context);
    roots.seed_desired();

    let resolved = if array {
        resolve_array(reference, &mut roots).map(|values| {
            Value::Array(values.into_iter().map(Value::String).collect())
        })
    } else {
        resolve_scalar(reference, &mut roots).map(Value::String)
    };

    match resolved {
        Ok(value) => {
            out.write_all(to_pretty_json(&value)?.as_bytes())?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "{e}")?;
            Ok(false)
        }
    }
}

/// Print the value at a path of a plain document
pub fn get_path(document: &Path, path: &str, out: &mut dyn Write) -> Result<bool> {
    let document: Value = read_document(document)?;
    let path = FieldPath::parse(path).with_context(|| format!("invalid path {path:?}"))?;

    if let Some(value) = get(&document, &path) {
        out.write_all(to_pretty_json(value)?.as_bytes())?;
        Ok(true)
    } else {
        writeln!(out, "{path} not found")?;
        Ok(false)
    }
}

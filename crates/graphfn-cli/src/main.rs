//! `graphfn` binary

use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let matches = graphfn_cli::command().get_matches();
    graphfn_cli::logging::init(graphfn_cli::log_format(&matches))?;

    let mut stdout = std::io::stdout().lock();
    let succeeded = graphfn_cli::dispatch(&matches, &mut stdout).await?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, error};
use undo_ledger::bin_utils::{Service, config::configure_app};

/// Replays a CSV script of ledger operations and prints the final balances.
fn main() -> Result<()> {
    configure_app()?;

    let path: PathBuf = std::env::args()
        .nth(1)
        .context("Expected a script file as the first argument")?
        .into();
    let script = File::open(&path)
        .with_context(|| format!("Failed to open script `{}`", path.display()))?;
    debug!(path = %path.display(), "running script");

    Service {
        input: BufReader::new(script),
        output: &mut std::io::stdout().lock(),
        error_printer: Box::new(|line, err| {
            // insufficient funds is an outcome the command already reported
            if !err.is_insufficient_funds() {
                error!("Skipped line {line}: {err}")
            }
        }),
    }
    .run()
}

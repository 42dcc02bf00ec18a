use anyhow::{Context, Result};
use clap::Parser;

use sheetview::cli::CliArgs;
use sheetview::runtime::{replay, Script};

fn main() -> Result<()> {
    sheetview::tracing::init();

    let startup = CliArgs::parse().into_config()?;
    let script = Script::load(&startup.script)?;
    tracing::info!(
        script = %startup.script.display(),
        steps = script.steps.len(),
        "replaying"
    );

    let report = replay(&script, startup.config, startup.theme);

    if startup.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("{}", report);
    }

    Ok(())
}

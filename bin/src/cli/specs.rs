use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::distpaths;

#[derive(Args, Debug)]
pub struct Command {
    /// Directory holding the bundled specifications. Defaults to the
    /// `specs` directory next to the executable.
    #[arg(long)]
    specs_dir: Option<PathBuf>,
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let specs_dir = cmd
        .specs_dir
        .clone()
        .or_else(distpaths::specs_dir)
        .with_context(|| "no bundled specifications directory found, pass --specs-dir")?;

    let stdout = std::io::stdout();
    print_specs(&specs_dir, &mut stdout.lock())
}

fn print_specs(specs_dir: &std::path::Path, out: &mut dyn Write) -> Result<()> {
    for (index, path) in engine::spec::list(specs_dir)? {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading specification file {path:?}"))?;
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        writeln!(out, "=== SPEC #{index}: {name} ===")?;
        writeln!(out, "{}", content.trim_end())?;
        writeln!(out)?;
    }
    Ok(())
}

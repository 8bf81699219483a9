use anyhow::Result;

mod cli;
mod distpaths;
mod output;
mod specselect;

fn main() -> Result<()> {
    cli::run()
}

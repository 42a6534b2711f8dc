use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use clap::Args;
use waypath_core::route::Route;

#[derive(Args)]
pub struct ResolveArgs {
    /// JSON file holding the ordered list of stops
    #[arg(short = 'i', long)]
    input: PathBuf,
}

pub fn read_route(args: &ResolveArgs) -> anyhow::Result<Route> {
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let reader = BufReader::new(file);

    let route: Route = serde_json::from_reader(reader)
        .with_context(|| format!("Invalid route in {}", args.input.display()))?;

    Ok(route)
}

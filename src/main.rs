use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

use mobiplot::request::{build_request, default_params, PlotKind};
use mobiplot::session::{resolve_active_dataset, set_active_reference, MemorySessionStore};
use mobiplot::source::DatasetReference;

#[derive(Parser, Debug)]
#[command(name = "mobiplot")]
#[command(about = "Build a mobile-safe chart description from tabular data", long_about = None)]
struct Args {
    /// Plot kind: scatter or box
    #[arg(value_enum)]
    kind: CliKind,

    /// Path to a local CSV file
    #[arg(long, conflicts_with = "url")]
    input: Option<String>,

    /// URL of a remote CSV (published spreadsheet links are normalized)
    #[arg(long)]
    url: Option<String>,

    /// Form-style parameters, e.g. y=score x=age group=region log_y=true
    #[arg(value_name = "KEY=VALUE")]
    params: Vec<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliKind {
    Scatter,
    Box,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let reference = match (&args.input, &args.url) {
        (Some(path), None) => DatasetReference::local_file(path),
        (None, Some(url)) => DatasetReference::remote_csv(url),
        _ => bail!("exactly one of --input or --url is required"),
    };

    let kind = match args.kind {
        CliKind::Scatter => PlotKind::Scatter,
        CliKind::Box => PlotKind::Box,
    };

    let mut params = HashMap::new();
    for pair in &args.params {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("parameter '{}' is not KEY=VALUE", pair);
        };
        params.insert(key.to_string(), value.to_string());
    }

    // Drive the same pipeline the web layer uses: session in, spec out.
    let mut session = MemorySessionStore::new();
    set_active_reference(&mut session, &reference);

    let (dataset, catalog) =
        resolve_active_dataset(&session).context("Failed to load dataset")?;

    if params.is_empty() {
        params = default_params(&catalog, kind);
    }

    let request = build_request(&params, &catalog, kind)
        .context("Invalid plot parameters for this dataset")?;
    let built = mobiplot::build(&dataset, &catalog, &request)
        .context("Failed to build plot")?;

    for warning in &built.warnings {
        eprintln!("warning: {}", warning);
    }

    let json = serde_json::to_string_pretty(&built.spec)
        .context("Failed to serialize plot spec")?;
    println!("{}", json);

    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use log::info;
use serde::Serialize;

use tree_export_cli::{ExportError, ModelDoc, export_partition, export_volume};

/// Export a saved 2D model document to spatial-tree form.
#[derive(Debug, Parser)]
#[command(version, about)]
#[command(group(
    ArgGroup::new("output").required(true).multiple(true).args(["partition", "volume"])
))]
struct Args {
    /// Model document (JSON) to export.
    model: PathBuf,

    /// Write the partition tree export to this path.
    #[arg(long, value_name = "PATH")]
    partition: Option<PathBuf>,

    /// Write the volume hierarchy export to this path.
    #[arg(long, value_name = "PATH")]
    volume: Option<PathBuf>,

    /// Pretty-print the output documents.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("export failed: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ExportError> {
    let text = fs::read_to_string(&args.model).map_err(|source| ExportError::Io {
        path: args.model.clone(),
        source,
    })?;
    let model: ModelDoc = serde_json::from_str(&text)?;

    if let Some(path) = &args.partition {
        let doc = export_partition(&model)?;
        write_json(path, &doc, args.pretty)?;
        info!("partition tree written to {}", path.display());
    }
    if let Some(path) = &args.volume {
        let tree = export_volume(&model)?;
        write_json(path, &tree, args.pretty)?;
        info!("volume hierarchy written to {}", path.display());
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), ExportError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

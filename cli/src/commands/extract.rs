use crate::inputs::expand_inputs;
use anyhow::{Result, bail};
use clap::Args;
use opuspak::process::{ExtractOptions, extract_batch};
use opuspak::{ExtractMode, OutputLayout};
use std::path::PathBuf;

#[derive(Args)]
pub struct ExtractArgs {
    /// Archive files or folders to extract. Supports globbing (*.opuspak)
    #[arg(required = true, value_name = "FILE/FOLDER")]
    paths: Vec<String>,
    /// Folder to output to (created if missing)
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Put all the files in a single output folder (default: one folder per archive)
    #[arg(short, long, alias = "singlefolder")]
    single_folder: bool,
    /// Extract the Ogg Opus stream from each WEM instead of the WEM itself
    #[arg(long)]
    opus: bool,
    /// File name pattern, e.g. {file_name}_{total_index}_{index}.wem
    #[arg(short, long)]
    pattern: Option<String>,
    /// Write a JSON manifest of the extracted streams next to them
    #[arg(long)]
    manifest: bool,
}

pub fn handle(args: ExtractArgs) -> Result<()> {
    let inputs = expand_inputs(&args.paths)?;
    if inputs.is_empty() {
        bail!("No input files found");
    }

    let options = ExtractOptions {
        layout: OutputLayout {
            out_dir: args.out,
            single_folder: args.single_folder,
        },
        mode: if args.opus {
            ExtractMode::Opus
        } else {
            ExtractMode::Wem
        },
        pattern: args.pattern,
        manifest: args.manifest,
    };

    let report = extract_batch(&inputs, &options)?;
    for (input, err) in &report.failures {
        eprintln!("ERROR {:?}: {}", input, err);
    }

    println!(
        "Extracted {} streams from {} archives",
        report.stream_count(),
        report.archives.len()
    );

    if !report.failures.is_empty() {
        bail!(
            "{} of {} archives failed",
            report.failures.len(),
            inputs.len()
        );
    }
    Ok(())
}

use crate::inputs::expand_inputs;
use anyhow::{Result, bail};
use clap::Args;
use opuspak::process::scan_file;
use rayon::prelude::*;

#[derive(Args)]
pub struct ScanArgs {
    /// Archive files or folders to scan. Supports globbing (*.opuspak)
    #[arg(required = true, value_name = "FILE/FOLDER")]
    paths: Vec<String>,
    /// Also print each container's fmt header
    #[arg(long)]
    headers: bool,
}

pub fn handle(args: ScanArgs) -> Result<()> {
    let inputs = expand_inputs(&args.paths)?;
    if inputs.is_empty() {
        bail!("No input files found");
    }

    let results: Vec<_> = inputs.par_iter().map(|input| scan_file(input)).collect();

    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(streams) => {
                println!("{} ({} streams)", input.display(), streams.len());
                for (i, stream) in streams.iter().enumerate() {
                    println!(
                        "  {:>4}: container {:#010x}  data {:#010x}  end {:#010x}  {} pages",
                        i,
                        stream.boundary.container_start,
                        stream.boundary.payload_start,
                        stream.payload_end,
                        stream.pages
                    );
                    if args.headers {
                        for line in stream.header.to_string().lines() {
                            println!("        {}", line);
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("ERROR {:?}: {}", input, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} archives failed", failures, inputs.len());
    }
    Ok(())
}

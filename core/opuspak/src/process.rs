use crate::error::{OpuspakError, Result};
use crate::extract::{ExtractMode, SubStreamRange, copy_range, sub_stream_ranges};
use crate::output::{FileNamer, IndexCounter, OutputLayout};
use crate::scanner::{ScannedStream, SubStreamScanner};
use crate::types::SubStreamBoundary;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub layout: OutputLayout,
    pub mode: ExtractMode,
    /// File name pattern, see [`crate::output::format_pattern`].
    pub pattern: Option<String>,
    /// Also write `<stem>.json` describing every extracted stream.
    pub manifest: bool,
}

#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub archives: Vec<ArchiveReport>,
    pub failures: Vec<(PathBuf, OpuspakError)>,
}

impl BatchReport {
    pub fn stream_count(&self) -> usize {
        self.archives.iter().map(|a| a.files.len()).sum()
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ArchiveManifest {
    pub source: String,
    pub mode: ExtractMode,
    pub streams: Vec<ManifestEntry>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ManifestEntry {
    pub index: usize,
    pub total_index: usize,
    #[serde(flatten)]
    pub boundary: SubStreamBoundary,
    pub start: u64,
    pub end: Option<u64>,
    pub file: String,
}

/// Scans an archive on disk, keeping the parsed container headers.
pub fn scan_file(input: &Path) -> Result<Vec<ScannedStream>> {
    let file = fs::File::open(input)?;
    SubStreamScanner::new(BufReader::new(file)).scan_headers()
}

/// Scans an archive on disk for stream boundaries.
pub fn scan_boundaries(input: &Path) -> Result<Vec<SubStreamBoundary>> {
    let file = fs::File::open(input)?;
    SubStreamScanner::new(BufReader::new(file)).scan()
}

/// Extracts one archive. `counter` supplies the running index used by
/// single-folder names and `{total_index}`.
pub fn extract_archive(
    input: &Path,
    options: &ExtractOptions,
    counter: &mut IndexCounter,
) -> Result<ArchiveReport> {
    let namer = FileNamer::new(
        options.pattern.clone(),
        options.mode,
        options.layout.single_folder,
    )?;
    let boundaries = scan_boundaries(input)?;
    let base_total_index = counter.reserve(boundaries.len());
    let job = ExtractJob::plan(input, boundaries, options, &namer, base_total_index)?;
    write_streams(&job, options)
}

/// Extracts many archives. Scanning and writing run in parallel, one file
/// handle per archive; total indices follow input order. Archives whose
/// output paths overlap another archive's are written one at a time, in
/// input order, after the rest. Archives that fail are collected in the
/// report and do not stop the batch.
pub fn extract_batch(inputs: &[PathBuf], options: &ExtractOptions) -> Result<BatchReport> {
    let namer = FileNamer::new(
        options.pattern.clone(),
        options.mode,
        options.layout.single_folder,
    )?;

    let scanned: Vec<Result<Vec<SubStreamBoundary>>> =
        inputs.par_iter().map(|input| scan_boundaries(input)).collect();

    let mut report = BatchReport::default();
    let mut counter = IndexCounter::default();
    let mut jobs = Vec::new();
    for (input, result) in inputs.iter().zip(scanned) {
        let planned = result.and_then(|boundaries| {
            let base_total_index = counter.reserve(boundaries.len());
            ExtractJob::plan(input, boundaries, options, &namer, base_total_index)
        });
        match planned {
            Ok(job) => jobs.push(job),
            Err(e) => {
                warn!("Skipping {:?}: {}", input, e);
                report.failures.push((input.clone(), e));
            }
        }
    }

    let mut owners: HashMap<&Path, usize> = HashMap::new();
    for job in &jobs {
        for path in job.output_paths() {
            *owners.entry(path).or_default() += 1;
        }
    }
    let shared: Vec<bool> = jobs
        .iter()
        .map(|job| job.output_paths().any(|path| owners[path] > 1))
        .collect();

    let mut results: Vec<Option<Result<ArchiveReport>>> = jobs
        .par_iter()
        .zip(shared.par_iter())
        .map(|(job, &shared)| (!shared).then(|| write_streams(job, options)))
        .collect();

    for ((job, &shared), result) in jobs.iter().zip(&shared).zip(results.iter_mut()) {
        if shared {
            debug!("{:?} shares output paths with another archive", job.input);
            *result = Some(write_streams(job, options));
        }
    }

    for (job, result) in jobs.iter().zip(results) {
        match result {
            Some(Ok(archive)) => {
                println!(
                    "Extracted {} streams from {:?} to {:?}",
                    archive.files.len(),
                    archive.input,
                    archive.output_dir
                );
                report.archives.push(archive);
            }
            Some(Err(e)) => {
                warn!("Failed to extract {:?}: {}", job.input, e);
                report.failures.push((job.input.to_path_buf(), e));
            }
            None => {}
        }
    }

    Ok(report)
}

/// One archive's scan result with every output path decided up front.
struct ExtractJob<'a> {
    input: &'a Path,
    boundaries: Vec<SubStreamBoundary>,
    ranges: Vec<SubStreamRange>,
    base_total_index: usize,
    out_dir: PathBuf,
    file_names: Vec<String>,
    files: Vec<PathBuf>,
    manifest_path: Option<PathBuf>,
}

impl<'a> ExtractJob<'a> {
    fn plan(
        input: &'a Path,
        boundaries: Vec<SubStreamBoundary>,
        options: &ExtractOptions,
        namer: &FileNamer,
        base_total_index: usize,
    ) -> Result<Self> {
        let out_dir = options.layout.target_dir(input);
        let stem = input
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        let ranges = sub_stream_ranges(&boundaries, options.mode);
        let file_names = ranges
            .iter()
            .map(|range| namer.file_name(&stem, range.index, base_total_index + range.index))
            .collect::<Result<Vec<_>>>()?;
        let files = file_names.iter().map(|name| out_dir.join(name)).collect();
        let manifest_path = options
            .manifest
            .then(|| out_dir.join(format!("{}.json", stem)));

        Ok(ExtractJob {
            input,
            boundaries,
            ranges,
            base_total_index,
            out_dir,
            file_names,
            files,
            manifest_path,
        })
    }

    fn output_paths(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .chain(self.manifest_path.iter())
            .map(PathBuf::as_path)
    }
}

fn write_streams(job: &ExtractJob, options: &ExtractOptions) -> Result<ArchiveReport> {
    fs::create_dir_all(&job.out_dir)?;
    let mut reader = BufReader::new(fs::File::open(job.input)?);

    let mut entries = Vec::with_capacity(job.ranges.len());
    for ((range, file_name), out_path) in job.ranges.iter().zip(&job.file_names).zip(&job.files) {
        let mut writer = BufWriter::new(fs::File::create(out_path)?);
        let written = copy_range(&mut reader, range, &mut writer)?;
        writer.flush()?;
        debug!(
            "Wrote {} bytes from {:#x} to {:?}",
            written, range.start, out_path
        );

        entries.push(manifest_entry(
            range,
            job.boundaries[range.index],
            job.base_total_index + range.index,
            file_name.clone(),
        ));
    }

    if let Some(manifest_path) = &job.manifest_path {
        let manifest = ArchiveManifest {
            source: job.input.to_string_lossy().into_owned(),
            mode: options.mode,
            streams: entries,
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(manifest_path, json)?;
    }

    Ok(ArchiveReport {
        input: job.input.to_path_buf(),
        output_dir: job.out_dir.clone(),
        files: job.files.clone(),
    })
}

fn manifest_entry(
    range: &SubStreamRange,
    boundary: SubStreamBoundary,
    total_index: usize,
    file: String,
) -> ManifestEntry {
    ManifestEntry {
        index: range.index,
        total_index,
        boundary,
        start: range.start,
        end: range.end,
        file,
    }
}

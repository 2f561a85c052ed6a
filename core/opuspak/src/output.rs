//! Output directory layout and file naming for extracted streams.

use crate::error::{OpuspakError, Result};
use crate::extract::ExtractMode;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct OutputLayout {
    pub out_dir: Option<PathBuf>,
    /// Put every archive's streams in one folder instead of one folder per archive.
    pub single_folder: bool,
}

impl OutputLayout {
    pub fn target_dir(&self, input: &Path) -> PathBuf {
        let parent = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };

        if self.single_folder {
            match &self.out_dir {
                Some(dir) => dir.clone(),
                None => parent.join("out"),
            }
        } else {
            parent.join(input.file_stem().unwrap_or_default())
        }
    }
}

/// Running stream count across a batch of archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexCounter {
    next: usize,
}

impl IndexCounter {
    /// Reserves `count` consecutive indices, returning the first.
    pub fn reserve(&mut self, count: usize) -> usize {
        let base = self.next;
        self.next += count;
        base
    }

    pub fn total(&self) -> usize {
        self.next
    }
}

#[derive(Debug, Clone)]
pub struct FileNamer {
    pattern: Option<String>,
    mode: ExtractMode,
    single_folder: bool,
}

impl FileNamer {
    /// Fails early if `pattern` is malformed.
    pub fn new(pattern: Option<String>, mode: ExtractMode, single_folder: bool) -> Result<Self> {
        if let Some(pattern) = &pattern {
            format_pattern(pattern, "", 0, 0)?;
        }
        Ok(FileNamer {
            pattern,
            mode,
            single_folder,
        })
    }

    pub fn file_name(&self, file_stem: &str, index: usize, total_index: usize) -> Result<String> {
        match &self.pattern {
            Some(pattern) => format_pattern(pattern, file_stem, index, total_index),
            None => {
                let number = if self.single_folder { total_index } else { index };
                Ok(format!("{}.{}", number, self.mode.extension()))
            }
        }
    }
}

/// Expands `{file_name}`, `{index}` and `{total_index}` in `pattern`.
///
/// A field may carry a width, `{index:4}` pads with spaces and `{index:04}`
/// with zeros. `{{` and `}}` are literal braces.
pub fn format_pattern(
    pattern: &str,
    file_stem: &str,
    index: usize,
    total_index: usize,
) -> Result<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => {
                            return Err(OpuspakError::InvalidPattern(format!(
                                "unclosed '{{' in {:?}",
                                pattern
                            )));
                        }
                    }
                }
                format_field(&mut out, &field, file_stem, index, total_index)?;
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(OpuspakError::InvalidPattern(format!(
                    "unmatched '}}' in {:?}",
                    pattern
                )));
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn format_field(
    out: &mut String,
    field: &str,
    file_stem: &str,
    index: usize,
    total_index: usize,
) -> Result<()> {
    let (name, spec) = match field.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (field, None),
    };

    let (zero_pad, width) = match spec {
        None | Some("") => (false, 0),
        Some(spec) => {
            let width = spec
                .parse::<usize>()
                .map_err(|_| OpuspakError::InvalidPattern(format!("bad width {:?}", spec)))?;
            (spec.starts_with('0'), width)
        }
    };

    match name {
        "file_name" => out.push_str(&format!("{:<width$}", file_stem, width = width)),
        "index" | "total_index" => {
            let value = if name == "index" { index } else { total_index };
            if zero_pad {
                out.push_str(&format!("{:0width$}", value, width = width));
            } else {
                out.push_str(&format!("{:>width$}", value, width = width));
            }
        }
        _ => {
            return Err(OpuspakError::InvalidPattern(format!(
                "unknown field {{{}}}",
                name
            )));
        }
    }
    Ok(())
}

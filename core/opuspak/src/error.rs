use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpuspakError>;

#[derive(Error, Debug)]
pub enum OpuspakError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Not a RIFF/WAVE container at offset {offset:#x}: {reason}")]
    NotRiffContainer { offset: u64, reason: &'static str },
    #[error("OggS page not found at offset {offset:#x}")]
    NotOggPage { offset: u64 },
    #[error("Not an opuspak file")]
    NotOpuspakContainer,
    #[error("Unsupported codec at offset {offset:#x} (format tag {format_tag:#06x})")]
    UnsupportedCodec { offset: u64, format_tag: u16 },
    #[error("Invalid file name pattern: {0}")]
    InvalidPattern(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpuspakError {
    /// Maps a short read to `NotRiffContainer`, leaving other I/O failures intact.
    pub(crate) fn riff_read(offset: u64, reason: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |e| match e.kind() {
            io::ErrorKind::UnexpectedEof => OpuspakError::NotRiffContainer { offset, reason },
            _ => OpuspakError::Io(e),
        }
    }

    /// Maps a short read to `NotOggPage`, leaving other I/O failures intact.
    pub(crate) fn ogg_read(offset: u64) -> impl FnOnce(io::Error) -> Self {
        move |e| match e.kind() {
            io::ErrorKind::UnexpectedEof => OpuspakError::NotOggPage { offset },
            _ => OpuspakError::Io(e),
        }
    }
}

//! opuspak library for pulling WEM / Ogg Opus streams out of `.opuspak` archives.

pub mod error;
pub mod extract;
pub mod ogg;
pub mod output;
pub mod process;
pub mod riff;
pub mod scanner;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{OpuspakError, Result};
pub use extract::{ExtractMode, SubStreamRange, copy_range, sub_stream_ranges};
pub use ogg::read_page_header;
pub use output::{FileNamer, IndexCounter, OutputLayout};
pub use riff::read_container_header;
pub use scanner::{ScannedStream, SubStreamScanner, scan};
pub use types::*;

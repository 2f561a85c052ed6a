//! Boundary discovery for concatenated WEM streams.
//!
//! An opuspak carries no index. Each WEM's `data` chunk is a run of Ogg
//! pages, and the first position that does not parse as an Ogg page is
//! where the next `RIFF` header starts (or where the archive ends).

use crate::error::{OpuspakError, Result};
use crate::ogg::read_page_header;
use crate::riff::read_container_header;
use crate::types::{Codec, ContainerHeader, SubStreamBoundary};
use std::io::{Read, Seek};
use tracing::debug;

/// One embedded stream found by the scanner.
#[derive(Debug, Clone)]
pub struct ScannedStream {
    pub boundary: SubStreamBoundary,
    pub header: ContainerHeader,
    /// Number of Ogg pages walked in the payload.
    pub pages: usize,
    /// Offset where the page walk stopped.
    pub payload_end: u64,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    ContainerHeader { offset: u64 },
    OggPages { cursor: u64 },
    Done,
}

pub struct SubStreamScanner<R> {
    reader: R,
}

impl<R: Read + Seek> SubStreamScanner<R> {
    pub fn new(reader: R) -> Self {
        SubStreamScanner { reader }
    }

    /// Returns the boundaries of every embedded stream, in archive order.
    pub fn scan(&mut self) -> Result<Vec<SubStreamBoundary>> {
        Ok(self
            .scan_headers()?
            .into_iter()
            .map(|stream| stream.boundary)
            .collect())
    }

    /// Like [`scan`](Self::scan), keeping the parsed headers and page counts.
    pub fn scan_headers(&mut self) -> Result<Vec<ScannedStream>> {
        let mut streams: Vec<ScannedStream> = Vec::new();
        let mut state = ScanState::ContainerHeader { offset: 0 };

        loop {
            state = match state {
                ScanState::ContainerHeader { offset } => {
                    match read_container_header(&mut self.reader, offset) {
                        Ok(header) => {
                            if header.codec != Codec::OpusCpr {
                                return Err(OpuspakError::UnsupportedCodec {
                                    offset,
                                    format_tag: header.format_tag,
                                });
                            }
                            debug!("Found container at {:#x}\n{}", offset, header);
                            debug!("Found data at offset {:#x}", header.data_offset);

                            let payload_start = header.data_offset;
                            streams.push(ScannedStream {
                                boundary: SubStreamBoundary {
                                    container_start: offset,
                                    payload_start,
                                },
                                header,
                                pages: 0,
                                payload_end: payload_start,
                            });
                            ScanState::OggPages {
                                cursor: payload_start,
                            }
                        }
                        Err(OpuspakError::NotRiffContainer { reason, .. }) if streams.is_empty() => {
                            debug!("No container at start of input: {}", reason);
                            return Err(OpuspakError::NotOpuspakContainer);
                        }
                        Err(OpuspakError::NotRiffContainer { reason, .. }) => {
                            debug!("End of archive at {:#x}: {}", offset, reason);
                            ScanState::Done
                        }
                        Err(e) => return Err(e),
                    }
                }
                ScanState::OggPages { cursor } => match read_page_header(&mut self.reader, cursor) {
                    Ok(page) => {
                        let next = cursor + page.total_size();
                        if let Some(stream) = streams.last_mut() {
                            stream.pages += 1;
                            stream.payload_end = next;
                        }
                        ScanState::OggPages { cursor: next }
                    }
                    Err(OpuspakError::NotOggPage { .. }) => {
                        ScanState::ContainerHeader { offset: cursor }
                    }
                    Err(e) => return Err(e),
                },
                ScanState::Done => return Ok(streams),
            };
        }
    }
}

/// Scans `reader` from offset 0 for embedded stream boundaries.
pub fn scan<R: Read + Seek>(reader: R) -> Result<Vec<SubStreamBoundary>> {
    SubStreamScanner::new(reader).scan()
}

use crate::error::Result;
use crate::types::SubStreamBoundary;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Seek, SeekFrom, Write};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Whole WEM, RIFF header included.
    #[default]
    Wem,
    /// The bare Ogg/Opus stream from the `data` chunk.
    Opus,
}

impl ExtractMode {
    pub fn extension(&self) -> &'static str {
        match self {
            ExtractMode::Wem => "wem",
            ExtractMode::Opus => "ogg",
        }
    }
}

/// Byte range of one stream. `end` is `None` for the last stream, which runs to end of file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubStreamRange {
    pub index: usize,
    pub start: u64,
    pub end: Option<u64>,
}

impl SubStreamRange {
    /// Length in bytes, if bounded.
    pub fn size(&self) -> Option<u64> {
        self.end.map(|end| end.saturating_sub(self.start))
    }
}

pub fn sub_stream_ranges(boundaries: &[SubStreamBoundary], mode: ExtractMode) -> Vec<SubStreamRange> {
    boundaries
        .iter()
        .enumerate()
        .map(|(index, boundary)| SubStreamRange {
            index,
            start: match mode {
                ExtractMode::Wem => boundary.container_start,
                ExtractMode::Opus => boundary.payload_start,
            },
            end: boundaries.get(index + 1).map(|next| next.container_start),
        })
        .collect()
}

/// Copies `range` from `reader` into `writer`, returning the bytes written.
pub fn copy_range<R: Read + Seek, W: Write>(
    reader: &mut R,
    range: &SubStreamRange,
    writer: &mut W,
) -> Result<u64> {
    reader.seek(SeekFrom::Start(range.start))?;
    let written = match range.size() {
        Some(len) => io::copy(&mut reader.by_ref().take(len), writer)?,
        None => io::copy(reader, writer)?,
    };
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use crate::test_support::{WemBuilder, ogg_page};
    use std::io::Cursor;

    #[test]
    fn test_ranges_wem_and_opus() {
        let boundaries = vec![
            SubStreamBoundary {
                container_start: 0,
                payload_start: 52,
            },
            SubStreamBoundary {
                container_start: 300,
                payload_start: 352,
            },
        ];

        let wem = sub_stream_ranges(&boundaries, ExtractMode::Wem);
        assert_eq!(
            wem,
            vec![
                SubStreamRange {
                    index: 0,
                    start: 0,
                    end: Some(300)
                },
                SubStreamRange {
                    index: 1,
                    start: 300,
                    end: None
                },
            ]
        );

        let opus = sub_stream_ranges(&boundaries, ExtractMode::Opus);
        assert_eq!(opus[0].start, 52);
        assert_eq!(opus[0].size(), Some(248));
        assert_eq!(opus[1].start, 352);
        assert_eq!(opus[1].size(), None);
    }

    #[test]
    fn test_extracted_payloads_match_input() {
        let pages = [
            vec![ogg_page(&[255, 3]), ogg_page(&[20])],
            vec![],
            vec![ogg_page(&[1])],
        ];
        let mut data = Vec::new();
        let mut wems = Vec::new();
        for stream_pages in &pages {
            let wem = stream_pages
                .iter()
                .fold(WemBuilder::new(), |builder, page| builder.page(page.clone()))
                .build();
            data.extend_from_slice(&wem);
            wems.push(wem);
        }

        let boundaries = scan(Cursor::new(data.clone())).unwrap();
        assert_eq!(boundaries.len(), 3);

        let mut reader = Cursor::new(data);
        for range in sub_stream_ranges(&boundaries, ExtractMode::Opus) {
            let mut out = Vec::new();
            copy_range(&mut reader, &range, &mut out).unwrap();
            assert_eq!(out, pages[range.index].concat());
        }
        for range in sub_stream_ranges(&boundaries, ExtractMode::Wem) {
            let mut out = Vec::new();
            let written = copy_range(&mut reader, &range, &mut out).unwrap();
            assert_eq!(written, wems[range.index].len() as u64);
            assert_eq!(out, wems[range.index]);
        }
    }
}

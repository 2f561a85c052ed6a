use crate::error::{OpuspakError, Result};
use crate::types::{OGG_FIXED_HEADER_SIZE, OGG_MAGIC, OggPageHeader};
use crate::utils::BinReadExt;
use std::io::{Read, Seek, SeekFrom};

/// Offset of the page_segments byte inside an Ogg page header.
const PAGE_SEGMENTS_OFFSET: usize = 26;

/// Parses the Ogg page header at `offset`.
///
/// The fixed 27-byte header is read in one go; only the capture pattern and
/// the segment count are looked at. Version, flags, granule position, serial,
/// sequence number and CRC are skipped unchecked.
pub fn read_page_header<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<OggPageHeader> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut fixed = [0u8; OGG_FIXED_HEADER_SIZE as usize];
    let filled = reader.read_available(&mut fixed)?;
    if filled < fixed.len() || &fixed[0..4] != OGG_MAGIC {
        return Err(OpuspakError::NotOggPage { offset });
    }
    let page_segments = fixed[PAGE_SEGMENTS_OFFSET];

    let mut segment_table = vec![0u8; page_segments as usize];
    reader
        .read_exact(&mut segment_table)
        .map_err(OpuspakError::ogg_read(offset))?;

    let page_size: u32 = segment_table.iter().map(|&lacing| lacing as u32).sum();

    Ok(OggPageHeader {
        offset,
        page_segments,
        segment_table,
        page_size,
        header_size: OGG_FIXED_HEADER_SIZE + page_segments as u32,
    })
}

//! RIFF/WAVE header reader for the WEM containers embedded in an opuspak.

use crate::error::{OpuspakError, Result};
use crate::types::*;
use crate::utils::BinReadExt;
use byteorder::{ByteOrder, LE};
use std::io::{Read, Seek, SeekFrom};
use tracing::trace;

/// Size of the fixed WAVEFORMATEX part of the fmt chunk.
const FMT_FIXED_SIZE: usize = 18;
/// Fixed part plus 2 reserved bytes and the 4-byte channel mask.
const FMT_WITH_MASK_SIZE: usize = 24;

/// Parses the container header starting at `offset`.
///
/// The chunk walk stops at the first `data` chunk; chunks after it are
/// never looked at. The RIFF size field is ignored since archives routinely
/// carry payloads larger than it declares.
pub fn read_container_header<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
) -> Result<ContainerHeader> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut riff_header = [0u8; 12];
    let filled = reader.read_available(&mut riff_header)?;
    if filled < 4 || &riff_header[0..4] != RIFF_MAGIC {
        return Err(OpuspakError::NotRiffContainer {
            offset,
            reason: "RIFF magic not found",
        });
    }
    if filled < riff_header.len() {
        return Err(OpuspakError::NotRiffContainer {
            offset,
            reason: "truncated RIFF header",
        });
    }
    // riff_header[4..8] is the RIFF size, unused
    if &riff_header[8..12] != WAVE_MAGIC {
        return Err(OpuspakError::NotRiffContainer {
            offset,
            reason: "WAVE magic not found",
        });
    }

    let mut fmt_chunk: Option<(u64, u32)> = None;
    let mut data_chunk: Option<(u64, u32)> = None;
    let mut chunk_offset = offset + 0xC;

    loop {
        reader.seek(SeekFrom::Start(chunk_offset))?;
        let mut chunk_header = [0u8; 8];
        if reader.read_available(&mut chunk_header)? < chunk_header.len() {
            // Stream ended inside the chunk list
            break;
        }

        let chunk_size = LE::read_u32(&chunk_header[4..8]);
        let body_offset = chunk_offset + 8;
        trace!(
            "chunk {:?} at {:#x}, {} bytes",
            String::from_utf8_lossy(&chunk_header[0..4]),
            chunk_offset,
            chunk_size
        );

        match &chunk_header[0..4] {
            tag if tag == FMT_CHUNK => {
                if fmt_chunk.is_none() {
                    fmt_chunk = Some((body_offset, chunk_size));
                }
            }
            tag if tag == DATA_CHUNK => {
                data_chunk = Some((body_offset, chunk_size));
                break;
            }
            _ => {}
        }

        chunk_offset = body_offset + chunk_size as u64;
    }

    let (fmt_offset, fmt_size) = fmt_chunk.ok_or(OpuspakError::NotRiffContainer {
        offset,
        reason: "fmt chunk not found",
    })?;
    let (data_offset, data_size) = data_chunk.ok_or(OpuspakError::NotRiffContainer {
        offset,
        reason: "data chunk not found",
    })?;

    let has_channel_mask = fmt_size as usize >= FMT_WITH_MASK_SIZE;
    let fmt_len = if has_channel_mask {
        FMT_WITH_MASK_SIZE
    } else {
        FMT_FIXED_SIZE
    };

    reader.seek(SeekFrom::Start(fmt_offset))?;
    let mut fmt = [0u8; FMT_WITH_MASK_SIZE];
    reader
        .read_exact(&mut fmt[..fmt_len])
        .map_err(OpuspakError::riff_read(offset, "truncated fmt chunk"))?;

    let format_tag = LE::read_u16(&fmt[0..2]);
    let channels = LE::read_u16(&fmt[2..4]);
    let channel_layout = has_channel_mask.then(|| LE::read_u32(&fmt[20..24]));

    Ok(ContainerHeader {
        offset,
        fmt_offset,
        fmt_size,
        data_offset,
        data_size,
        format_tag,
        codec: Codec::from_format_tag(format_tag),
        channels,
        sample_rate: LE::read_u32(&fmt[4..8]),
        average_bytes_per_second: LE::read_u32(&fmt[8..12]),
        block_align: LE::read_u16(&fmt[12..14]),
        bits_per_sample: LE::read_u16(&fmt[14..16]),
        extra_size: LE::read_u16(&fmt[16..18]),
        channel_layout,
        channel_config: channel_layout.and_then(|mask| ChannelConfig::from_mask(mask, channels)),
    })
}

use serde::{Deserialize, Serialize};
use std::fmt;

pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WAVE_MAGIC: &[u8; 4] = b"WAVE";
pub const FMT_CHUNK: &[u8; 4] = b"fmt ";
pub const DATA_CHUNK: &[u8; 4] = b"data";
pub const OGG_MAGIC: &[u8; 4] = b"OggS";

/// Format tag Wwise uses for its own Vorbis packing.
pub const VORBIS_FORMAT_TAG: u16 = 0xFFFF;

/// Fixed part of an Ogg page header, before the segment table.
pub const OGG_FIXED_HEADER_SIZE: u32 = 27;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Vorbis,
    OpusCpr,
}

impl Codec {
    pub fn from_format_tag(format_tag: u16) -> Self {
        if format_tag == VORBIS_FORMAT_TAG {
            Codec::Vorbis
        } else {
            Codec::OpusCpr
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Vorbis => write!(f, "VORBIS"),
            Codec::OpusCpr => write!(f, "OPUSCPR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub channel_type: u8,
    pub layout: u32,
}

impl ChannelConfig {
    /// Decodes a Wwise channel mask. The low byte repeats the channel count;
    /// anything else means the mask is absent or misaligned.
    pub fn from_mask(mask: u32, channels: u16) -> Option<Self> {
        if (mask & 0xFF) != channels as u32 {
            return None;
        }
        Some(ChannelConfig {
            channel_type: ((mask >> 8) & 0x0F) as u8,
            layout: mask >> 12,
        })
    }
}

/// RIFF/WAVE header of one embedded WEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub offset: u64,
    pub fmt_offset: u64,
    pub fmt_size: u32,
    pub data_offset: u64,
    pub data_size: u32,

    pub format_tag: u16,
    pub codec: Codec,
    pub channels: u16,
    pub sample_rate: u32,
    pub average_bytes_per_second: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub extra_size: u16,

    /// Raw channel mask, when the fmt chunk is long enough to hold one.
    pub channel_layout: Option<u32>,
    pub channel_config: Option<ChannelConfig>,
}

impl fmt::Display for ContainerHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Codec: {} (Format: {:#x})",
            self.codec, self.format_tag
        )?;
        writeln!(f, "Channels: {}", self.channels)?;
        writeln!(f, "Sample Rate: {}", self.sample_rate)?;
        writeln!(f, "Average BPS: {}", self.average_bytes_per_second)?;
        writeln!(f, "Block Align: {}", self.block_align)?;
        writeln!(f, "Bits per sample: {}", self.bits_per_sample)?;
        write!(f, "Extra size: {}", self.extra_size)?;
        if let Some(config) = &self.channel_config {
            write!(
                f,
                "\nChannel type: {}\nChannel layout: {:#x}",
                config.channel_type, config.layout
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPageHeader {
    pub offset: u64,
    pub page_segments: u8,
    pub segment_table: Vec<u8>,
    /// Sum of the lacing values, i.e. payload bytes after the header.
    pub page_size: u32,
    pub header_size: u32,
}

impl OggPageHeader {
    pub fn total_size(&self) -> u64 {
        self.header_size as u64 + self.page_size as u64
    }
}

/// Where an embedded container starts, and where its `data` payload starts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubStreamBoundary {
    pub container_start: u64,
    pub payload_start: u64,
}

//! Byte-level fixture builders shared by the unit tests.

use byteorder::{LE, WriteBytesExt};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

pub(crate) const OPUS_FORMAT_TAG: u16 = 0x3041;

/// One Ogg page with the given lacing values and a filler payload.
pub(crate) fn ogg_page(segments: &[u8]) -> Vec<u8> {
    let mut page = Vec::new();
    page.extend_from_slice(b"OggS");
    page.push(0); // version
    page.push(0); // header type
    page.extend_from_slice(&0u64.to_le_bytes()); // granule
    page.extend_from_slice(&0x1234u32.to_le_bytes()); // serial
    page.extend_from_slice(&0u32.to_le_bytes()); // sequence
    page.extend_from_slice(&0u32.to_le_bytes()); // crc
    page.push(segments.len() as u8);
    page.extend_from_slice(segments);

    let payload_len: usize = segments.iter().map(|&s| s as usize).sum();
    page.extend((0..payload_len).map(|i| (i % 97) as u8));
    page
}

pub(crate) struct WemBuilder {
    format_tag: u16,
    channels: u16,
    channel_mask: u32,
    short_fmt: bool,
    chunks: Vec<([u8; 4], Vec<u8>)>,
    payload: Vec<u8>,
}

impl WemBuilder {
    pub(crate) fn new() -> Self {
        WemBuilder {
            format_tag: OPUS_FORMAT_TAG,
            channels: 1,
            channel_mask: 0x4 << 12 | 0x1 << 8 | 0x01,
            short_fmt: false,
            chunks: Vec::new(),
            payload: Vec::new(),
        }
    }

    pub(crate) fn format_tag(mut self, format_tag: u16) -> Self {
        self.format_tag = format_tag;
        self
    }

    pub(crate) fn channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub(crate) fn channel_mask(mut self, mask: u32) -> Self {
        self.channel_mask = mask;
        self
    }

    /// Writes an 18-byte fmt chunk with no channel mask.
    pub(crate) fn short_fmt(mut self) -> Self {
        self.short_fmt = true;
        self
    }

    /// Extra chunk between `fmt ` and `data`.
    pub(crate) fn chunk(mut self, tag: [u8; 4], body: Vec<u8>) -> Self {
        self.chunks.push((tag, body));
        self
    }

    pub(crate) fn page(mut self, page: Vec<u8>) -> Self {
        self.payload.extend(page);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut fmt = Vec::new();
        fmt.write_u16::<LE>(self.format_tag).unwrap();
        fmt.write_u16::<LE>(self.channels).unwrap();
        fmt.write_u32::<LE>(48000).unwrap();
        fmt.write_u32::<LE>(12000).unwrap();
        fmt.write_u16::<LE>(0).unwrap();
        fmt.write_u16::<LE>(0).unwrap();
        if self.short_fmt {
            fmt.write_u16::<LE>(0).unwrap();
        } else {
            fmt.write_u16::<LE>(6).unwrap();
            fmt.write_u16::<LE>(0).unwrap();
            fmt.write_u32::<LE>(self.channel_mask).unwrap();
        }

        let mut body = Vec::new();
        body.write_all(b"WAVE").unwrap();
        write_chunk(&mut body, b"fmt ", &fmt);
        for (tag, chunk) in &self.chunks {
            write_chunk(&mut body, tag, chunk);
        }
        write_chunk(&mut body, b"data", &self.payload);

        let mut out = Vec::new();
        out.write_all(b"RIFF").unwrap();
        // Understated on purpose, as in real archives
        out.write_u32::<LE>(body.len() as u32 / 2).unwrap();
        out.extend(body);
        out
    }
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], body: &[u8]) {
    out.extend_from_slice(tag);
    out.write_u32::<LE>(body.len() as u32).unwrap();
    out.extend_from_slice(body);
}

/// Cursor that counts the calls made on it.
pub(crate) struct CountingReader {
    inner: Cursor<Vec<u8>>,
    pub(crate) reads: usize,
    pub(crate) seeks: usize,
}

impl CountingReader {
    pub(crate) fn new(data: Vec<u8>) -> Self {
        CountingReader {
            inner: Cursor::new(data),
            reads: 0,
            seeks: 0,
        }
    }
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        self.inner.read(buf)
    }
}

impl Seek for CountingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seeks += 1;
        self.inner.seek(pos)
    }
}

use std::io::{self, Read};

/// Extension trait for the short-read aware reads the scanners need
pub trait BinReadExt: Read {
    /// Fill as much of `buf` as the stream still holds, returning the byte count.
    /// Unlike `read_exact`, running out of data is not an error.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read + ?Sized> BinReadExt for R {}

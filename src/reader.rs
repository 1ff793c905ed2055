//! Internal module wrapping the input stream with the read primitives the
//! decoders share: unaligned little-endian scalar reads, plain-old-data
//! record reads, bulk reads with short-read detection, and absolute seeks.

use std::io::{self, Read, Seek, SeekFrom};

use zerocopy::{FromBytes, FromZeros, IntoBytes};

pub(crate) trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

pub(crate) struct ByteReader<'a> {
    inner: &'a mut dyn ReadSeek,
}

impl<'a> ByteReader<'a> {
    pub fn new(inner: &'a mut dyn ReadSeek) -> Self {
        Self { inner }
    }

    pub fn u8(&mut self) -> io::Result<u8> {
        let mut buf = [0_u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn u16_le(&mut self) -> io::Result<u16> {
        let mut buf = [0_u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0_u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads a plain-old-data record laid out exactly as on disk.
    pub fn record<T: FromBytes + IntoBytes + FromZeros>(&mut self) -> io::Result<T> {
        let mut value = T::new_zeroed();
        self.inner.read_exact(value.as_mut_bytes())?;
        Ok(value)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }

    /// Reads up to `buf.len()` bytes, returning how many were actually read.
    ///
    /// Unlike [`Self::read_exact`] a short read is reported, not failed; the
    /// BMP RLE decoder uses this to consume a stream whose length is not
    /// known up front.
    pub fn read_at_most(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    pub fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Seeks relative to the end of the stream. `offset` is a distance back
    /// from the end.
    pub fn seek_from_end(&mut self, offset: i64) -> io::Result<u64> {
        self.inner.seek(SeekFrom::End(-offset))
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn stream_len(&mut self) -> io::Result<u64> {
        let current = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(current))?;
        Ok(end)
    }

    /// Skips exactly `count` bytes. Seeking past the end of the stream is an
    /// `UnexpectedEof` error, so a truncated file cannot be skipped over
    /// silently.
    pub fn skip(&mut self, count: u64) -> io::Result<()> {
        if count == 0 {
            return Ok(());
        }
        if count > i64::MAX as u64 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "seeking past end of file",
            ));
        }

        let current = self.inner.stream_position()?;
        let len = self.stream_len()?;
        let target = current.saturating_add(count);
        if target > len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "seeking past end of file",
            ));
        }

        self.inner.seek(SeekFrom::Start(target))?;
        Ok(())
    }
}

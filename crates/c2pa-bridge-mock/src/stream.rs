//! Engine-side view of a host stream

use c2pa_bridge_ffi::types::{
    FlushCallback, ReadCallback, SeekCallback, SeekMode, StreamContext, WriteCallback,
};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A `Read`/`Write`/`Seek` stream whose operations are host callbacks
pub struct CStream {
    context: *mut StreamContext,
    reader: ReadCallback,
    seeker: SeekCallback,
    writer: WriteCallback,
    flusher: FlushCallback,
}

impl CStream {
    pub fn new(
        context: *mut StreamContext,
        reader: ReadCallback,
        seeker: SeekCallback,
        writer: WriteCallback,
        flusher: FlushCallback,
    ) -> Self {
        Self {
            context,
            reader,
            seeker,
            writer,
            flusher,
        }
    }

    /// Read the whole stream from the start, leaving the cursor at the end
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        self.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

fn callback_error(op: &str, code: isize) -> io::Error {
    let errno = i32::try_from(-code).unwrap_or(5);
    let os = io::Error::from_raw_os_error(errno);
    io::Error::new(os.kind(), format!("stream {op} failed: {os}"))
}

impl Read for CStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = isize::try_from(buf.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "read buffer is too large"))?;
        // SAFETY: the host registered these callbacks with this context
        let n = unsafe { (self.reader)(self.context, buf.as_mut_ptr(), len) };
        usize::try_from(n).map_err(|_| callback_error("read", n))
    }
}

impl Seek for CStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, mode) = match pos {
            SeekFrom::Start(p) => (p as i64, SeekMode::Start),
            SeekFrom::Current(p) => (p, SeekMode::Current),
            SeekFrom::End(p) => (p, SeekMode::End),
        };
        // SAFETY: as for read
        let n = unsafe { (self.seeker)(self.context, offset as isize, mode) };
        u64::try_from(n).map_err(|_| callback_error("seek", n))
    }
}

impl Write for CStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = isize::try_from(buf.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "write buffer is too large"))?;
        // SAFETY: as for read
        let n = unsafe { (self.writer)(self.context, buf.as_ptr(), len) };
        usize::try_from(n).map_err(|_| callback_error("write", n))
    }

    fn flush(&mut self) -> io::Result<()> {
        // SAFETY: as for read
        let n = unsafe { (self.flusher)(self.context) };
        if n < 0 {
            return Err(callback_error("flush", n));
        }
        Ok(())
    }
}

//! Stream bridge
//!
//! Adapts a native `Read`/`Write`/`Seek` stream to the engine's four
//! callback stream contract. The bridge never buffers or copies the asset;
//! each callback forwards exactly one operation to the native stream.
//!
//! Capability is fixed at construction. A read-only bridge registers a write
//! callback that rejects with [`INVALID_ARGUMENT`] without touching the
//! native stream, and a write-only bridge does the same for reads.

use crate::engine::Engine;
use crate::panic_guard::guard_callback;
use crate::types::{
    C2paStream, FlushCallback, INVALID_ARGUMENT, IO_FAILURE, ReadCallback, SeekCallback, SeekMode,
    StreamContext, WriteCallback,
};
use c2pa_bridge_core::{BridgeError, BridgeResult, ErrorKind};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::Arc;

pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek + ?Sized> ReadSeek for T {}

pub trait WriteSeek: Write + Seek {}
impl<T: Write + Seek + ?Sized> WriteSeek for T {}

pub trait ReadWriteSeek: Read + Write + Seek {}
impl<T: Read + Write + Seek + ?Sized> ReadWriteSeek for T {}

/// The native stream behind a bridge, tagged with its capability
pub enum StreamTarget<'a> {
    Input(&'a mut dyn ReadSeek),
    Output(&'a mut dyn WriteSeek),
    InputOutput(&'a mut dyn ReadWriteSeek),
    /// Readable stream owned by the bridge
    OwnedInput(Box<dyn ReadSeek + Send + 'a>),
}

impl StreamTarget<'_> {
    pub fn capabilities(&self) -> StreamCapabilities {
        match self {
            StreamTarget::Input(_) | StreamTarget::OwnedInput(_) => StreamCapabilities {
                read: true,
                write: false,
                seek: true,
            },
            StreamTarget::Output(_) => StreamCapabilities {
                read: false,
                write: true,
                seek: true,
            },
            StreamTarget::InputOutput(_) => StreamCapabilities {
                read: true,
                write: true,
                seek: true,
            },
        }
    }

    fn reader(&mut self) -> Option<&mut dyn Read> {
        match self {
            StreamTarget::Input(r) => Some(&mut **r),
            StreamTarget::OwnedInput(r) => Some(&mut **r),
            StreamTarget::InputOutput(rw) => Some(&mut **rw),
            StreamTarget::Output(_) => None,
        }
    }

    fn writer(&mut self) -> Option<&mut dyn Write> {
        match self {
            StreamTarget::Output(w) => Some(&mut **w),
            StreamTarget::InputOutput(rw) => Some(&mut **rw),
            StreamTarget::Input(_) | StreamTarget::OwnedInput(_) => None,
        }
    }

    fn seeker(&mut self) -> &mut dyn Seek {
        match self {
            StreamTarget::Input(r) => &mut **r,
            StreamTarget::OwnedInput(r) => &mut **r,
            StreamTarget::Output(w) => &mut **w,
            StreamTarget::InputOutput(rw) => &mut **rw,
        }
    }
}

/// Operations a bridge forwards to its native stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamCapabilities {
    pub read: bool,
    pub write: bool,
    pub seek: bool,
}

/// State handed to the engine as the callback context
pub struct BridgeContext<'a> {
    target: StreamTarget<'a>,
    last_error: Option<io::Error>,
    bytes_read: u64,
    bytes_written: u64,
}

impl<'a> BridgeContext<'a> {
    pub fn new(target: StreamTarget<'a>) -> Self {
        Self {
            target,
            last_error: None,
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn last_error(&self) -> Option<&io::Error> {
        self.last_error.as_ref()
    }

    fn fail(&mut self, op: &str, err: io::Error) -> isize {
        tracing::trace!("stream {} failed: {}", op, err);
        self.last_error = Some(err);
        IO_FAILURE
    }

    fn reject(&mut self, op: &str, reason: &str) -> isize {
        tracing::trace!("stream {} rejected: {}", op, reason);
        self.last_error = Some(io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()));
        INVALID_ARGUMENT
    }
}

/// Callback set registered with the engine for a capability
pub struct CallbackTable {
    pub read: ReadCallback,
    pub seek: SeekCallback,
    pub write: WriteCallback,
    pub flush: FlushCallback,
}

impl CallbackTable {
    pub fn for_capabilities(caps: StreamCapabilities) -> Self {
        Self {
            read: if caps.read { read_callback } else { reject_read },
            seek: seek_callback,
            write: if caps.write { write_callback } else { reject_write },
            flush: if caps.write { flush_callback } else { noop_flush },
        }
    }
}

/// An engine stream wired to a native stream for lifetime `'a`
pub struct StreamBridge<'a> {
    raw: NonNull<C2paStream>,
    context: NonNull<BridgeContext<'a>>,
    capabilities: StreamCapabilities,
    engine: Arc<Engine>,
    _target: PhantomData<Box<BridgeContext<'a>>>,
}

impl<'a> StreamBridge<'a> {
    /// Bridge a readable stream
    pub fn reader(engine: &Arc<Engine>, stream: &'a mut dyn ReadSeek) -> BridgeResult<Self> {
        Self::open(engine, StreamTarget::Input(stream))
    }

    /// Bridge a writable stream
    pub fn writer(engine: &Arc<Engine>, stream: &'a mut dyn WriteSeek) -> BridgeResult<Self> {
        Self::open(engine, StreamTarget::Output(stream))
    }

    /// Bridge a stream that is both read and written through one cursor
    pub fn read_write(
        engine: &Arc<Engine>,
        stream: &'a mut dyn ReadWriteSeek,
    ) -> BridgeResult<Self> {
        Self::open(engine, StreamTarget::InputOutput(stream))
    }

    pub fn open(engine: &Arc<Engine>, target: StreamTarget<'a>) -> BridgeResult<Self> {
        let capabilities = target.capabilities();
        let callbacks = CallbackTable::for_capabilities(capabilities);
        let context = NonNull::from(Box::leak(Box::new(BridgeContext::new(target))));
        let context_ptr = context.as_ptr().cast::<StreamContext>();

        let created = engine.invoke_ptr(ErrorKind::Io, |api| {
            // SAFETY: the context stays alive until after c2pa_release_stream
            unsafe {
                (api.create_stream)(
                    context_ptr,
                    callbacks.read,
                    callbacks.seek,
                    callbacks.write,
                    callbacks.flush,
                )
            }
        });

        match created {
            Ok(raw) => {
                tracing::trace!(?capabilities, "created engine stream {:p}", raw.as_ptr());
                Ok(Self {
                    raw,
                    context,
                    capabilities,
                    engine: Arc::clone(engine),
                    _target: PhantomData,
                })
            }
            Err(err) => {
                // SAFETY: the engine refused the stream, so we still own the box
                drop(unsafe { Box::from_raw(context.as_ptr()) });
                Err(err)
            }
        }
    }

    pub fn as_ptr(&self) -> *mut C2paStream {
        self.raw.as_ptr()
    }

    pub fn capabilities(&self) -> StreamCapabilities {
        self.capabilities
    }

    fn context(&self) -> &BridgeContext<'a> {
        // SAFETY: the context is live until drop and callbacks only run
        // during engine calls, which borrow `self` mutably or not at all
        unsafe { self.context.as_ref() }
    }

    pub fn bytes_read(&self) -> u64 {
        self.context().bytes_read()
    }

    pub fn bytes_written(&self) -> u64 {
        self.context().bytes_written()
    }

    /// Take the last native stream error seen by any callback
    pub fn take_last_error(&mut self) -> Option<io::Error> {
        // SAFETY: see `context`; `&mut self` excludes concurrent callbacks
        unsafe { self.context.as_mut() }.last_error.take()
    }

    /// Forget native failures seen so far
    ///
    /// Called before reusing a bridge for another engine call, so a failure
    /// the engine recovered from is not blamed for a later one.
    pub fn clear_last_error(&mut self) {
        self.take_last_error();
    }

    /// Attribute an engine failure to the native stream if it failed
    ///
    /// The resulting error is `Io` and carries both the engine text and the
    /// native error text. Without a recorded native failure the error is
    /// returned unchanged.
    pub fn attribute(&mut self, err: BridgeError) -> BridgeError {
        match self.take_last_error() {
            Some(native) => {
                tracing::warn!("engine failure caused by native stream: {}", native);
                BridgeError::Io(format!("{} (stream error: {})", err.message(), native))
            }
            None => err,
        }
    }
}

impl Drop for StreamBridge<'_> {
    fn drop(&mut self) {
        let raw = self.raw.as_ptr();
        tracing::trace!("releasing engine stream {:p}", raw);
        // SAFETY: we own the stream; after this no callback can run
        self.engine.call(|api| unsafe { (api.release_stream)(raw) });
        // SAFETY: allocated in `open` and released once here
        drop(unsafe { Box::from_raw(self.context.as_ptr()) });
    }
}

/// A bridge that owns its readable stream and may move between threads
pub struct OwnedStreamBridge(StreamBridge<'static>);

impl OwnedStreamBridge {
    pub fn new(engine: &Arc<Engine>, stream: Box<dyn ReadSeek + Send>) -> BridgeResult<Self> {
        StreamBridge::open(engine, StreamTarget::OwnedInput(stream)).map(Self)
    }

    pub fn as_ptr(&self) -> *mut C2paStream {
        self.0.as_ptr()
    }

    pub fn bridge_mut(&mut self) -> &mut StreamBridge<'static> {
        &mut self.0
    }
}

// SAFETY: the only target is an owned `Send` stream, and the engine stream
// handle is not bound to the creating thread.
unsafe impl Send for OwnedStreamBridge {}

// ============================================================================
// Callbacks
// ============================================================================

/// # Safety
///
/// `context` must be null or the pointer registered by [`StreamBridge::open`].
unsafe fn context_mut<'c>(context: *mut StreamContext) -> Option<&'c mut BridgeContext<'static>> {
    // SAFETY: forwarded from the caller
    unsafe { context.cast::<BridgeContext<'static>>().as_mut() }
}

fn seek_from(offset: isize, mode: SeekMode) -> Option<SeekFrom> {
    match mode {
        SeekMode::Start => u64::try_from(offset).ok().map(SeekFrom::Start),
        SeekMode::Current => Some(SeekFrom::Current(offset as i64)),
        SeekMode::End => Some(SeekFrom::End(offset as i64)),
    }
}

/// Read callback registered for readable bridges
///
/// # Safety
///
/// Called by the engine with the registered context and a buffer of `len`
/// writable bytes.
pub unsafe extern "C" fn read_callback(
    context: *mut StreamContext,
    data: *mut u8,
    len: isize,
) -> isize {
    guard_callback("read", IO_FAILURE, || {
        // SAFETY: context registered by `open`
        let Some(ctx) = (unsafe { context_mut(context) }) else {
            return INVALID_ARGUMENT;
        };
        let Ok(len) = usize::try_from(len) else {
            return ctx.reject("read", "negative length");
        };
        if len == 0 {
            return 0;
        }
        if data.is_null() {
            return ctx.reject("read", "null buffer");
        }
        // SAFETY: the engine provides `len` writable bytes at `data`
        let buf = unsafe { std::slice::from_raw_parts_mut(data, len) };
        let Some(reader) = ctx.target.reader() else {
            return ctx.reject("read", "stream is not readable");
        };
        match reader.read(buf) {
            Ok(n) => {
                ctx.bytes_read += n as u64;
                tracing::trace!("stream read {} of {} bytes", n, len);
                n as isize
            }
            Err(e) => ctx.fail("read", e),
        }
    })
}

/// Seek callback registered for every bridge
///
/// Native streams keep no sticky error or EOF state, so a seek after a
/// failure simply repositions. The recorded failure is kept for
/// [`StreamBridge::attribute`].
///
/// # Safety
///
/// Called by the engine with the registered context.
pub unsafe extern "C" fn seek_callback(
    context: *mut StreamContext,
    offset: isize,
    mode: SeekMode,
) -> isize {
    guard_callback("seek", IO_FAILURE, || {
        // SAFETY: context registered by `open`
        let Some(ctx) = (unsafe { context_mut(context) }) else {
            return INVALID_ARGUMENT;
        };
        let Some(pos) = seek_from(offset, mode) else {
            return ctx.reject("seek", "negative absolute offset");
        };
        match ctx.target.seeker().seek(pos) {
            Ok(new_pos) => {
                tracing::trace!("stream seek {:?} -> {}", pos, new_pos);
                isize::try_from(new_pos).unwrap_or(IO_FAILURE)
            }
            Err(e) => ctx.fail("seek", e),
        }
    })
}

/// Write callback registered for writable bridges
///
/// # Safety
///
/// Called by the engine with the registered context and `len` readable
/// bytes at `data`.
pub unsafe extern "C" fn write_callback(
    context: *mut StreamContext,
    data: *const u8,
    len: isize,
) -> isize {
    guard_callback("write", IO_FAILURE, || {
        // SAFETY: context registered by `open`
        let Some(ctx) = (unsafe { context_mut(context) }) else {
            return INVALID_ARGUMENT;
        };
        let Ok(count) = usize::try_from(len) else {
            return ctx.reject("write", "negative length");
        };
        if count == 0 {
            return 0;
        }
        if data.is_null() {
            return ctx.reject("write", "null buffer");
        }
        // SAFETY: the engine provides `count` readable bytes at `data`
        let buf = unsafe { std::slice::from_raw_parts(data, count) };
        let Some(writer) = ctx.target.writer() else {
            return ctx.reject("write", "stream is not writable");
        };
        match writer.write_all(buf) {
            Ok(()) => {
                ctx.bytes_written += count as u64;
                tracing::trace!("stream wrote {} bytes", count);
                len
            }
            Err(e) => ctx.fail("write", e),
        }
    })
}

/// Flush callback registered for writable bridges
///
/// # Safety
///
/// Called by the engine with the registered context.
pub unsafe extern "C" fn flush_callback(context: *mut StreamContext) -> isize {
    guard_callback("flush", IO_FAILURE, || {
        // SAFETY: context registered by `open`
        let Some(ctx) = (unsafe { context_mut(context) }) else {
            return INVALID_ARGUMENT;
        };
        let Some(writer) = ctx.target.writer() else {
            return 0;
        };
        match writer.flush() {
            Ok(()) => 0,
            Err(e) => ctx.fail("flush", e),
        }
    })
}

/// Write callback for read-only bridges
///
/// # Safety
///
/// Never dereferences its arguments.
pub unsafe extern "C" fn reject_write(
    _context: *mut StreamContext,
    _data: *const u8,
    _len: isize,
) -> isize {
    tracing::trace!("write rejected on read-only stream");
    INVALID_ARGUMENT
}

/// Read callback for write-only bridges
///
/// # Safety
///
/// Never dereferences its arguments.
pub unsafe extern "C" fn reject_read(
    _context: *mut StreamContext,
    _data: *mut u8,
    _len: isize,
) -> isize {
    tracing::trace!("read rejected on write-only stream");
    INVALID_ARGUMENT
}

/// Flush callback for read-only bridges, where there is nothing to flush
///
/// # Safety
///
/// Never dereferences its argument.
pub unsafe extern "C" fn noop_flush(_context: *mut StreamContext) -> isize {
    0
}


#[cfg(test)]
#[path = "stream/stream_parameterized_tests.rs"]
mod stream_parameterized_tests;

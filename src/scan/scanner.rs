//! Windowed byte scanner
//!
//! Reads `[from, limit)` in windows of a configured size and tests every
//! offset against a predicate. The last [`LOOKBACK`] bytes of a window are
//! carried into the next one, so a pattern of up to `LOOKBACK + 1` bytes is
//! found even when a window boundary splits it.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use tracing::trace;

use crate::config::DEFAULT_SCAN_WINDOW;
use crate::error::Result;
use crate::tags::{self, leading, MAX_MAGIC_LEN};

/// Bytes carried across window boundaries
pub const LOOKBACK: usize = MAX_MAGIC_LEN - 1;

/// Size of the first read of a walk; later reads double up to the window
const FIRST_READ: usize = 512;

/// Result of a leading-tag/sync scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOutcome {
    /// Offset of the last ID3v2 magic seen before the scan stopped
    pub last_leading: Option<u64>,
    /// Offset of the first frame sync, if one was found before the limit
    pub sync: Option<u64>,
}

impl ScanOutcome {
    /// The last ID3v2 magic, but only when a sync pattern terminated the scan
    pub fn leading_before_sync(&self) -> Option<u64> {
        self.sync.and(self.last_leading)
    }
}

/// Forward scanner with a fixed window size
///
/// The read buffer is kept between walks, so repeated scans from nearby
/// offsets do not allocate.
#[derive(Debug, Clone)]
pub struct Scanner {
    window: usize,
    buf: Vec<u8>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_WINDOW)
    }
}

impl Scanner {
    /// Create a scanner reading `window` bytes at a time
    ///
    /// Windows smaller than the lookback are raised to `LOOKBACK + 1`.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(LOOKBACK + 1),
            buf: Vec::new(),
        }
    }

    /// Window size in bytes
    pub fn window(&self) -> usize {
        self.window
    }

    /// Scan forward for frame sync, remembering the last ID3v2 magic on the way
    ///
    /// Stops at the first sync pattern. When `limit` is reached first the
    /// outcome has no sync but still reports any ID3v2 magic that was seen.
    pub fn scan<R: Read + Seek>(&mut self, stream: &mut R, from: u64, limit: u64) -> Result<ScanOutcome> {
        let mut last_leading = None;
        let sync = self.walk(stream, from, limit, |offset, window| {
            if leading::has_magic(window) {
                last_leading = Some(offset);
            }
            tags::is_sync(window)
        })?;
        Ok(ScanOutcome { last_leading, sync })
    }

    /// Offset of the next ID3v2, SRSF or ID3v1 magic in `[from, limit)`
    pub fn next_magic<R: Read + Seek>(
        &mut self,
        stream: &mut R,
        from: u64,
        limit: u64,
    ) -> Result<Option<u64>> {
        self.walk(stream, from, limit, |_, window| tags::magic_kind(window).is_some())
    }

    /// Visit every offset in `[from, limit)` until `visit` returns true
    ///
    /// `visit` receives the offset and the buffered bytes starting there.
    /// Unless the end of the range is near, at least `LOOKBACK + 1` bytes
    /// are available to it. Reads start small and grow to the window size,
    /// so a hit close to `from` costs little I/O.
    fn walk<R, F>(
        &mut self,
        stream: &mut R,
        from: u64,
        limit: u64,
        mut visit: F,
    ) -> Result<Option<u64>>
    where
        R: Read + Seek,
        F: FnMut(u64, &[u8]) -> bool,
    {
        if from >= limit {
            return Ok(None);
        }
        stream.seek(SeekFrom::Start(from))?;

        let buf = &mut self.buf;
        buf.clear();
        let mut chunk = self.window.min(FIRST_READ);
        // Stream offset of buf[0]
        let mut base = from;
        // Stream offset just past the last byte read
        let mut read_to = from;

        loop {
            let want = (limit - read_to).min(chunk as u64) as usize;
            let filled = buf.len();
            buf.resize(filled + want, 0);
            let got = read_up_to(stream, &mut buf[filled..])?;
            buf.truncate(filled + got);
            read_to += got as u64;

            let at_end = got < want || read_to >= limit;
            // Offsets in the carried tail are visited once more bytes arrive.
            let ready = if at_end {
                buf.len()
            } else {
                buf.len() - LOOKBACK
            };

            for i in 0..ready {
                let offset = base + i as u64;
                if visit(offset, &buf[i..]) {
                    return Ok(Some(offset));
                }
            }
            if at_end {
                return Ok(None);
            }

            buf.drain(..ready);
            base += ready as u64;
            chunk = chunk.saturating_mul(2).min(self.window);
            trace!(base, read_to, limit, "scanner window advanced");
        }
    }
}

/// Read until `buf` is full or the stream ends
fn read_up_to<R: Read>(stream: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match stream.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Offset of the last ID3v2 magic before the first frame sync in `[from, limit)`
///
/// `None` when no sync pattern is found before `limit`, or when no ID3v2
/// magic precedes it.
pub fn last_leading_before_sync<R: Read + Seek>(
    stream: &mut R,
    from: u64,
    limit: u64,
) -> Result<Option<u64>> {
    Ok(Scanner::default()
        .scan(stream, from, limit)?
        .leading_before_sync())
}

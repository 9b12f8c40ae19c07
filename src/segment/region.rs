//! Region: one labeled, contiguous byte range of a segmented stream

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What a region of the stream holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// ID3v2 tag, possibly merged with junk and further ID3v2 tags
    LeadingTag,
    /// ID3v1 tag at the very end of the stream
    TrailingTag,
    /// SRS file-track block
    ContainerTag,
    /// Audio data and any bytes no tag claimed
    Payload,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::LeadingTag => write!(f, "ID3v2"),
            RegionKind::TrailingTag => write!(f, "ID3v1"),
            RegionKind::ContainerTag => write!(f, "SRSF"),
            RegionKind::Payload => write!(f, "payload"),
        }
    }
}

/// A labeled byte range `[start, start + length)`
///
/// Regions are values: once emitted they never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    kind: RegionKind,
    start: u64,
    length: u64,
}

impl Region {
    /// Create a region; `length` must be non-zero
    pub fn new(kind: RegionKind, start: u64, length: u64) -> Self {
        debug_assert!(length > 0, "regions are never empty");
        Self {
            kind,
            start,
            length,
        }
    }

    /// What the region holds
    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    /// Offset of the first byte
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number of bytes in the region
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Offset one past the last byte
    pub fn end(&self) -> u64 {
        self.start + self.length
    }

    /// Whether `offset` falls inside the region
    pub fn contains(&self, offset: u64) -> bool {
        (self.start..self.end()).contains(&offset)
    }

    /// Copy this region's bytes from `stream` into `out`
    ///
    /// Only one small buffer is used regardless of region size.
    ///
    /// # Errors
    /// * `Io` - If the stream ends before the region does
    pub fn copy_to<R, W>(&self, stream: &mut R, out: &mut W) -> Result<u64>
    where
        R: Read + Seek,
        W: Write,
    {
        stream.seek(SeekFrom::Start(self.start))?;
        let copied = io::copy(&mut stream.by_ref().take(self.length), out)?;
        if copied < self.length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "{} region at {} needs {} bytes, stream had {}",
                    self.kind, self.start, self.length, copied
                ),
            )
            .into());
        }
        Ok(copied)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.start, self.length)
    }
}

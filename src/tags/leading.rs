//! ID3v2 header recognizer
//!
//! Layout: `"ID3"`, major version, revision, flags, four synchsafe size
//! bytes. Only the magic is checked; version, revision and flags may hold
//! anything, and the size bytes are decoded even when their high bits are
//! set. A damaged header therefore still parses, usually with a size that
//! runs past the end of the stream.

use crate::segment::RegionKind;
use crate::synchsafe;

use super::TagMatch;

/// ID3v2 magic
pub const MAGIC: &[u8; 3] = b"ID3";

/// Fixed header length
pub const HEADER_LEN: usize = 10;

/// Parsed 10-byte ID3v2 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingHeader {
    pub major_version: u8,
    pub revision: u8,
    pub flags: u8,
    /// Tag size excluding the header
    pub payload_len: u32,
}

impl LeadingHeader {
    /// Parse a header from the first ten bytes of `window`
    pub fn parse(window: &[u8]) -> Option<Self> {
        if window.len() < HEADER_LEN || !has_magic(window) {
            return None;
        }
        Some(Self {
            major_version: window[3],
            revision: window[4],
            flags: window[5],
            payload_len: synchsafe::decode([window[6], window[7], window[8], window[9]]),
        })
    }

    /// Build a header declaring `payload_len` bytes after it
    pub fn new(payload_len: u32) -> Self {
        Self {
            major_version: 3,
            revision: 0,
            flags: 0,
            payload_len,
        }
    }

    /// Total region length: header plus payload
    pub fn region_len(&self) -> u64 {
        HEADER_LEN as u64 + u64::from(self.payload_len)
    }

    /// Serialize back to the on-disk layout
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let size = synchsafe::encode(u64::from(self.payload_len));
        let mut out = [0u8; HEADER_LEN];
        out[..3].copy_from_slice(MAGIC);
        out[3] = self.major_version;
        out[4] = self.revision;
        out[5] = self.flags;
        out[6..].copy_from_slice(&size);
        out
    }
}

/// True if `window` starts with the ID3v2 magic
#[inline]
pub fn has_magic(window: &[u8]) -> bool {
    window.starts_with(MAGIC)
}

/// Recognize an ID3v2 header; the stream length is not consulted
pub fn recognize(window: &[u8], _remaining: u64) -> Option<TagMatch> {
    LeadingHeader::parse(window).map(|header| TagMatch {
        kind: RegionKind::LeadingTag,
        length: header.region_len(),
    })
}

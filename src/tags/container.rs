//! SRS track container recognizer
//!
//! `"SRSF"` followed by the little-endian total length of the block, header
//! included. A total shorter than the header itself never matches.

use byteorder::{ByteOrder, LittleEndian};

use crate::segment::RegionKind;

use super::TagMatch;

/// SRS file-track magic
pub const MAGIC: &[u8; 4] = b"SRSF";

/// Magic plus length field
pub const HEADER_LEN: usize = 8;

/// True if `window` starts with the container magic
#[inline]
pub fn has_magic(window: &[u8]) -> bool {
    window.starts_with(MAGIC)
}

/// Recognize a container header and return its declared total length
pub fn recognize(window: &[u8], _remaining: u64) -> Option<TagMatch> {
    if window.len() < HEADER_LEN || !has_magic(window) {
        return None;
    }
    let total = LittleEndian::read_u32(&window[4..HEADER_LEN]);
    if (total as usize) < HEADER_LEN {
        return None;
    }
    Some(TagMatch {
        kind: RegionKind::ContainerTag,
        length: u64::from(total),
    })
}

/// Header bytes for a container block of `total` bytes
pub fn header_bytes(total: u32) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[..4].copy_from_slice(MAGIC);
    LittleEndian::write_u32(&mut out[4..], total);
    out
}

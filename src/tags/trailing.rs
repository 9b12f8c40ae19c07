//! ID3v1 recognizer: `"TAG"` and a fixed 128 bytes

use crate::segment::RegionKind;

use super::TagMatch;

/// ID3v1 magic
pub const MAGIC: &[u8; 3] = b"TAG";

/// ID3v1 blocks are always this long
pub const TAG_LEN: u64 = 128;

/// True if `window` starts with the ID3v1 magic
#[inline]
pub fn has_magic(window: &[u8]) -> bool {
    window.starts_with(MAGIC)
}

/// Recognize an ID3v1 block; needs at least 128 bytes left in the stream
pub fn recognize(window: &[u8], remaining: u64) -> Option<TagMatch> {
    if !has_magic(window) || remaining < TAG_LEN {
        return None;
    }
    Some(TagMatch {
        kind: RegionKind::TrailingTag,
        length: TAG_LEN,
    })
}

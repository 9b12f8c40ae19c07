//! Header Recognizers
//!
//! Pure functions over a byte window taken at a candidate offset. Matching is
//! structural only: a magic plus whatever length field the header carries.
//! Tag contents are never inspected.
//!
//! | Tag       | Magic  | Length                                   |
//! |-----------|--------|------------------------------------------|
//! | ID3v2     | `ID3`  | 10 + synchsafe size at bytes 6..10       |
//! | SRS track | `SRSF` | little-endian u32 total at bytes 4..8    |
//! | ID3v1     | `TAG`  | always 128                               |

pub mod container;
pub mod leading;
pub mod sync;
pub mod trailing;

pub use leading::LeadingHeader;
pub use sync::is_sync;

use crate::segment::RegionKind;

/// Largest window any recognizer looks at
pub const MAX_HEADER_LEN: usize = leading::HEADER_LEN;

/// Length of the longest tag magic
pub const MAX_MAGIC_LEN: usize = container::MAGIC.len();

/// A structural header match at some offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch {
    /// Region kind implied by the header
    pub kind: RegionKind,
    /// Region length implied by the header, header bytes included
    pub length: u64,
}

/// Which tag magic, if any, the window starts with
pub fn magic_kind(window: &[u8]) -> Option<RegionKind> {
    if leading::has_magic(window) {
        Some(RegionKind::LeadingTag)
    } else if container::has_magic(window) {
        Some(RegionKind::ContainerTag)
    } else if trailing::has_magic(window) {
        Some(RegionKind::TrailingTag)
    } else {
        None
    }
}

/// Run the recognizers in order: leading, container, trailing
///
/// `remaining` is the number of stream bytes from the window start to the
/// end of the stream. The returned length is what the header declares; it
/// may overrun `remaining` for leading and container tags and callers decide
/// what to do with that.
pub fn recognize(window: &[u8], remaining: u64) -> Option<TagMatch> {
    leading::recognize(window, remaining)
        .or_else(|| container::recognize(window, remaining))
        .or_else(|| trailing::recognize(window, remaining))
}

//! MPEG audio frame sync detection
//!
//! Eleven set bits: `0xFF` followed by a byte whose top three bits are set.
//! Used by the scanner only; sync never produces a region of its own.

/// Bytes needed to test for sync
pub const SYNC_LEN: usize = 2;

const SYNC_MASK: u8 = 0xE0;

/// True if `window` starts with a frame sync pattern
#[inline]
pub fn is_sync(window: &[u8]) -> bool {
    window.len() >= SYNC_LEN && window[0] == 0xFF && window[1] & SYNC_MASK == SYNC_MASK
}

//! mp3seg - Fault-tolerant segmentation of tagged MP3 streams
//!
//! Splits a stream into an ordered, gap-free list of regions: ID3v2 tags at
//! the head, SRS container blocks, an ID3v1 tag at the tail, and the audio
//! payload in between. Files found in the wild carry duplicated, truncated
//! and concatenated tags; those are folded into neighboring regions instead
//! of being reported as errors.
//!
//! # Architecture
//!
//! - `synchsafe`: 28-bit size codec used by ID3v2 headers
//! - `tags`: structural header recognizers
//! - `scan`: windowed forward scanner for tag magics and frame sync
//! - `segment`: the segmenter and its region iterator
//!
//! # Example
//! ```
//! use std::io::Cursor;
//! use mp3seg::{RegionKind, Segmenter};
//!
//! let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x00".to_vec();
//! data.extend_from_slice(b"\xFF\xFB\x90\x00");
//!
//! let regions: Vec<_> = Segmenter::new(Cursor::new(data))?.collect::<Result<_, _>>()?;
//! assert_eq!(regions[0].kind(), RegionKind::LeadingTag);
//! assert_eq!(regions[1].kind(), RegionKind::Payload);
//! # Ok::<(), mp3seg::SegmentError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod scan;
pub mod segment;
pub mod synchsafe;
pub mod tags;

pub use config::SegmenterConfig;
pub use error::{Result, SegmentError};
pub use scan::{last_leading_before_sync, ScanOutcome, Scanner};
pub use segment::{segment_all, Region, RegionKind, Segmenter, SegmenterState};

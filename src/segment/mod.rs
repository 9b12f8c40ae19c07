//! Stream segmentation
//!
//! - Region types
//! - Segmenter state machine and lazy region iterator

pub mod region;
pub mod segmenter;

pub use region::{Region, RegionKind};
pub use segmenter::{segment_all, Segmenter, SegmenterState};

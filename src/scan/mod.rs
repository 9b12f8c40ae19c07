//! Forward Sync/Recovery Scanner
//!
//! Windowed, forward-only searches over a seekable stream. Nothing here
//! holds more than one window of the stream in memory.

pub mod scanner;

pub use scanner::{last_leading_before_sync, ScanOutcome, Scanner, LOOKBACK};

//! Segmenter configuration
//!
//! The only tunable is the scanner window. Memory use of a segmenter is
//! bounded by this window plus a few bytes of lookback, whatever the size
//! of the stream.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};

/// Default scanner window (64 KiB)
pub const DEFAULT_SCAN_WINDOW: usize = 64 * 1024;

/// Smallest accepted scanner window
pub const MIN_SCAN_WINDOW: usize = 8;

/// Largest accepted scanner window (16 MiB)
pub const MAX_SCAN_WINDOW: usize = 16 * 1024 * 1024;

/// Configuration for [`Segmenter`](crate::Segmenter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Bytes read per scanner window
    pub scan_window: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        SegmenterConfig {
            scan_window: DEFAULT_SCAN_WINDOW,
        }
    }
}

impl SegmenterConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    /// * `InvalidConfig` - If `scan_window` is outside
    ///   [`MIN_SCAN_WINDOW`]..=[`MAX_SCAN_WINDOW`]
    pub fn new(scan_window: usize) -> Result<Self> {
        let config = SegmenterConfig { scan_window };
        config.validate()?;
        Ok(config)
    }

    /// Check the bounds on every field
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SCAN_WINDOW..=MAX_SCAN_WINDOW).contains(&self.scan_window) {
            return Err(SegmentError::InvalidConfig {
                reason: format!(
                    "scan_window must be between {} and {} bytes, got {}",
                    MIN_SCAN_WINDOW, MAX_SCAN_WINDOW, self.scan_window
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: SegmenterConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = SegmenterConfig::default();
        assert_eq!(config.scan_window, DEFAULT_SCAN_WINDOW);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bounds() {
        assert!(SegmenterConfig::new(MIN_SCAN_WINDOW).is_ok());
        assert!(SegmenterConfig::new(MAX_SCAN_WINDOW).is_ok());

        let err = SegmenterConfig::new(MIN_SCAN_WINDOW - 1).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(SegmenterConfig::new(MAX_SCAN_WINDOW + 1).is_err());
    }

    #[test]
    fn test_from_json() {
        let config = SegmenterConfig::from_json_str(r#"{"scan_window": 4096}"#).unwrap();
        assert_eq!(config.scan_window, 4096);

        let config = SegmenterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SegmenterConfig::default());

        let err = SegmenterConfig::from_json_str(r#"{"scan_window": 2}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = SegmenterConfig::from_json_str("not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"scan_window": 128}}"#).unwrap();

        let config = SegmenterConfig::load(file.path()).unwrap();
        assert_eq!(config.scan_window, 128);

        let missing = file.path().with_extension("missing");
        assert_eq!(
            SegmenterConfig::load(&missing).unwrap_err().error_code(),
            "IO_ERROR"
        );
    }
}

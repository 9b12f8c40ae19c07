//! Stream fixtures shared by the integration tests

#![allow(dead_code)]

use std::io::Cursor;

use mp3seg::synchsafe;
use mp3seg::tags::container;
use mp3seg::{Region, RegionKind};

/// Growable in-memory MP3 stream
#[derive(Debug, Default, Clone)]
pub struct StreamBuilder {
    data: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// ID3v2 tag of `size` bytes in total, header included
    pub fn id3v2(mut self, size: usize) -> Self {
        assert!(size >= 10, "ID3v2 block must have a 10 byte header");
        self.data.extend_from_slice(b"ID3");
        self.data.extend_from_slice(b"\x03\x00\x00");
        self.data
            .extend_from_slice(&synchsafe::encode((size - 10) as u64));
        self.data.extend(std::iter::repeat(b'2').take(size - 10));
        self
    }

    /// Frame sync followed by filler, `size` bytes in total
    pub fn mp3(mut self, size: usize) -> Self {
        assert!(size >= 2, "The sync bytes require 2 bytes");
        self.data.extend_from_slice(b"\xFF\xE7");
        self.data.extend(std::iter::repeat(b'M').take(size - 2));
        self
    }

    /// 128 byte ID3v1 tag
    pub fn id3v1(mut self) -> Self {
        self.data.extend_from_slice(b"TAG");
        self.data.extend(std::iter::repeat(b'1').take(125));
        self
    }

    /// SRS file-track block of `size` bytes in total
    pub fn srsf(mut self, size: usize) -> Self {
        assert!(size >= 8, "8 byte header minimum");
        self.data
            .extend_from_slice(&container::header_bytes(size as u32));
        self.data.extend(std::iter::repeat(b'S').take(size - 8));
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn cursor(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.data)
    }
}

/// Shorthand for building expected regions
pub fn region(kind: RegionKind, start: u64, length: u64) -> Region {
    Region::new(kind, start, length)
}

/// Regions are ordered, contiguous and cover exactly `[0, len)`
pub fn assert_partition(regions: &[Region], len: u64) {
    let mut expected_start = 0;
    for r in regions {
        assert_eq!(r.start(), expected_start, "gap or overlap before {}", r);
        assert!(r.length() > 0, "empty region {}", r);
        expected_start = r.end();
    }
    assert_eq!(expected_start, len, "regions do not reach the end");
}

//! Stream Segmenter
//!
//! Partitions a tagged MP3 stream into contiguous [`Region`]s.
//!
//! Segmenting happens in two phases:
//! - **Construction** resolves every ID3v2 tag at the head of the stream.
//!   Clean back-to-back tags stay separate regions. Junk between tags is
//!   merged into one leading region when another ID3v2 tag follows it before
//!   any frame sync. A stream with nothing after its leading tags is rejected.
//! - **Emission** is lazy: each pull recognizes a tag at the cursor or grows
//!   a payload region up to the next acceptable tag. An ID3v1 tag is only
//!   accepted when it ends exactly at the end of the stream; earlier copies
//!   are payload.

use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::iter::FusedIterator;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::SegmenterConfig;
use crate::error::{Result, SegmentError};
use crate::scan::Scanner;
use crate::tags::{self, leading, LeadingHeader, TagMatch, MAX_HEADER_LEN};

use super::region::{Region, RegionKind};

/// Segmenter lifecycle after construction
///
/// Construction itself is the init phase; it either yields an `Emitting`
/// segmenter or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmenterState {
    /// Regions remain to be pulled
    #[default]
    Emitting,
    /// Every byte has been emitted
    Done,
}

impl fmt::Display for SegmenterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmenterState::Emitting => write!(f, "Emitting"),
            SegmenterState::Done => write!(f, "Done"),
        }
    }
}

/// Forward-only region iterator over one exclusively owned stream
pub struct Segmenter<R> {
    stream: R,
    stream_len: u64,
    /// Offset of the first byte not yet assigned to a region
    cursor: u64,
    /// Leading regions resolved at construction, not yet pulled
    leading: VecDeque<Region>,
    state: SegmenterState,
    scanner: Scanner,
}

impl Segmenter<BufReader<File>> {
    /// Open a file and segment it with the default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, &SegmenterConfig::default())
    }

    /// Open a file and segment it with `config`
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &SegmenterConfig) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::with_config(BufReader::new(file), config)
    }
}

impl<R: Read + Seek> Segmenter<R> {
    /// Bind a segmenter to `stream` with the default configuration
    ///
    /// # Errors
    /// * `NoPayload` - If nothing follows the leading tags
    /// * `Io` - If the stream cannot be read
    pub fn new(stream: R) -> Result<Self> {
        Self::with_config(stream, &SegmenterConfig::default())
    }

    /// Bind a segmenter to `stream` and resolve its leading tags
    ///
    /// The stream length is taken from seeking to its end; the stream must
    /// not be modified by anyone else while the segmenter owns it.
    ///
    /// # Errors
    /// * `InvalidConfig` - If `config` is out of bounds
    /// * `NoPayload` - If nothing follows the leading tags
    /// * `Io` - If the stream cannot be read
    pub fn with_config(mut stream: R, config: &SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let stream_len = stream.seek(SeekFrom::End(0))?;

        let mut segmenter = Self {
            stream,
            stream_len,
            cursor: 0,
            leading: VecDeque::new(),
            state: SegmenterState::Emitting,
            scanner: Scanner::new(config.scan_window),
        };
        segmenter.resolve_leading()?;

        if segmenter.cursor >= stream_len {
            return Err(SegmentError::NoPayload {
                stream_len,
                tags_end: segmenter.cursor,
            });
        }

        info!(
            stream_len,
            leading_regions = segmenter.leading.len(),
            payload_start = segmenter.cursor,
            "Segmenter ready"
        );
        Ok(segmenter)
    }

    /// Total stream length in bytes
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Current lifecycle state
    pub fn state(&self) -> SegmenterState {
        self.state
    }

    /// Give the stream back
    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Pull the next region
    ///
    /// # Errors
    /// * `Exhausted` - Once every region has been pulled
    /// * `Io` - If the stream cannot be read
    pub fn next_region(&mut self) -> Result<Region> {
        if self.state == SegmenterState::Done {
            return Err(SegmentError::Exhausted);
        }

        let region = match self.leading.pop_front() {
            Some(region) => region,
            None => {
                let start = self.cursor;
                let region = match self.accept_at(start)? {
                    Some(tag) => Region::new(tag.kind, start, tag.length),
                    None => {
                        let end = self.payload_end(start + 1)?;
                        Region::new(RegionKind::Payload, start, end - start)
                    }
                };
                self.cursor = region.end();
                region
            }
        };

        if self.leading.is_empty() && self.cursor >= self.stream_len {
            self.state = SegmenterState::Done;
        }
        debug!(
            kind = %region.kind(),
            start = region.start(),
            length = region.length(),
            "Region emitted"
        );
        Ok(region)
    }

    // ========================================================================
    // Leading tags (construction time)
    // ========================================================================

    fn resolve_leading(&mut self) -> Result<()> {
        let mut next = self.leading_at(0)?;
        // Start of the leading region being accumulated
        let mut start = 0;

        while let Some((at, header)) = next.take() {
            let end = self.leading_end(at, &header)?;
            if end >= self.stream_len {
                self.close_leading(start, end);
                break;
            }

            let mut window = [0u8; MAX_HEADER_LEN];
            let n = self.peek(end, &mut window)?;
            let after = &window[..n];
            if tags::magic_kind(after).is_some() || tags::is_sync(after) {
                self.close_leading(start, end);
                start = end;
                next = self.leading_at(end)?;
                continue;
            }

            // Unrecognized bytes: merge up to another ID3v2 tag if one
            // shows up before the audio starts.
            let outcome = self.scanner.scan(&mut self.stream, end, self.stream_len)?;
            match outcome.last_leading {
                Some(found) => match self.leading_at(found)? {
                    Some(tag) => {
                        debug!(start, junk_at = end, next_tag = found, "Merging junk into leading tag");
                        next = Some(tag);
                    }
                    None => self.close_leading(start, end),
                },
                None => self.close_leading(start, end),
            }
        }
        Ok(())
    }

    fn close_leading(&mut self, start: u64, end: u64) {
        self.leading
            .push_back(Region::new(RegionKind::LeadingTag, start, end - start));
        self.cursor = end;
    }

    /// ID3v2 header at `offset`, if the stream holds a full one there
    fn leading_at(&mut self, offset: u64) -> Result<Option<(u64, LeadingHeader)>> {
        let mut window = [0u8; MAX_HEADER_LEN];
        let n = self.peek(offset, &mut window)?;
        Ok(LeadingHeader::parse(&window[..n]).map(|header| (offset, header)))
    }

    /// Where the tag at `at` ends, repairing a size that overruns the stream
    ///
    /// An overrunning tag is cut at the last ID3v2 magic before frame sync,
    /// else at the sync itself, else at the end of the stream.
    fn leading_end(&mut self, at: u64, header: &LeadingHeader) -> Result<u64> {
        let declared = at.saturating_add(header.region_len());
        if declared <= self.stream_len {
            return Ok(declared);
        }

        let from = at + leading::MAGIC.len() as u64;
        let outcome = self.scanner.scan(&mut self.stream, from, self.stream_len)?;
        let end = outcome
            .last_leading
            .or(outcome.sync)
            .unwrap_or(self.stream_len);
        warn!(
            offset = at,
            declared_len = header.region_len(),
            stream_len = self.stream_len,
            truncated_to = end,
            "ID3v2 size overruns stream, truncating tag"
        );
        Ok(end)
    }

    // ========================================================================
    // Lazy emission
    // ========================================================================

    /// A tag that may start a region at `offset`
    ///
    /// Leading and container tags must fit in the stream. An ID3v1 tag must
    /// end exactly at the end of the stream.
    fn accept_at(&mut self, offset: u64) -> Result<Option<TagMatch>> {
        let mut window = [0u8; MAX_HEADER_LEN];
        let n = self.peek(offset, &mut window)?;
        let remaining = self.stream_len - offset;

        let Some(tag) = tags::recognize(&window[..n], remaining) else {
            return Ok(None);
        };
        let accepted = match tag.kind {
            RegionKind::TrailingTag => tag.length == remaining,
            _ => tag.length <= remaining,
        };
        if !accepted {
            debug!(
                kind = %tag.kind,
                offset,
                length = tag.length,
                remaining,
                "Tag rejected, treating as payload"
            );
            return Ok(None);
        }
        Ok(Some(tag))
    }

    /// End of a payload region whose bytes continue at `from`
    fn payload_end(&mut self, mut from: u64) -> Result<u64> {
        while let Some(candidate) = self
            .scanner
            .next_magic(&mut self.stream, from, self.stream_len)?
        {
            if self.accept_at(candidate)?.is_some() {
                return Ok(candidate);
            }
            from = candidate + 1;
        }
        Ok(self.stream_len)
    }

    /// Read up to `MAX_HEADER_LEN` bytes at `offset`, clamped to the stream end
    fn peek(&mut self, offset: u64, window: &mut [u8; MAX_HEADER_LEN]) -> Result<usize> {
        let n = self
            .stream_len
            .saturating_sub(offset)
            .min(MAX_HEADER_LEN as u64) as usize;
        if n > 0 {
            self.stream.seek(SeekFrom::Start(offset))?;
            self.stream.read_exact(&mut window[..n])?;
        }
        Ok(n)
    }
}

impl<R: Read + Seek> Iterator for Segmenter<R> {
    type Item = Result<Region>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_region() {
            Ok(region) => Some(Ok(region)),
            Err(SegmentError::Exhausted) => None,
            Err(e) => {
                self.state = SegmenterState::Done;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read + Seek> FusedIterator for Segmenter<R> {}

impl<R> fmt::Debug for Segmenter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segmenter")
            .field("stream_len", &self.stream_len)
            .field("cursor", &self.cursor)
            .field("pending_leading", &self.leading.len())
            .field("state", &self.state)
            .finish()
    }
}

/// Segment a whole stream into a list of regions
pub fn segment_all<R: Read + Seek>(stream: R) -> Result<Vec<Region>> {
    Segmenter::new(stream)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn leading_tag(size: u32) -> Vec<u8> {
        let mut out = LeadingHeader::new(size - 10).to_bytes().to_vec();
        out.resize(size as usize, b'2');
        out
    }

    fn regions(data: Vec<u8>) -> Vec<Region> {
        segment_all(Cursor::new(data)).unwrap()
    }

    #[test]
    fn test_payload_only() {
        let found = regions(b"\xFF\xE7".to_vec());
        assert_eq!(found, vec![Region::new(RegionKind::Payload, 0, 2)]);
    }

    #[test]
    fn test_empty_stream_has_no_payload() {
        let err = Segmenter::new(Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::NoPayload {
                stream_len: 0,
                tags_end: 0
            }
        ));
    }

    #[test]
    fn test_state_transitions() {
        let mut data = leading_tag(20);
        data.extend_from_slice(b"\xFF\xE7MM");
        let mut segmenter = Segmenter::new(Cursor::new(data)).unwrap();
        assert_eq!(segmenter.state(), SegmenterState::Emitting);

        segmenter.next_region().unwrap();
        assert_eq!(segmenter.state(), SegmenterState::Emitting);
        let payload = segmenter.next_region().unwrap();
        assert_eq!(payload, Region::new(RegionKind::Payload, 20, 4));
        assert_eq!(segmenter.state(), SegmenterState::Done);

        assert!(segmenter.next_region().unwrap_err().is_end_of_sequence());
        assert!(segmenter.next_region().unwrap_err().is_end_of_sequence());
        assert!(segmenter.next().is_none());
    }

    #[test]
    fn test_leading_tag_with_truncated_header_is_payload() {
        let mut data = b"\xFF\xE7MMMM".to_vec();
        data.extend_from_slice(b"ID3\x03");
        assert_eq!(regions(data), vec![Region::new(RegionKind::Payload, 0, 10)]);
    }

    #[test]
    fn test_overrunning_container_is_payload() {
        let mut data = b"\xFF\xE7MM".to_vec();
        data.extend_from_slice(&tags::container::header_bytes(200));
        data.extend_from_slice(b"SSSS");
        assert_eq!(regions(data), vec![Region::new(RegionKind::Payload, 0, 16)]);
    }

    #[test]
    fn test_trailing_tag_at_cursor_must_be_final() {
        let mut data = leading_tag(20);
        let mut spurious = b"TAG".to_vec();
        spurious.resize(128, b'1');
        data.extend_from_slice(&spurious);
        data.extend_from_slice(b"\xFF\xE7MM");
        data.extend_from_slice(&spurious);

        assert_eq!(
            regions(data),
            vec![
                Region::new(RegionKind::LeadingTag, 0, 20),
                Region::new(RegionKind::Payload, 20, 132),
                Region::new(RegionKind::TrailingTag, 152, 128),
            ]
        );
    }

    #[test]
    fn test_debug_output() {
        let segmenter = Segmenter::new(Cursor::new(b"\xFF\xE7".to_vec())).unwrap();
        let text = format!("{:?}", segmenter);
        assert!(text.contains("stream_len: 2"));
        assert_eq!(segmenter.into_inner().into_inner(), b"\xFF\xE7");
    }
}

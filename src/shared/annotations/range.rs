//! Text Range
//!
//! Half-open character intervals `[start, end)` over a text's content.
//!
//! Two ranges `[a, b)` and `[c, d)` overlap iff `!(b <= c || a >= d)`.
//! Ranges that merely touch (`b == c`) do not overlap.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// A validated half-open range of character offsets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawRange")]
pub struct TextRange {
    start: i32,
    end: i32,
}

/// Unvalidated wire form of `TextRange`
#[derive(Deserialize)]
struct RawRange {
    start: i32,
    end: i32,
}

impl TryFrom<RawRange> for TextRange {
    type Error = SharedError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        TextRange::new(raw.start, raw.end)
    }
}

impl TextRange {
    /// Create a range, rejecting negative offsets and empty or inverted spans
    pub fn new(start: i32, end: i32) -> Result<Self, SharedError> {
        if start < 0 {
            return Err(SharedError::validation(
                "rangeStart",
                "Range start must not be negative",
            ));
        }
        if start >= end {
            return Err(SharedError::validation(
                "rangeEnd",
                "Range end must be greater than range start",
            ));
        }
        Ok(Self { start, end })
    }

    /// Wrap bounds read back from storage
    ///
    /// The schema enforces `range_start >= 0` and `range_start < range_end`.
    pub(crate) fn from_stored(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Whether the range fits inside a text of `text_len` characters
    pub fn fits_within(&self, text_len: usize) -> bool {
        usize::try_from(self.end).map_or(false, |end| end <= text_len)
    }

    /// Half-open overlap test
    pub fn overlaps(&self, other: &TextRange) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Smallest range covering both inputs
    pub fn union(&self, other: &TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether `other` lies entirely inside this range
    pub fn contains(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

//! Page coordinates: validated ranges, sides and anchors.
//!
//! Everything here is 1-based and inclusive, matching how pages are numbered
//! for people. Conversion to 0-based slice indices happens only through
//! [`PageRange::indices`] and [`Anchor::insertion_index`].

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated, 1-based inclusive interval of pages.
///
/// Only obtainable through [`validate`], so `1 <= start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    start: usize,
    end: usize,
}

/// Check a requested interval against a document of `length` pages.
///
/// Ordering is checked before bounds, so `(5, 4)` is an order error even
/// for an empty document.
pub fn validate(length: usize, start: usize, end: usize) -> Result<PageRange> {
    if end < start {
        return Err(Error::Order { start, end });
    }
    if start < 1 {
        return Err(Error::Bounds {
            what: "start",
            page: start,
            length,
        });
    }
    if end > length {
        return Err(Error::Bounds {
            what: "end",
            page: end,
            length,
        });
    }
    Ok(PageRange { start, end })
}

impl PageRange {
    /// Resolve an optional sub-range: a missing start is page 1, a missing
    /// end is the last page.
    pub fn resolve(length: usize, start: Option<usize>, end: Option<usize>) -> Result<Self> {
        validate(length, start.unwrap_or(1), end.unwrap_or(length))
    }

    pub const fn start(self) -> usize {
        self.start
    }

    pub const fn end(self) -> usize {
        self.end
    }

    /// Number of pages in the range. Never zero.
    pub const fn len(self) -> usize {
        self.end - self.start + 1
    }

    pub const fn contains(self, page: usize) -> bool {
        self.start <= page && page <= self.end
    }

    /// 0-based slice indices covered by this range.
    pub const fn indices(self) -> RangeInclusive<usize> {
        (self.start - 1)..=(self.end - 1)
    }

    /// Re-check the range against the sequence it is about to be applied to.
    pub(crate) fn check(self, length: usize) -> Result<Self> {
        validate(length, self.start, self.end)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Placement of a block relative to its anchor page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Before,
    After,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(Error::Side(s.to_string())),
        }
    }
}

/// A 1-based anchor page with the side a block is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub page: usize,
    pub side: Side,
}

impl Anchor {
    pub const fn new(page: usize, side: Side) -> Self {
        Self { page, side }
    }

    pub const fn before(page: usize) -> Self {
        Self::new(page, Side::Before)
    }

    pub const fn after(page: usize) -> Self {
        Self::new(page, Side::After)
    }

    /// 0-based index at which a block lands in an untouched sequence.
    ///
    /// Only meaningful for an anchor inside the sequence.
    pub const fn insertion_index(self) -> usize {
        match self.side {
            Side::Before => self.page - 1,
            Side::After => self.page,
        }
    }

    pub(crate) fn check(self, length: usize) -> Result<Self> {
        if self.page < 1 || self.page > length {
            return Err(Error::Bounds {
                what: "anchor",
                page: self.page,
                length,
            });
        }
        Ok(self)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} page {}", self.side, self.page)
    }
}

/// Anchors that turn a rejected no-op move into a real one regardless of
/// side: the closest page below the block and the closest page above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveAlternatives {
    pub below: Option<usize>,
    pub above: Option<usize>,
}

impl MoveAlternatives {
    pub(crate) const fn around(range: PageRange, length: usize) -> Self {
        let below = if range.start > 2 {
            Some(range.start - 2)
        } else {
            None
        };
        let above = if range.end + 2 <= length {
            Some(range.end + 2)
        } else {
            None
        };
        Self { below, above }
    }
}

impl fmt::Display for MoveAlternatives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.below, self.above) {
            (Some(below), Some(above)) => write!(
                f,
                "use an anchor at or before page {below} or at or after page {above}"
            ),
            (Some(below), None) => write!(f, "use an anchor at or before page {below}"),
            (None, Some(above)) => write!(f, "use an anchor at or after page {above}"),
            (None, None) => f.write_str("no anchor outside the block can move it"),
        }
    }
}

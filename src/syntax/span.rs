//! Half-open text ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open `[start, end)` range of byte offsets into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} is after end {}", start, end);
        Self { start, end }
    }

    /// Empty span at `offset` (a caret position).
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the span.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether `other` lies entirely inside this span.
    pub fn contains_span(&self, other: TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the spans share at least one character.
    pub fn overlaps(&self, other: TextSpan) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// Whether the spans overlap or touch. An empty span intersects a span
    /// that starts or ends at its position.
    pub fn intersects(&self, other: TextSpan) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    /// Smallest span covering both.
    pub fn cover(&self, other: TextSpan) -> TextSpan {
        TextSpan::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

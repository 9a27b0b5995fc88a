//! Candidate delimiter spans and the scanner contract that produces them.

/// How a marker run may participate in pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelimiterKind {
    /// Can only open a construct, e.g. `[` of a link.
    Opener,
    /// Can only close a construct, e.g. `]` of a link.
    Closer,
    /// Can open or close, decided by pairing, e.g. an inner `*` run.
    Both,
    /// Self-contained, resolves without a partner, e.g. an autolink.
    Full,
}

/// A candidate marker run, as half-open byte offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    pub kind: DelimiterKind,
    pub start: u32,
    pub end: u32,
}

// Delimiters are passed around by value constantly; keep them small.
const _: () = assert!(size_of::<Delimiter>() <= 12);

impl Delimiter {
    #[inline]
    pub fn new(kind: DelimiterKind, start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { kind, start, end }
    }

    /// Marker run thickness in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Residual left after consuming `n` bytes off the right edge.
    /// Used by openers that pair with only part of their run.
    #[inline]
    pub fn shaved_right(&self, n: u32) -> Self {
        debug_assert!(n <= self.len());
        Self {
            kind: self.kind,
            start: self.start,
            end: self.end - n,
        }
    }

    /// Residual left after consuming `n` bytes off the left edge.
    /// The closer-side counterpart of [`shaved_right`](Self::shaved_right).
    #[inline]
    pub fn shaved_left(&self, n: u32) -> Self {
        debug_assert!(n <= self.len());
        Self {
            kind: self.kind,
            start: self.start + n,
            end: self.end,
        }
    }
}

/// Incremental source for one hook's candidate delimiters.
///
/// `next` is handed the resume position and returns the first candidate
/// at or after it, in ascending order. Implementations are typically a
/// thin cursor over the source bytes.
pub trait DelimiterScanner {
    fn next(&mut self, pos: u32) -> Option<Delimiter>;
}

//! The hook contract: one implementation per inline construct.

use crate::delimiter::Delimiter;
use smallvec::SmallVec;

/// Anything the resolver can order positionally. Offsets are half-open
/// bytes into the source, matching [`Delimiter`].
pub trait Spanned {
    fn start(&self) -> u32;
    fn end(&self) -> u32;
}

/// Verdict of probing an opener/closer candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// The two delimiters form a construct.
    Paired,
    /// No construct; each flag reports whether that side stays viable
    /// for other partners. At least one side must be ruled out, or the
    /// resolver would probe the same pair forever.
    Unpaired { opener: bool, closer: bool },
}

/// Result of committing a pair: the replacement tokens plus whatever is
/// left of partially consumed delimiter runs.
pub struct PairOutcome<T> {
    /// Tokens replacing the pair and its inner content, almost always
    /// exactly one.
    pub tokens: SmallVec<[T; 1]>,
    /// Unconsumed left portion of the opener run, re-queued as an opener.
    pub remainder_opener: Option<Delimiter>,
    /// Unconsumed right portion of the closer run, still seeking openers.
    pub remainder_closer: Option<Delimiter>,
    /// Retire every older stacked delimiter of this hook's group, for
    /// constructs that must not nest or repeat, like links.
    pub invalidate_older: bool,
}

impl<T> PairOutcome<T> {
    /// Outcome carrying a single replacement token.
    pub fn one(token: T) -> Self {
        let mut tokens = SmallVec::new();
        tokens.push(token);
        Self {
            tokens,
            remainder_opener: None,
            remainder_closer: None,
            invalidate_older: false,
        }
    }

    /// Outcome carrying an arbitrary token sequence (possibly empty,
    /// which dissolves the pair entirely).
    pub fn many<I: IntoIterator<Item = T>>(tokens: I) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            remainder_opener: None,
            remainder_closer: None,
            invalidate_older: false,
        }
    }

    pub fn with_remainder_opener(mut self, delimiter: Delimiter) -> Self {
        self.remainder_opener = Some(delimiter);
        self
    }

    pub fn with_remainder_closer(mut self, delimiter: Delimiter) -> Self {
        self.remainder_closer = Some(delimiter);
        self
    }

    pub fn invalidating_older(mut self) -> Self {
        self.invalidate_older = true;
        self
    }
}

/// Pairing semantics for one inline construct.
///
/// A hook is stateless from the resolver's point of view: the same
/// instance is shared by every delimiter it produced, and instances are
/// told apart by address, so each construct gets its own value.
pub trait DelimiterHook<T: Spanned> {
    /// Stable identifier, used for logs and pruning windows.
    fn name(&self) -> &str;

    /// Exclusivity group. Hooks sharing a group retire each other's
    /// older delimiters when one of them pairs with
    /// [`PairOutcome::invalidate_older`] set.
    fn group(&self) -> &str {
        self.name()
    }

    /// Resolution precedence. While a strictly higher-priority
    /// delimiter is active on the stack, this hook's closers wait.
    fn priority(&self) -> u8 {
        0
    }

    /// Probe whether `opener` and `closer` pair around `inner`. Must be
    /// side-effect free: the resolver also calls it speculatively.
    fn is_pair(&self, opener: &Delimiter, closer: &Delimiter, inner: &[T]) -> Pairing;

    /// Commit a pair the probe accepted, consuming the inner tokens.
    fn process_pair(&self, opener: Delimiter, closer: Delimiter, inner: Vec<T>) -> PairOutcome<T>;

    /// Resolve a [`DelimiterKind::Full`](crate::DelimiterKind::Full)
    /// delimiter into a token. The default drops it.
    fn process_full(&self, delimiter: Delimiter) -> Option<T> {
        let _ = delimiter;
        None
    }
}

/// Hooks are compared by instance address, not by name.
pub(crate) fn same_hook<T: Spanned>(a: &dyn DelimiterHook<T>, b: &dyn DelimiterHook<T>) -> bool {
    std::ptr::addr_eq(
        a as *const dyn DelimiterHook<T>,
        b as *const dyn DelimiterHook<T>,
    )
}

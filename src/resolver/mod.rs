//! Delimiter resolution: pairs opener/closer delimiters into tokens.
//!
//! Two cooperating variants share the same stack discipline:
//!
//! 1. [`SinglePriorityResolver`] resolves a stream whose hooks all share
//!    one priority level; this is the core pairing algorithm.
//! 2. [`MultiPriorityResolver`] wraps the same structure for mixed
//!    priorities: spans claimed by higher-priority hooks are fully
//!    resolved (recursively, through [`process_delimiters`]) before any
//!    lower-priority hook sees them as opaque inner tokens.
//!
//! [`process_delimiters`] prunes provably unmatchable delimiters and
//! picks the variant. Stack items are never removed from the middle:
//! removal is truncation from the top, invalidation is a flag flip.

mod multi;
mod single;

pub use multi::MultiPriorityResolver;
pub use single::SinglePriorityResolver;

use crate::delimiter::{Delimiter, DelimiterKind, DelimiterScanner};
use crate::hook::{DelimiterHook, Spanned};
use log::{debug, trace};
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;

/// A delimiter queued for resolution, bound to the hook that produced it.
pub struct DelimiterItem<'h, T: Spanned> {
    /// Hook supplying the pairing semantics for this delimiter.
    pub hook: &'h dyn DelimiterHook<T>,
    /// The candidate marker span.
    pub delimiter: Delimiter,
    /// Once set, this item is permanently skipped in every scan.
    pub inactive: bool,
    /// Height of the token stack when this item was pushed; tokens above
    /// this floor are inner candidates for this item as opener.
    pub(crate) token_floor: usize,
}

impl<'h, T: Spanned> DelimiterItem<'h, T> {
    /// Create an active item. The token floor is assigned when the item
    /// enters a resolver's stack.
    pub fn new(hook: &'h dyn DelimiterHook<T>, delimiter: Delimiter) -> Self {
        Self {
            hook,
            delimiter,
            inactive: false,
            token_floor: 0,
        }
    }
}

/// Resolve a position-sorted delimiter stream against the background
/// `tokens`, returning the final ordered token sequence.
///
/// Prunes delimiters that provably cannot pair within their own hook's
/// window, then dispatches to the single- or multi-priority resolver
/// depending on whether the surviving hooks share one priority level.
/// With nothing left to do, `tokens` is returned unchanged.
pub fn process_delimiters<'h, T: Spanned>(
    mut items: Vec<DelimiterItem<'h, T>>,
    tokens: Vec<T>,
) -> Vec<T> {
    if items.is_empty() {
        return tokens;
    }

    prune_unmatchable(&mut items);
    items.retain(|item| !item.inactive);
    if items.is_empty() {
        return tokens;
    }

    let priority = items[0].hook.priority();
    let uniform = items.iter().all(|item| item.hook.priority() == priority);
    debug!(
        "resolving {} delimiters against {} tokens ({} priority)",
        items.len(),
        tokens.len(),
        if uniform { "single" } else { "multi" },
    );

    if uniform {
        let mut resolver = SinglePriorityResolver::new(tokens);
        for item in items {
            resolver.process(item.hook, item.delimiter);
        }
        resolver.done()
    } else {
        let mut resolver = MultiPriorityResolver::new(tokens);
        for item in items {
            resolver.process(item.hook, item.delimiter);
        }
        resolver.done()
    }
}

/// Inactivate delimiters that cannot pair within their hook's window:
/// leading closers have no possible opener before them, trailing openers
/// no possible closer after them, and a lone non-full survivor has no
/// partner at all.
fn prune_unmatchable<T: Spanned>(items: &mut [DelimiterItem<'_, T>]) {
    let mut windows: HashMap<&str, Vec<usize>, FxBuildHasher> = HashMap::default();
    for (idx, item) in items.iter().enumerate() {
        if item.inactive {
            continue;
        }
        let hook = item.hook;
        windows.entry(hook.name()).or_default().push(idx);
    }

    for indices in windows.values() {
        let mut lo = 0;
        while lo < indices.len() {
            let item = &mut items[indices[lo]];
            if item.delimiter.kind != DelimiterKind::Closer {
                break;
            }
            item.inactive = true;
            lo += 1;
        }

        let mut hi = indices.len();
        while hi > lo {
            let item = &mut items[indices[hi - 1]];
            if item.delimiter.kind != DelimiterKind::Opener {
                break;
            }
            item.inactive = true;
            hi -= 1;
        }

        // A single survivor with no partner can never resolve unless it
        // is self-contained.
        if hi == lo + 1 {
            let item = &mut items[indices[lo]];
            if item.delimiter.kind != DelimiterKind::Full {
                item.inactive = true;
            }
        }
    }
}

/// Drop stack items made stale by a pairing that collapsed the item at
/// `collapsed`: everything down to (and excluding) the nearest active
/// item that starts strictly before the collapsed opener.
pub(crate) fn cut_stale_branch<T: Spanned>(
    stack: &mut Vec<DelimiterItem<'_, T>>,
    collapsed: usize,
) {
    let pivot = stack[collapsed].delimiter.start;
    let mut top = collapsed;
    while top > 0 {
        let item = &stack[top - 1];
        if !item.inactive && item.delimiter.start < pivot {
            break;
        }
        top -= 1;
    }
    stack.truncate(top);
}

/// Flag every stack item below `up_to` sharing `group` as inactive.
/// Once one construct of a group succeeds, older competing candidates
/// of that group must never be reconsidered.
pub(crate) fn invalidate_old_delimiters<T: Spanned>(
    group: &str,
    stack: &mut [DelimiterItem<'_, T>],
    up_to: usize,
) {
    trace!("invalidating group `{group}` below stack height {up_to}");
    for item in &mut stack[..up_to] {
        if item.hook.group() == group {
            item.inactive = true;
        }
    }
}

/// Drain a scanner into delimiter items for `hook`, advancing the
/// cursor monotonically so even a stuck scanner terminates.
///
/// Items from several hooks collected this way must be merged with
/// [`sort_by_position`] before resolution.
pub fn scan_into<'h, T: Spanned>(
    hook: &'h dyn DelimiterHook<T>,
    scanner: &mut dyn DelimiterScanner,
    items: &mut Vec<DelimiterItem<'h, T>>,
) {
    let mut pos = 0u32;
    while let Some(delimiter) = scanner.next(pos) {
        pos = delimiter.end.max(pos.saturating_add(1));
        items.push(DelimiterItem::new(hook, delimiter));
    }
}

/// Stable position sort; resolvers require items in ascending textual
/// order.
pub fn sort_by_position<T: Spanned>(items: &mut [DelimiterItem<'_, T>]) {
    items.sort_by_key(|item| (item.delimiter.start, item.delimiter.end));
}

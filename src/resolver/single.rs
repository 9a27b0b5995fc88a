//! Single-priority delimiter resolution.
//!
//! The core stack algorithm: delimiters arrive in textual order, openers
//! wait on a stack, closers scan downward for the nearest same-hook
//! opener, and committed pairings splice their inner token region into
//! replacement tokens. All hooks share one priority level; nothing ever
//! needs to be deferred.

use super::{DelimiterItem, cut_stale_branch, invalidate_old_delimiters};
use crate::delimiter::{Delimiter, DelimiterKind};
use crate::hook::{DelimiterHook, Pairing, Spanned, same_hook};
use crate::limits;
use log::trace;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Resolver for a delimiter stream whose hooks share one priority.
pub struct SinglePriorityResolver<'h, T: Spanned> {
    delimiter_stack: Vec<DelimiterItem<'h, T>>,
    token_stack: Vec<T>,
    /// Background tokens (plain text runs) interleaved positionally
    /// with delimiter-derived tokens.
    initial: Peekable<IntoIter<T>>,
    /// Start offset of the previously processed delimiter; callers must
    /// feed delimiters in ascending textual order.
    last_start: u32,
}

impl<'h, T: Spanned> SinglePriorityResolver<'h, T> {
    /// Create a resolver over the positionally sorted background tokens.
    pub fn new(initial_tokens: Vec<T>) -> Self {
        Self {
            delimiter_stack: Vec::with_capacity(limits::DELIMITER_STACK_CAPACITY),
            token_stack: Vec::with_capacity(limits::TOKEN_STACK_CAPACITY),
            initial: initial_tokens.into_iter().peekable(),
            last_start: 0,
        }
    }

    /// Feed the next delimiter in textual order.
    pub fn process(&mut self, hook: &'h dyn DelimiterHook<T>, delimiter: Delimiter) {
        debug_assert!(
            delimiter.start >= self.last_start,
            "hook `{}` fed delimiter at {} after position {}",
            hook.name(),
            delimiter.start,
            self.last_start,
        );
        self.last_start = delimiter.start;

        // Keep background tokens interleaved by position.
        while let Some(token) = self.initial.next_if(|t| t.start() < delimiter.end) {
            self.token_stack.push(token);
        }

        match delimiter.kind {
            DelimiterKind::Opener => self.push(hook, delimiter),
            DelimiterKind::Both => {
                if let Some(rest) = self.consume(hook, delimiter) {
                    self.push(hook, rest);
                }
            }
            DelimiterKind::Closer => {
                // A closer that pairs with nothing contributes nothing;
                // its text surfaces through the owning hook's fallback.
                let _ = self.consume(hook, delimiter);
            }
            DelimiterKind::Full => {
                if let Some(token) = hook.process_full(delimiter) {
                    self.token_stack.push(token);
                }
            }
        }
    }

    /// Read-only probe: the nearest active same-hook opener that would
    /// pair with `closer`, if any. Stops early once a candidate rules
    /// the closer out. Commits nothing.
    pub fn find_latest_paired_delimiter(
        &self,
        hook: &dyn DelimiterHook<T>,
        closer: &Delimiter,
    ) -> Option<Delimiter> {
        for item in self.delimiter_stack.iter().rev() {
            if item.inactive || !same_hook(item.hook, hook) {
                continue;
            }
            let inner = &self.token_stack[item.token_floor..];
            match hook.is_pair(&item.delimiter, closer, inner) {
                Pairing::Paired => return Some(item.delimiter),
                Pairing::Unpaired { closer: false, .. } => return None,
                Pairing::Unpaired { .. } => {}
            }
        }
        None
    }

    /// Flush: the resolved token sequence followed by the unconsumed
    /// background suffix. Unpaired leftovers on the delimiter stack are
    /// dropped; their text surfaces through hook fallbacks.
    pub fn done(mut self) -> Vec<T> {
        let mut tokens = self.token_stack;
        tokens.extend(&mut self.initial);
        tokens
    }

    fn push(&mut self, hook: &'h dyn DelimiterHook<T>, delimiter: Delimiter) {
        self.delimiter_stack.push(DelimiterItem {
            hook,
            delimiter,
            inactive: false,
            token_floor: self.token_stack.len(),
        });
    }

    /// Pair `closer` against stacked openers, nearest first. Returns
    /// the closer thickness that remained unconsumed, if any.
    fn consume(&mut self, hook: &'h dyn DelimiterHook<T>, closer: Delimiter) -> Option<Delimiter> {
        if self.delimiter_stack.is_empty() {
            return Some(closer);
        }

        let mut remain_closer = Some(closer);
        let mut inner: Vec<T> = Vec::new();

        // One closer may pair with several stacked openers in turn.
        let mut i = self.delimiter_stack.len();
        'scan: while i > 0 {
            i -= 1;
            {
                let item = &self.delimiter_stack[i];
                if item.inactive || !same_hook(item.hook, hook) {
                    continue;
                }
            }
            let mut remain_opener = Some(self.delimiter_stack[i].delimiter);
            let floor = self.delimiter_stack[i].token_floor;

            // Tokens above the opener's floor are the enclosed region;
            // anything gathered from later iterations sits to its right.
            let mut region = self.token_stack.split_off(floor);
            region.append(&mut inner);
            inner = region;

            // Once a pairing collapses this stack slot, the original
            // item is gone; invalidation then applies to nothing.
            let mut collapsed = false;

            while let (Some(opener), Some(cl)) = (remain_opener, remain_closer) {
                match hook.is_pair(&opener, &cl, &inner) {
                    Pairing::Paired => {
                        trace!(
                            "hook `{}` paired [{}, {}) with [{}, {})",
                            hook.name(),
                            opener.start,
                            opener.end,
                            cl.start,
                            cl.end,
                        );
                        let outcome = hook.process_pair(opener, cl, std::mem::take(&mut inner));
                        inner = outcome.tokens.into_vec();
                        remain_opener = outcome.remainder_opener;
                        remain_closer = outcome.remainder_closer;
                        collapsed = true;

                        cut_stale_branch(&mut self.delimiter_stack, i);
                        // The scan index must never exceed the new
                        // stack length after a truncation.
                        i = i.min(self.delimiter_stack.len());

                        if outcome.invalidate_older {
                            invalidate_old_delimiters(
                                hook.group(),
                                &mut self.delimiter_stack,
                                i,
                            );
                            break 'scan;
                        }

                        match remain_opener {
                            Some(rest) => self.push(hook, rest),
                            None => break,
                        }
                    }
                    Pairing::Unpaired {
                        opener: opener_viable,
                        closer: closer_viable,
                    } => {
                        if opener_viable && closer_viable {
                            debug_assert!(
                                false,
                                "hook `{}`: an unpaired probe must rule out a side",
                                hook.name(),
                            );
                            break;
                        }
                        if !opener_viable {
                            if !collapsed {
                                self.delimiter_stack[i].inactive = true;
                            }
                            remain_opener = None;
                        }
                        if !closer_viable {
                            remain_closer = None;
                        }
                    }
                }
            }

            if remain_closer.is_none() {
                break;
            }
        }

        if !inner.is_empty() {
            self.token_stack.append(&mut inner);
        }
        remain_closer
    }
}

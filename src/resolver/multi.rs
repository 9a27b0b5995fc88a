//! Multi-priority delimiter resolution.
//!
//! Same stack discipline as the single-priority variant, with one extra
//! rule: while a strictly higher-priority delimiter is active on the
//! stack, incoming closers cannot commit yet (their inner span might
//! still be reshaped), so they are deferred onto the stack. When a
//! pairing does run, everything pushed after the opener candidate is
//! first resolved recursively through [`process_delimiters`], so the
//! candidate hook only ever sees fully resolved inner tokens.

use super::{DelimiterItem, cut_stale_branch, invalidate_old_delimiters, process_delimiters};
use crate::delimiter::{Delimiter, DelimiterKind};
use crate::hook::{DelimiterHook, Pairing, Spanned, same_hook};
use crate::limits;
use log::trace;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Resolver for a delimiter stream with heterogeneous hook priorities.
pub struct MultiPriorityResolver<'h, T: Spanned> {
    delimiter_stack: Vec<DelimiterItem<'h, T>>,
    token_stack: Vec<T>,
    /// Background tokens interleaved positionally with resolved output.
    initial: Peekable<IntoIter<T>>,
    /// Start offset of the previously processed delimiter.
    last_start: u32,
}

impl<'h, T: Spanned> MultiPriorityResolver<'h, T> {
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

        while let Some(token) = self.initial.next_if(|t| t.start() < delimiter.end) {
            self.token_stack.push(token);
        }

        match delimiter.kind {
            DelimiterKind::Opener => self.push(hook, delimiter),
            DelimiterKind::Both => {
                if self.gated(hook.priority()) {
                    self.push(hook, delimiter);
                } else if let Some(rest) = self.consume(hook, delimiter) {
                    self.push(hook, rest);
                }
            }
            DelimiterKind::Closer => {
                if self.gated(hook.priority()) {
                    // Defer: an active higher-priority span may still
                    // reshape this closer's inner content.
                    self.push(hook, delimiter);
                } else {
                    let _ = self.consume(hook, delimiter);
                }
            }
            DelimiterKind::Full => {
                if let Some(token) = hook.process_full(delimiter) {
                    self.token_stack.push(token);
                }
            }
        }
    }

    /// Read-only probe; see the single-priority counterpart.
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

    /// Flush: deferred and leftover delimiters still on the stack are
    /// resolved recursively before the unconsumed background suffix is
    /// appended.
    pub fn done(mut self) -> Vec<T> {
        let stack = std::mem::take(&mut self.delimiter_stack);
        let pending = std::mem::take(&mut self.token_stack);
        let mut tokens = process_delimiters(stack, pending);
        tokens.extend(&mut self.initial);
        tokens
    }

    /// True while an active stack item outranks `priority`.
    fn gated(&self, priority: u8) -> bool {
        self.delimiter_stack
            .iter()
            .any(|item| !item.inactive && item.hook.priority() > priority)
    }

    fn push(&mut self, hook: &'h dyn DelimiterHook<T>, delimiter: Delimiter) {
        self.delimiter_stack.push(DelimiterItem {
            hook,
            delimiter,
            inactive: false,
            token_floor: self.token_stack.len(),
        });
    }

    /// Pair `closer` against stacked openers, nearest first, resolving
    /// each candidate's deeper (higher-or-equal priority) region into
    /// opaque tokens before the hook inspects it.
    fn consume(&mut self, hook: &'h dyn DelimiterHook<T>, closer: Delimiter) -> Option<Delimiter> {
        if self.delimiter_stack.is_empty() {
            return Some(closer);
        }

        let mut remain_closer = Some(closer);
        let mut inner: Vec<T> = Vec::new();

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

            // Everything pushed after this opener was deferred or
            // outranks us; collapse it to plain tokens first so the
            // hook sees the nested region fully resolved.
            let deferred = self.delimiter_stack.split_off(i + 1);
            let region = self.token_stack.split_off(floor);
            let mut resolved = process_delimiters(deferred, region);
            resolved.append(&mut inner);
            inner = resolved;

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

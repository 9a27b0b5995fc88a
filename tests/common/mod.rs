//! Shared fixtures: a small token tree, construct hooks, and an
//! asterisk-run scanner, enough to drive the resolver end to end.

#![allow(dead_code)]

use delimark::{
    Delimiter, DelimiterHook, DelimiterItem, DelimiterKind, DelimiterScanner, PairOutcome,
    Pairing, Spanned,
};
use memchr::memchr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tok {
    Text(u32, u32),
    Em(u32, u32, Vec<Tok>),
    Strong(u32, u32, Vec<Tok>),
    Code(u32, u32),
    Link(u32, u32, Vec<Tok>),
}

impl Spanned for Tok {
    fn start(&self) -> u32 {
        match self {
            Tok::Text(s, _)
            | Tok::Em(s, _, _)
            | Tok::Strong(s, _, _)
            | Tok::Code(s, _)
            | Tok::Link(s, _, _) => *s,
        }
    }
    fn end(&self) -> u32 {
        match self {
            Tok::Text(_, e)
            | Tok::Em(_, e, _)
            | Tok::Strong(_, e, _)
            | Tok::Code(_, e)
            | Tok::Link(_, e, _) => *e,
        }
    }
}

/// Emphasis: always pairs, consumes up to two marker bytes per pairing
/// and re-queues thicker runs as residual delimiters.
pub struct EmphasisHook;

impl DelimiterHook<Tok> for EmphasisHook {
    fn name(&self) -> &str {
        "emphasis"
    }
    fn priority(&self) -> u8 {
        1
    }
    fn is_pair(&self, _: &Delimiter, _: &Delimiter, _: &[Tok]) -> Pairing {
        Pairing::Paired
    }
    fn process_pair(&self, opener: Delimiter, closer: Delimiter, inner: Vec<Tok>) -> PairOutcome<Tok> {
        let thickness = opener.len().min(closer.len()).min(2);
        let start = opener.end - thickness;
        let end = closer.start + thickness;
        let token = if thickness == 2 {
            Tok::Strong(start, end, inner)
        } else {
            Tok::Em(start, end, inner)
        };
        let mut outcome = PairOutcome::one(token);
        if opener.len() > thickness {
            outcome = outcome.with_remainder_opener(opener.shaved_right(thickness));
        }
        if closer.len() > thickness {
            outcome = outcome.with_remainder_closer(closer.shaved_left(thickness));
        }
        outcome
    }
}

/// Code span: outranks everything, pairs equally thick runs only, and
/// flattens whatever the enclosed region held.
pub struct CodeSpanHook;

impl DelimiterHook<Tok> for CodeSpanHook {
    fn name(&self) -> &str {
        "code-span"
    }
    fn priority(&self) -> u8 {
        10
    }
    fn is_pair(&self, opener: &Delimiter, closer: &Delimiter, _: &[Tok]) -> Pairing {
        if opener.len() == closer.len() {
            Pairing::Paired
        } else {
            Pairing::Unpaired {
                opener: true,
                closer: false,
            }
        }
    }
    fn process_pair(&self, opener: Delimiter, closer: Delimiter, _: Vec<Tok>) -> PairOutcome<Tok> {
        PairOutcome::one(Tok::Code(opener.start, closer.end))
    }
}

/// Link: always pairs, and a successful pairing retires every older
/// bracket opener so links never nest.
pub struct LinkHook;

impl DelimiterHook<Tok> for LinkHook {
    fn name(&self) -> &str {
        "link"
    }
    fn group(&self) -> &str {
        "bracket"
    }
    fn is_pair(&self, _: &Delimiter, _: &Delimiter, _: &[Tok]) -> Pairing {
        Pairing::Paired
    }
    fn process_pair(&self, opener: Delimiter, closer: Delimiter, inner: Vec<Tok>) -> PairOutcome<Tok> {
        PairOutcome::one(Tok::Link(opener.start, closer.end, inner)).invalidating_older()
    }
}

/// Locates `*` runs and classifies them by flanking whitespace, a
/// simplified cut of the CommonMark flanking rules.
pub struct AsteriskScanner<'a> {
    text: &'a [u8],
}

impl<'a> AsteriskScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text: text.as_bytes(),
        }
    }
}

impl DelimiterScanner for AsteriskScanner<'_> {
    fn next(&mut self, pos: u32) -> Option<Delimiter> {
        let mut at = (pos as usize).min(self.text.len());
        loop {
            let start = at + memchr(b'*', &self.text[at..])?;
            let mut end = start + 1;
            while end < self.text.len() && self.text[end] == b'*' {
                end += 1;
            }
            let ws_before = start == 0 || self.text[start - 1].is_ascii_whitespace();
            let ws_after = end == self.text.len() || self.text[end].is_ascii_whitespace();
            let kind = match (ws_before, ws_after) {
                (true, false) => DelimiterKind::Opener,
                (false, true) => DelimiterKind::Closer,
                (false, false) => DelimiterKind::Both,
                // Whitespace on both sides: literal asterisks.
                (true, true) => {
                    at = end;
                    continue;
                }
            };
            return Some(Delimiter::new(kind, start as u32, end as u32));
        }
    }
}

/// Text tokens for the gaps between delimiters, covering `len` bytes.
pub fn background_tokens(len: u32, items: &[DelimiterItem<'_, Tok>]) -> Vec<Tok> {
    let mut out = Vec::new();
    let mut pos = 0;
    for item in items {
        if item.delimiter.start > pos {
            out.push(Tok::Text(pos, item.delimiter.start));
        }
        pos = item.delimiter.end;
    }
    if pos < len {
        out.push(Tok::Text(pos, len));
    }
    out
}

/// Every token's span must sit inside `[0, len)`, siblings must be
/// sorted and disjoint, and children must nest inside their parent.
pub fn assert_well_formed(tokens: &[Tok], lo: u32, hi: u32) {
    let mut pos = lo;
    for token in tokens {
        assert!(token.start() >= pos, "overlap or disorder at {token:?}");
        assert!(token.end() <= hi, "token {token:?} escapes [{lo}, {hi})");
        assert!(token.start() < token.end(), "empty token {token:?}");
        match token {
            Tok::Em(s, e, inner) | Tok::Strong(s, e, inner) | Tok::Link(s, e, inner) => {
                assert_well_formed(inner, *s, *e);
            }
            Tok::Text(..) | Tok::Code(..) => {}
        }
        pos = token.end();
    }
}

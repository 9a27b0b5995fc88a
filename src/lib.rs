//! delimark resolves inline delimiter runs into a token tree.
//!
//! CommonMark and GFM inline constructs (emphasis, links, code spans,
//! strikethrough) are all bracketed by paired markers whose matching
//! rules differ per construct. This crate factors that out: hooks
//! describe one construct each through [`DelimiterHook`], scanners
//! locate candidate markers, and the resolver pairs them against a
//! stack, nesting tokens inside-out.
//!
//! The engine is agnostic to the token type. Anything implementing
//! [`Spanned`] (half-open `u32` byte offsets) can flow through it, so
//! callers keep full control over their AST.
//!
//! ```
//! use delimark::{
//!     Delimiter, DelimiterHook, DelimiterItem, DelimiterKind, PairOutcome, Pairing,
//!     Spanned, process_delimiters,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! enum Node {
//!     Text(u32, u32),
//!     Em(u32, u32, Vec<Node>),
//! }
//!
//! impl Spanned for Node {
//!     fn start(&self) -> u32 {
//!         match self {
//!             Node::Text(s, _) | Node::Em(s, _, _) => *s,
//!         }
//!     }
//!     fn end(&self) -> u32 {
//!         match self {
//!             Node::Text(_, e) | Node::Em(_, e, _) => *e,
//!         }
//!     }
//! }
//!
//! struct Emphasis;
//!
//! impl DelimiterHook<Node> for Emphasis {
//!     fn name(&self) -> &str {
//!         "emphasis"
//!     }
//!     fn is_pair(&self, _: &Delimiter, _: &Delimiter, _: &[Node]) -> Pairing {
//!         Pairing::Paired
//!     }
//!     fn process_pair(&self, o: Delimiter, c: Delimiter, inner: Vec<Node>) -> PairOutcome<Node> {
//!         PairOutcome::one(Node::Em(o.start, c.end, inner))
//!     }
//! }
//!
//! // "a *b* c": text around one starred word.
//! let emphasis = Emphasis;
//! let items = vec![
//!     DelimiterItem::new(&emphasis, Delimiter::new(DelimiterKind::Opener, 2, 3)),
//!     DelimiterItem::new(&emphasis, Delimiter::new(DelimiterKind::Closer, 4, 5)),
//! ];
//! let tokens = vec![Node::Text(0, 2), Node::Text(3, 4), Node::Text(5, 7)];
//! let out = process_delimiters(items, tokens);
//! assert_eq!(
//!     out,
//!     vec![
//!         Node::Text(0, 2),
//!         Node::Em(2, 5, vec![Node::Text(3, 4)]),
//!         Node::Text(5, 7),
//!     ]
//! );
//! ```

pub mod delimiter;
pub mod hook;
pub mod limits;
pub mod resolver;

pub use delimiter::{Delimiter, DelimiterKind, DelimiterScanner};
pub use hook::{DelimiterHook, PairOutcome, Pairing, Spanned};
pub use resolver::{
    DelimiterItem, MultiPriorityResolver, SinglePriorityResolver, process_delimiters, scan_into,
    sort_by_position,
};

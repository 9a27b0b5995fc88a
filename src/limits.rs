//! Allocation tuning constants.
//!
//! Typical inline runs carry a handful of delimiters; these capacities
//! keep the common case allocation-free after the first growth.

/// Initial capacity of the delimiter stack.
pub const DELIMITER_STACK_CAPACITY: usize = 16;

/// Initial capacity of the token stack.
pub const TOKEN_STACK_CAPACITY: usize = 32;

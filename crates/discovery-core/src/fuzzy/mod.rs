//! Fuzzy User Search
//!
//! Token-based matching of a query against the search corpus:
//!
//! 1. The query is split on whitespace; every piece must match a corpus
//!    string for it to be considered (logical AND).
//! 2. Each piece is compiled into accent-folding character classes
//!    (`e` matches `eéèêë`, ...). All-lower-case pieces ignore case; a piece
//!    with any capital letter is case-sensitive.
//! 3. The leftmost match of each piece is scored by how much of the string it
//!    covers, with ×4 for starting on a word boundary and ×2 for ending on one.
//! 4. Strings are ranked by summed score, mapped to users, and deduplicated.
//!
//! # Example
//!
//! ```rust
//! use discovery_core::fuzzy::{score_span, SubQueryPattern};
//!
//! let text: Vec<char> = "José".chars().collect();
//! let span = SubQueryPattern::compile("jose").find(&text).unwrap();
//! assert_eq!(score_span(span, &text), 800);
//! ```

mod engine;
mod pattern;

pub use engine::{ScoredMatch, SearchConfig, SearchIndex};
pub use pattern::{score_span, Span, SubQueryPattern, FOLDS};

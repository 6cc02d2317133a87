//! Game rules: the feature-matching set predicate.
//!
//! The engine knows a single rule: `k` cards form a set when every
//! feature dimension is either all-same or all-different. Everything
//! else (who scores, when the table is reshuffled) lives in the dealer.

pub mod validator;

pub use validator::SetValidator;

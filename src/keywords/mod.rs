//! Keyword matching module
//!
//! Turns the keyword list into compiled whole-word patterns and tests page text
//! against them.

mod matcher;

pub use matcher::{KeywordHit, KeywordMatcher};

//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the lifecycle of a single URL within one site's crawl

mod page_state;

pub use page_state::PageState;

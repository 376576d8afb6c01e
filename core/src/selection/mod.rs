//! Interactive series selection
//!
//! Walks a [`crate::tree::Tree`] level by level, prompting only where a
//! level offers more than one choice.

mod ranges;
mod selector;

pub use ranges::{parse_indices, parse_ints};
pub use selector::{select_cmdline, Selector};

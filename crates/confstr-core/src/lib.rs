//! Zero-copy scanning of `key=value` config strings.
//!
//! This crate provides the lexical layer shared by the validator and the
//! CLI: a cursor that walks the pairs of a config or check string, opens
//! sub-cursors over nested list values, and resolves keys without copying
//! any of the input.

pub mod error;
pub mod item;
pub mod parse;

pub use error::{ParseError, Result};
pub use item::{Item, ItemKind};
pub use parse::Parser;

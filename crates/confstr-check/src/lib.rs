//! Validation of application config strings against declarative check
//! strings.
//!
//! A check string maps each recognized key to its constraint group
//! (`type`, `min`, `max`, `choices`); [`validate`] walks the config string
//! key by key and returns the first violated constraint with the offending
//! slices attached.

pub mod errors;
pub mod validate;

pub use errors::{Issue, ValidationError};
pub use validate::validate;

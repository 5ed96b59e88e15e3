//! Documentation about the crate that doesn't belong to any specific item.

pub mod design;

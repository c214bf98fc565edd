//! Line parsing and expansion helpers used while loading a store.

pub mod expand;
pub mod line;

pub use expand::{expand_home, expand_path, expand_path_with};
pub use line::{Line, classify};

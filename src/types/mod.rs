pub mod entry;
pub mod error;

pub use entry::Entry;
pub use error::{CupidError, Result};

//! Entry pass records and the remote source they come from

pub mod format;
pub mod records;
pub mod source;

pub use records::PassRecord;
pub use source::{HttpPassSource, PassSource, DEFAULT_ENDPOINT};

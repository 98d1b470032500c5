//! Local search over the fetched pass collection
//!
//! The remote endpoint cannot filter, so every query is answered here.

pub mod engine;
pub mod parser;


pub use engine::apply_query;

//! Classification evaluation engine
//!
//! Facade over [`classeval_core`]; see that crate for the full API.

pub use classeval_core::*;

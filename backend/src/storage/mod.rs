//! # Storage Layer
//!
//! Persistence abstractions and the JSON-file-backed stub store that stands
//! in for a real backend. The domain layer only ever sees the traits in
//! [`traits`]; the [`json`] module is one interchangeable implementation.

pub mod json;
pub mod traits;

pub use traits::*;

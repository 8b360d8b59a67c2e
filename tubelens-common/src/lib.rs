//! Shared infrastructure for the TubeLens crates.
//!
//! Currently this is just the observability setup; domain errors live in
//! the crates that raise them.

pub mod observability;

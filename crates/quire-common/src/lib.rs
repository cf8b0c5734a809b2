//! Common utilities for the Quire layout engine.
//!
//! This crate provides shared infrastructure used by all layout components:
//! - **Warning System** - deduplicated diagnostics for recoverable problems

pub mod warning;

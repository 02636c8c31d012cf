//! # Kivi FFI
//!
//! Stable C ABI over the [`kivi_bridge`] accessor surface.
//!
//! This crate provides:
//! - C-compatible function exports for the full operation set
//! - Memory ownership conventions (Rust allocates, callers free through
//!   the matching `kivi_free_*` function)
//! - Error code mapping with a per-thread last-error message
//! - Buffer and string carriers

#![warn(missing_docs)]

pub mod buffer;
pub mod error;
pub mod instance;

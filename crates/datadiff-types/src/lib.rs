//! Value model for datadiff.
//!
//! Structural diffs compare in-memory value graphs. This crate provides the
//! dynamically typed [`Value`] those graphs are made of, and the [`Shape`]
//! adapter the diff engine uses to decide which comparison strategy applies.
//!
//! # Key Types
//!
//! - [`Value`] -- A scalar, sequence, mapping, set, or opaque value
//! - [`Shape`] / [`SequenceKind`] -- The diffing capability a value exposes

pub mod convert;
pub mod shape;
pub mod value;

pub use shape::{SequenceKind, Shape};
pub use value::Value;

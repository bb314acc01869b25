//! Structural diff engine for composite values.
//!
//! Compares two [`Value`]s and produces a [`DiffResult`]: a typed record of
//! deletions, insertions, retained context and nested sub-diffs, rendered by
//! its `Display` impl in a unified-diff-like format.
//!
//! # Key Types
//!
//! - [`Differ`] / [`DiffConfig`] -- Configured engine (context size, depth limit, alignment)
//! - [`DiffResult`] / [`DiffOperation`] / [`DiffItem`] -- The diff record
//! - [`DiffError`] -- Type mismatch, unsupported type, unhashable element, depth limit
//! - [`Surrogate`] -- Hashable stand-in used for alignment and membership
//!
//! # Example
//!
//! ```
//! use datadiff_engine::{diff, Value};
//!
//! let a = Value::list([1, 2, 3]);
//! let b = Value::list([1, 3]);
//! let d = diff(&a, &b).unwrap();
//! assert_eq!(d.to_string(), "--- a\n+++ b\n[\n@@ -0,2 +0,1 @@\n 1,\n-2,\n 3,\n]");
//! ```

pub mod align;
pub mod config;
pub mod dispatch;
pub mod error;
mod mapping;
pub mod render;
pub mod result;
mod sequence;
mod set;
pub mod surrogate;
mod text;

pub use align::ContextWindow;
pub use config::{Alignment, DiffConfig};
pub use datadiff_types::Value;
pub use dispatch::{comparable, diff, Differ};
pub use error::{DiffError, Result};
pub use render::LineKind;
pub use result::{DataType, DiffBuilder, DiffItem, DiffOperation, DiffResult};
pub use surrogate::Surrogate;

//! Hashable stand-ins for values.
//!
//! Alignment and membership tests need `Eq + Hash`, which [`Value`] cannot
//! provide (it holds floats, order-insensitive maps and opaque values). A
//! [`Surrogate`] is derived from a value purely for comparison and is never
//! displayed; the diff keeps referring to the original value.
//!
//! - sequences become tuples tagged with their type name
//! - maps become sets of key/value pairs
//! - sets become sets of members
//! - opaque values have no surrogate and fail with [`DiffError::Unhashable`]

use std::collections::BTreeSet;

use datadiff_types::Value;

use crate::error::{DiffError, Result};

/// A hashable, totally ordered key standing in for a [`Value`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Surrogate<'a> {
    Null,
    Bool(bool),
    Int(i64),
    /// Normalized bit pattern of the float.
    Float(u64),
    Str(&'a str),
    Tuple(&'a str, Vec<Surrogate<'a>>),
    Pairs(BTreeSet<(Surrogate<'a>, Surrogate<'a>)>),
    Members(BTreeSet<Surrogate<'a>>),
}

impl<'a> Surrogate<'a> {
    /// Build the surrogate for `value`, nesting at most `max_depth` levels.
    pub fn of(value: &'a Value, max_depth: usize) -> Result<Self> {
        Self::build(value, max_depth, 0)
    }

    fn build(value: &'a Value, limit: usize, depth: usize) -> Result<Self> {
        if depth > limit {
            return Err(DiffError::DepthLimitExceeded { limit });
        }
        let child = |v: &'a Value| Self::build(v, limit, depth + 1);
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(i) => Self::Int(*i),
            Value::Float(x) => Self::Float(float_bits(*x)),
            Value::Str(s) => Self::Str(s),
            Value::List(items) | Value::Tuple(items) | Value::Iterable { items, .. } => Self::Tuple(
                value.type_name(),
                items.iter().map(child).collect::<Result<_>>()?,
            ),
            Value::Map(entries) => Self::Pairs(
                entries
                    .iter()
                    .map(|(k, v)| -> Result<_> { Ok((child(k)?, child(v)?)) })
                    .collect::<Result<_>>()?,
            ),
            Value::Set { members, .. } => {
                Self::Members(members.iter().map(child).collect::<Result<_>>()?)
            }
            Value::Opaque { repr, .. } => return Err(DiffError::Unhashable(repr.clone())),
        })
    }

    /// A 64-bit digest of the surrogate, stable across runs and platforms.
    ///
    /// Used to order mapping keys that have no natural order.
    pub fn digest(&self) -> u64 {
        let mut hasher = blake3::Hasher::new();
        self.feed(&mut hasher);
        let hash = hasher.finalize();
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(buf)
    }

    fn feed(&self, hasher: &mut blake3::Hasher) {
        match self {
            Self::Null => {
                hasher.update(&[0]);
            }
            Self::Bool(b) => {
                hasher.update(&[1, u8::from(*b)]);
            }
            Self::Int(i) => {
                hasher.update(&[2]);
                hasher.update(&i.to_le_bytes());
            }
            Self::Float(bits) => {
                hasher.update(&[3]);
                hasher.update(&bits.to_le_bytes());
            }
            Self::Str(s) => {
                hasher.update(&[4]);
                feed_str(hasher, s);
            }
            Self::Tuple(name, items) => {
                hasher.update(&[5]);
                feed_str(hasher, name);
                feed_len(hasher, items.len());
                for item in items {
                    item.feed(hasher);
                }
            }
            Self::Pairs(pairs) => {
                hasher.update(&[6]);
                feed_len(hasher, pairs.len());
                for (k, v) in pairs {
                    k.feed(hasher);
                    v.feed(hasher);
                }
            }
            Self::Members(members) => {
                hasher.update(&[7]);
                feed_len(hasher, members.len());
                for member in members {
                    member.feed(hasher);
                }
            }
        }
    }
}

fn feed_len(hasher: &mut blake3::Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn feed_str(hasher: &mut blake3::Hasher, s: &str) {
    feed_len(hasher, s.len());
    hasher.update(s.as_bytes());
}

/// Positive and negative zero share a surrogate, as do all NaNs.
fn float_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else if x.is_nan() {
        f64::NAN.to_bits()
    } else {
        x.to_bits()
    }
}

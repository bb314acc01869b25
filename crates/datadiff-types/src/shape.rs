//! Capability adapters over [`Value`].
//!
//! The diff engine picks a strategy by asking a value for its [`Shape`] and
//! dispatching on that closed set of capabilities.

use crate::value::Value;

/// The diffing capability a value exposes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape<'a> {
    /// A string. Only strings spanning several lines are diffable.
    Text(&'a str),
    /// Key lookup plus iteration over keys.
    Mapping(&'a [(Value, Value)]),
    /// Membership, intersection and difference.
    SetLike { name: &'a str, members: &'a [Value] },
    /// Indexed iteration.
    Sequence {
        kind: SequenceKind<'a>,
        items: &'a [Value],
    },
    /// Nothing to diff structurally.
    Scalar,
}

/// Which kind of ordered container a sequence came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceKind<'a> {
    List,
    Tuple,
    /// A custom iterable with its type name.
    Iterable(&'a str),
}

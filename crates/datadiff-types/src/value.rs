use std::fmt;

use crate::shape::{SequenceKind, Shape};

/// A dynamically typed value that can be compared structurally.
///
/// Every value has a type name (see [`Value::type_name`]) which the diff
/// engine uses for type checks, and a literal representation (its `Display`
/// output) which is what diff reports print for each item.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string. Strings spanning several lines are diffed line by line.
    Str(String),
    /// An ordered, mutable-style sequence.
    List(Vec<Value>),
    /// An ordered, fixed sequence.
    Tuple(Vec<Value>),
    /// Key-value pairs in insertion order. Keys are unique.
    Map(Vec<(Value, Value)>),
    /// An unordered collection of distinct members.
    Set { name: String, members: Vec<Value> },
    /// A named ordered collection that is neither a list nor a tuple.
    Iterable { name: String, items: Vec<Value> },
    /// A value with no diffable structure and no stable hash.
    Opaque { name: String, repr: String },
}

impl Value {
    /// Build a list from anything convertible into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a tuple from anything convertible into values.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a map. A repeated key overwrites the earlier value in place.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match out.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Self::Map(out)
    }

    /// Build a plain `set`. Duplicate members are dropped.
    pub fn set<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::named_set("set", members)
    }

    /// Build a set-like value with a custom type name.
    pub fn named_set<I, T>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut out: Vec<Value> = Vec::new();
        for member in members {
            let member = member.into();
            if !out.contains(&member) {
                out.push(member);
            }
        }
        Self::Set {
            name: name.into(),
            members: out,
        }
    }

    /// Build a named ordered collection, rendered as `name([...])`.
    pub fn iterable<I, T>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Iterable {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Build an opaque value with the given type name and representation.
    pub fn opaque(name: impl Into<String>, repr: impl Into<String>) -> Self {
        Self::Opaque {
            name: name.into(),
            repr: repr.into(),
        }
    }

    /// The runtime type name used for type checks and error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Set { name, .. } | Self::Iterable { name, .. } | Self::Opaque { name, .. } => {
                name.as_str()
            }
        }
    }

    /// The diffing capability this value exposes.
    pub fn shape(&self) -> Shape<'_> {
        match self {
            Self::Str(s) => Shape::Text(s),
            Self::Map(entries) => Shape::Mapping(entries),
            Self::Set { name, members } => Shape::SetLike { name, members },
            Self::List(items) => Shape::Sequence {
                kind: SequenceKind::List,
                items,
            },
            Self::Tuple(items) => Shape::Sequence {
                kind: SequenceKind::Tuple,
                items,
            },
            Self::Iterable { name, items } => Shape::Sequence {
                kind: SequenceKind::Iterable(name),
                items,
            },
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::Opaque { .. } => {
                Shape::Scalar
            }
        }
    }

    /// Look up a key in a map. Returns `None` for non-map values.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Self::Map(entries) => lookup(entries, key),
            _ => None,
        }
    }
}

fn lookup<'a>(entries: &'a [(Value, Value)], key: &Value) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(candidate, _)| candidate == key)
        .map(|(_, value)| value)
}

fn same_members(a: &[Value], b: &[Value]) -> bool {
    a.iter().all(|m| b.contains(m)) && b.iter().all(|m| a.contains(m))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            // NaN equals NaN so that every value equals itself.
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| lookup(b, k) == Some(v))
            }
            // Set equality is membership only, regardless of the set's name.
            (Self::Set { members: a, .. }, Self::Set { members: b, .. }) => same_members(a, b),
            (
                Self::Iterable { name: na, items: a },
                Self::Iterable { name: nb, items: b },
            ) => na == nb && a == b,
            (
                Self::Opaque { name: na, repr: ra },
                Self::Opaque { name: nb, repr: rb },
            ) => na == nb && ra == rb,
            _ => false,
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// The literal representation printed in diff reports.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Set {
                name,
                members: items,
            }
            | Self::Iterable { name, items } => {
                write!(f, "{name}([")?;
                write_items(f, items)?;
                f.write_str("])")
            }
            Self::Opaque { repr, .. } => f.write_str(repr),
        }
    }
}

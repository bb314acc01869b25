//! The diff record: typed operations over borrowed items, assembled by an
//! append-only builder and immutable afterwards.

use std::fmt;

use datadiff_types::Value;

use crate::align::ContextWindow;

/// One item in a delete/insert/equal payload, borrowed from the inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiffItem<'a> {
    /// An element of a sequence or set.
    Value(&'a Value),
    /// A key/value entry of a mapping, printed as `key: value`.
    Entry(&'a Value, &'a Value),
    /// One line of a multi-line string, printed verbatim.
    Line(&'a str),
}

impl fmt::Display for DiffItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Entry(k, v) => write!(f, "{k}: {v}"),
            Self::Line(line) => f.write_str(line),
        }
    }
}

/// A single operation in a [`DiffResult`].
#[derive(Clone, Debug, PartialEq)]
pub enum DiffOperation<'a> {
    /// Items present only on the left.
    Delete(Vec<DiffItem<'a>>),
    /// Items present only on the right.
    Insert(Vec<DiffItem<'a>>),
    /// Items present on both sides.
    Equal(Vec<DiffItem<'a>>),
    /// Start of a hunk.
    Context(ContextWindow),
    /// Unchanged items were left out here.
    Elision,
    /// A replaced element that could itself be diffed.
    Nested(Box<DiffResult<'a>>),
}

impl DiffOperation<'_> {
    /// Whether this operation records an actual difference.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Delete(_) | Self::Insert(_) | Self::Nested(_))
    }

    /// Whether this operation is a context or elision marker.
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Context(_) | Self::Elision)
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Delete(items) | Self::Insert(items) | Self::Equal(items) => items.is_empty(),
            Self::Nested(nested) => nested.operations.is_empty(),
            Self::Context(_) | Self::Elision => false,
        }
    }
}

/// The kind of container a diff was computed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType<'a> {
    List,
    Tuple,
    Mapping,
    /// A set-like value with its type name.
    Set(&'a str),
    /// A custom iterable with its type name.
    Iterable(&'a str),
    /// A multi-line string.
    Text,
}

impl DataType<'_> {
    /// The `(open, close)` delimiter strings printed around the operations.
    pub fn delimiters(&self) -> (String, String) {
        match self {
            Self::List => ("[".into(), "]".into()),
            Self::Tuple => ("(".into(), ")".into()),
            Self::Mapping => ("{".into(), "}".into()),
            Self::Set(name) | Self::Iterable(name) => (format!("{name}(["), "])".into()),
            Self::Text => (String::new(), String::new()),
        }
    }
}

impl fmt::Display for DataType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("list"),
            Self::Tuple => f.write_str("tuple"),
            Self::Mapping => f.write_str("map"),
            Self::Set(name) | Self::Iterable(name) => f.write_str(name),
            Self::Text => f.write_str("text"),
        }
    }
}

/// The structural difference between two values.
///
/// Rendered with `Display` as a unified-diff-like report. A result with no
/// operations renders as the empty string.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffResult<'a> {
    pub(crate) data_type: DataType<'a>,
    pub(crate) open: String,
    pub(crate) close: String,
    pub(crate) operations: Vec<DiffOperation<'a>>,
}

impl<'a> DiffResult<'a> {
    /// The container kind this diff was computed over.
    pub fn data_type(&self) -> DataType<'a> {
        self.data_type
    }

    /// The opening delimiter.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing delimiter.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// The recorded operations, in order.
    pub fn operations(&self) -> &[DiffOperation<'a>] {
        &self.operations
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns `true` if any operation is a delete, insert, or nested diff.
    pub fn has_changes(&self) -> bool {
        self.operations.iter().any(DiffOperation::is_change)
    }

    /// Number of deleted items at this level (nested diffs not included).
    pub fn deletions(&self) -> usize {
        self.operations
            .iter()
            .map(|op| match op {
                DiffOperation::Delete(items) => items.len(),
                _ => 0,
            })
            .sum()
    }

    /// Number of inserted items at this level (nested diffs not included).
    pub fn insertions(&self) -> usize {
        self.operations
            .iter()
            .map(|op| match op {
                DiffOperation::Insert(items) => items.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Append-only builder for a [`DiffResult`].
///
/// Operations with an empty payload are dropped.
#[derive(Debug)]
pub struct DiffBuilder<'a> {
    data_type: DataType<'a>,
    operations: Vec<DiffOperation<'a>>,
}

impl<'a> DiffBuilder<'a> {
    pub fn new(data_type: DataType<'a>) -> Self {
        Self {
            data_type,
            operations: Vec::new(),
        }
    }

    pub fn push(&mut self, op: DiffOperation<'a>) -> &mut Self {
        if !op.is_empty() {
            self.operations.push(op);
        }
        self
    }

    pub fn delete(&mut self, items: impl IntoIterator<Item = DiffItem<'a>>) -> &mut Self {
        self.push(DiffOperation::Delete(items.into_iter().collect()))
    }

    pub fn insert(&mut self, items: impl IntoIterator<Item = DiffItem<'a>>) -> &mut Self {
        self.push(DiffOperation::Insert(items.into_iter().collect()))
    }

    pub fn equal(&mut self, items: impl IntoIterator<Item = DiffItem<'a>>) -> &mut Self {
        self.push(DiffOperation::Equal(items.into_iter().collect()))
    }

    pub fn context(&mut self, window: ContextWindow) -> &mut Self {
        self.push(DiffOperation::Context(window))
    }

    pub fn elision(&mut self) -> &mut Self {
        self.push(DiffOperation::Elision)
    }

    pub fn nested(&mut self, result: DiffResult<'a>) -> &mut Self {
        self.push(DiffOperation::Nested(Box::new(result)))
    }

    /// Freeze the recorded operations into a result.
    pub fn finish(self) -> DiffResult<'a> {
        let (open, close) = self.data_type.delimiters();
        DiffResult {
            data_type: self.data_type,
            open,
            close,
            operations: self.operations,
        }
    }
}

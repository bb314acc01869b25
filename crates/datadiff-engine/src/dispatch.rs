//! Strategy dispatch by value capability.

use datadiff_types::{Shape, Value};
use tracing::debug;

use crate::config::DiffConfig;
use crate::error::{DiffError, Result};
use crate::result::DiffResult;
use crate::{mapping, sequence, set, text};

/// A configured diff engine.
///
/// `Differ` holds no state besides its configuration; every call to
/// [`Differ::diff`] is independent.
#[derive(Clone, Debug, Default)]
pub struct Differ {
    config: DiffConfig,
}

impl Differ {
    /// Create an engine with the given configuration.
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    /// The engine configuration.
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compute the structural difference between `a` and `b`.
    ///
    /// # Errors
    ///
    /// - [`DiffError::TypeMismatch`] if the values have incompatible types.
    /// - [`DiffError::NotImplementedForType`] for single-line strings and
    ///   values with no sequence, mapping, or set capability.
    /// - [`DiffError::Unhashable`] if an element has no surrogate.
    /// - [`DiffError::DepthLimitExceeded`] past `max_depth` nesting levels.
    pub fn diff<'a>(&self, a: &'a Value, b: &'a Value) -> Result<DiffResult<'a>> {
        self.diff_at(a, b, 0)
    }

    pub(crate) fn diff_at<'a>(
        &self,
        a: &'a Value,
        b: &'a Value,
        depth: usize,
    ) -> Result<DiffResult<'a>> {
        if depth > self.config.max_depth {
            return Err(DiffError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        if !comparable(a, b) {
            return Err(DiffError::TypeMismatch {
                left_type: a.type_name().to_owned(),
                right_type: b.type_name().to_owned(),
                left: a.to_string(),
                right: b.to_string(),
            });
        }

        let result = match (a.shape(), b.shape()) {
            (Shape::Text(x), Shape::Text(y)) => {
                // Character-level diffs of single lines are not useful.
                if !x.contains('\n') && !y.contains('\n') {
                    return Err(DiffError::NotImplementedForType(a.type_name().to_owned()));
                }
                text::diff_text(self, x, y)
            }
            (Shape::Mapping(x), Shape::Mapping(y)) => mapping::diff_mapping(self, x, y)?,
            (Shape::SetLike { name, members: x }, Shape::SetLike { members: y, .. }) => {
                set::diff_set(self, name, x, y)?
            }
            (Shape::Sequence { kind, items: x }, Shape::Sequence { items: y, .. }) => {
                sequence::diff_sequence(self, kind, x, y, depth)?
            }
            _ => return Err(DiffError::NotImplementedForType(a.type_name().to_owned())),
        };

        debug!(
            kind = %result.data_type(),
            depth,
            operations = result.operations().len(),
            "diff built"
        );
        Ok(result)
    }
}

/// Whether two values may be diffed against each other: same type name, or
/// both set-like.
pub fn comparable(a: &Value, b: &Value) -> bool {
    match (a.shape(), b.shape()) {
        (Shape::SetLike { .. }, Shape::SetLike { .. }) => true,
        _ => a.type_name() == b.type_name(),
    }
}

/// Compute the structural difference between `a` and `b` with the default
/// configuration.
///
/// # Errors
///
/// See [`Differ::diff`].
pub fn diff<'a>(a: &'a Value, b: &'a Value) -> Result<DiffResult<'a>> {
    Differ::default().diff(a, b)
}

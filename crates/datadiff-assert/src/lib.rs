//! Equality assertions that explain themselves.
//!
//! [`assert_equal`] compares two values and, when they differ, reports the
//! structural diff between them instead of two long literals. Values the
//! engine cannot diff (scalars, single-line strings, mismatched types) fall
//! back to `<first> != <second>`.
//!
//! ```
//! use datadiff_assert::assert_equal;
//! use datadiff_types::Value;
//!
//! let err = assert_equal(&Value::list([3, 4]), &Value::list([5, 6]), None).unwrap_err();
//! assert!(err.message.starts_with("\n--- a\n+++ b\n["));
//! ```

pub mod error;

use datadiff_engine::Differ;
use datadiff_types::Value;
use tracing::debug;

pub use error::AssertionError;

/// Assert that `first == second` using the default engine configuration.
///
/// `msg`, when given, replaces the generated message.
///
/// # Errors
///
/// Returns [`AssertionError`] if the values are not equal.
pub fn assert_equal(first: &Value, second: &Value, msg: Option<&str>) -> Result<(), AssertionError> {
    assert_equal_with(&Differ::default(), first, second, msg)
}

/// Like [`assert_equal`] but diffing with the given engine.
///
/// # Errors
///
/// Returns [`AssertionError`] if the values are not equal.
pub fn assert_equal_with(
    differ: &Differ,
    first: &Value,
    second: &Value,
    msg: Option<&str>,
) -> Result<(), AssertionError> {
    if first == second {
        return Ok(());
    }
    if let Some(msg) = msg {
        return Err(AssertionError::new(msg));
    }

    let message = match differ.diff(first, second) {
        Ok(d) if d.has_changes() => format!("\n{d}"),
        Ok(_) => fallback(first, second),
        Err(err) => {
            debug!(error = %err, "no structural diff; reporting literals");
            fallback(first, second)
        }
    };
    Err(AssertionError::new(message))
}

fn fallback(first: &Value, second: &Value) -> String {
    format!("{first} != {second}")
}

/// Panic with a structural diff unless the two values are equal.
///
/// Both arguments are converted with `Value::from`. An optional trailing
/// format string replaces the generated message.
///
/// ```should_panic
/// use datadiff_assert::assert_data_eq;
/// use datadiff_types::Value;
///
/// assert_data_eq!(Value::list([1, 2]), Value::list([1, 3]));
/// ```
#[macro_export]
macro_rules! assert_data_eq {
    ($first:expr, $second:expr $(,)?) => {{
        let first = $crate::__private::Value::from($first);
        let second = $crate::__private::Value::from($second);
        if let Err(err) = $crate::assert_equal(&first, &second, None) {
            panic!("{}", err);
        }
    }};
    ($first:expr, $second:expr, $($arg:tt)+) => {{
        let first = $crate::__private::Value::from($first);
        let second = $crate::__private::Value::from($second);
        let msg = format!($($arg)+);
        if let Err(err) = $crate::assert_equal(&first, &second, Some(msg.as_str())) {
            panic!("{}", err);
        }
    }};
}

#[doc(hidden)]
pub mod __private {
    pub use datadiff_types::Value;
}

//! Sequence diffs: aligned hunks with recursive diffs of replaced elements.

use datadiff_types::{SequenceKind, Value};
use similar::DiffTag;
use tracing::debug;

use crate::align::{self, ContextWindow};
use crate::dispatch::Differ;
use crate::error::{DiffError, Result};
use crate::result::{DataType, DiffBuilder, DiffItem, DiffResult};
use crate::surrogate::Surrogate;

pub(crate) fn diff_sequence<'a>(
    differ: &Differ,
    kind: SequenceKind<'a>,
    a: &'a [Value],
    b: &'a [Value],
    depth: usize,
) -> Result<DiffResult<'a>> {
    let config = differ.config();
    let hashable_a = surrogates(a, config.max_depth)?;
    let hashable_b = surrogates(b, config.max_depth)?;

    let data_type = match kind {
        SequenceKind::List => DataType::List,
        SequenceKind::Tuple => DataType::Tuple,
        SequenceKind::Iterable(name) => DataType::Iterable(name),
    };
    let mut builder = DiffBuilder::new(data_type);

    for hunk in align::grouped_opcodes(config.algorithm, &hashable_a, &hashable_b, config.context) {
        builder.context(ContextWindow::covering(&hunk));
        let mut old_end = 0;
        for op in &hunk {
            let (tag, old, new) = op.as_tag_tuple();
            old_end = old.end;
            match tag {
                DiffTag::Equal => {
                    builder.equal(values(&a[old]));
                }
                DiffTag::Delete => {
                    builder.delete(values(&a[old]));
                }
                DiffTag::Insert => {
                    builder.insert(values(&b[new]));
                }
                DiffTag::Replace => {
                    replace_run(differ, &mut builder, &a[old], &b[new], depth)?;
                }
            }
        }
        if old_end < a.len() {
            builder.elision();
        }
    }
    Ok(builder.finish())
}

/// Pair up replaced elements and diff each pair. Pairs that cannot be diffed
/// are collected and emitted as flat deletes and inserts.
fn replace_run<'a>(
    differ: &Differ,
    builder: &mut DiffBuilder<'a>,
    old: &'a [Value],
    new: &'a [Value],
    depth: usize,
) -> Result<()> {
    let mut pending_deletes = Vec::new();
    let mut pending_inserts = Vec::new();

    for (left, right) in old.iter().zip(new) {
        // Only an unsupported type is recovered here; a type mismatch aborts.
        let nested = match differ.diff_at(left, right, depth + 1) {
            Ok(nested) => Some(nested),
            Err(DiffError::NotImplementedForType(type_name)) => {
                debug!(%type_name, "no nested diff; falling back to delete/insert");
                None
            }
            Err(err) => return Err(err),
        };

        match nested {
            Some(nested) => {
                builder
                    .delete(pending_deletes.drain(..))
                    .insert(pending_inserts.drain(..))
                    .nested(nested);
            }
            None => {
                pending_deletes.push(DiffItem::Value(left));
                pending_inserts.push(DiffItem::Value(right));
            }
        }
    }

    // zip() stops at the shorter run; the rest is unpaired.
    let paired = old.len().min(new.len());
    builder
        .delete(pending_deletes)
        .delete(values(&old[paired..]))
        .insert(pending_inserts)
        .insert(values(&new[paired..]));
    Ok(())
}

fn surrogates(items: &[Value], max_depth: usize) -> Result<Vec<Surrogate<'_>>> {
    items.iter().map(|v| Surrogate::of(v, max_depth)).collect()
}

fn values(items: &[Value]) -> impl Iterator<Item = DiffItem<'_>> {
    items.iter().map(DiffItem::Value)
}

#[cfg(test)]
mod tests {
    use crate::config::DiffConfig;
    use crate::dispatch::{diff, Differ};
    use crate::error::DiffError;
    use crate::result::{DiffItem, DiffOperation, DiffResult};
    use datadiff_types::Value;
    use proptest::prelude::*;

    fn ints(items: &[i64]) -> Value {
        Value::list(items.iter().copied())
    }

    #[test]
    fn flat_list_diff() {
        let a = Value::list([Value::Int(1), "x".into(), 2.into(), 3.into(), 4.into()]);
        let b = Value::list([Value::Int(1), "y".into(), 2.into(), 4.into(), 5.into()]);
        let expected = "\
--- a
+++ b
[
@@ -0,4 +0,4 @@
 1,
-\"x\",
+\"y\",
 2,
-3,
 4,
+5,
]";
        assert_eq!(diff(&a, &b).unwrap().to_string(), expected);
    }

    #[test]
    fn fully_replaced_list() {
        let (a, b) = (ints(&[3, 4]), ints(&[5, 6]));
        let d = diff(&a, &b).unwrap();
        assert_eq!(
            d.to_string(),
            "--- a\n+++ b\n[\n@@ -0,1 +0,1 @@\n-3,\n-4,\n+5,\n+6,\n]"
        );
    }

    #[test]
    fn context_window_and_elision() {
        let mut a = vec![1; 50];
        a.extend([2, 3, 4, 5]);
        a.extend([1; 10]);
        let mut b = vec![1; 50];
        b.extend([3, 7]);
        b.extend([1; 10]);

        let expected = "\
--- a
+++ b
[
@@ -46,56 +46,54 @@
 1,
 1,
 1,
-2,
 3,
-4,
-5,
+7,
 1,
 1,
 1,
@@  @@
]";
        assert_eq!(diff(&ints(&a), &ints(&b)).unwrap().to_string(), expected);
    }

    #[test]
    fn separate_hunks_each_get_a_window() {
        let a: Vec<i64> = (0..20).collect();
        let mut b = a.clone();
        b[2] = 100;
        b[17] = 200;
        let expected = "\
--- a
+++ b
[
@@ -0,5 +0,5 @@
 0,
 1,
-2,
+100,
 3,
 4,
 5,
@@  @@
@@ -13,19 +13,19 @@
 14,
 15,
 16,
-17,
+200,
 18,
 19,
]";
        assert_eq!(diff(&ints(&a), &ints(&b)).unwrap().to_string(), expected);
    }

    #[test]
    fn nested_list_diff() {
        let a = Value::list([Value::Int(1), ints(&[7, 8, 9, 10, 11]), Value::Int(3)]);
        let b = Value::list([Value::Int(1), ints(&[7, 8, 10, 11]), Value::Int(3)]);
        let expected = "\
--- a
+++ b
[
@@ -0,2 +0,2 @@
 1,
 [
 @@ -0,4 +0,3 @@
  7,
  8,
 -9,
  10,
  11,
 ],
 3,
]";
        let d = diff(&a, &b).unwrap();
        assert!(matches!(d.operations()[2], DiffOperation::Nested(_)));
        assert_eq!(d.to_string(), expected);
    }

    #[test]
    fn nested_map_in_list() {
        let a = Value::list([Value::map([("a", 1)])]);
        let b = Value::list([Value::map([("a", 2)])]);
        let expected = "\
--- a
+++ b
[
@@ -0 +0 @@
 {
 -\"a\": 1,
 +\"a\": 2,
 },
]";
        assert_eq!(diff(&a, &b).unwrap().to_string(), expected);
    }

    #[test]
    fn undiffable_pairs_fall_back_to_flat_edits() {
        let a = Value::list([Value::Int(1), Value::list([2])]);
        let b = Value::list([Value::Int(5), Value::list([3])]);
        let d = diff(&a, &b).unwrap();
        // The int pair is flushed before the nested list diff.
        let ops = d.operations();
        assert!(matches!(&ops[1], DiffOperation::Delete(items) if items == &[DiffItem::Value(&Value::Int(1))]));
        assert!(matches!(&ops[2], DiffOperation::Insert(items) if items == &[DiffItem::Value(&Value::Int(5))]));
        assert!(matches!(&ops[3], DiffOperation::Nested(_)));
    }

    #[test]
    fn mismatched_types_in_a_replace_run_abort_the_diff() {
        let a = Value::list([Value::Int(0), Value::list([1]), Value::Int(9)]);
        let b = Value::list([Value::Int(0), Value::map([(1, 1)]), Value::Int(9)]);
        let err = diff(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            DiffError::TypeMismatch { ref left_type, ref right_type, .. }
                if left_type == "list" && right_type == "map"
        ));

        let a = Value::list([Value::Int(1)]);
        let b = Value::list([Value::from("one")]);
        assert!(matches!(diff(&a, &b), Err(DiffError::TypeMismatch { .. })));
    }

    #[test]
    fn unpaired_tail_is_deleted() {
        let a = Value::list([ints(&[1]), Value::Int(5), Value::Int(6)]);
        let b = Value::list([ints(&[2])]);
        let d = diff(&a, &b).unwrap();
        let rendered = d.to_string();
        assert!(rendered.contains("\n [\n"));
        assert!(rendered.ends_with("-5,\n-6,\n]"));
    }

    #[test]
    fn tuple_and_iterable_delimiters() {
        let (a, b) = (Value::tuple([1, 2]), Value::tuple([1, 3]));
        let d = diff(&a, &b).unwrap();
        assert_eq!(
            d.to_string(),
            "--- a\n+++ b\n(\n@@ -0,1 +0,1 @@\n 1,\n-2,\n+3,\n)"
        );

        let (a, b) = (Value::iterable("deque", [1]), Value::iterable("deque", [2]));
        let d = diff(&a, &b).unwrap();
        assert_eq!(
            d.to_string(),
            "--- a\n+++ b\ndeque([\n@@ -0 +0 @@\n-1,\n+2,\n])"
        );
    }

    #[test]
    fn insert_into_empty_list() {
        let (a, b) = (ints(&[]), ints(&[1]));
        let d = diff(&a, &b).unwrap();
        assert_eq!(d.to_string(), "--- a\n+++ b\n[\n@@ -0 +0 @@\n+1,\n]");
    }

    #[test]
    fn unhashable_element() {
        let a = Value::list(Vec::<Value>::new());
        let b = Value::list([Value::opaque("Widget", "<Widget>")]);
        assert_eq!(
            diff(&a, &b).unwrap_err(),
            DiffError::Unhashable("<Widget>".into())
        );
    }

    #[test]
    fn unhashable_element_inside_a_replaced_pair_is_fatal() {
        let a = Value::list([ints(&[1])]);
        let b = Value::list([Value::list([Value::opaque("Widget", "<Widget>")])]);
        assert!(matches!(diff(&a, &b), Err(DiffError::Unhashable(_))));
    }

    #[test]
    fn zero_context_shows_only_changes() {
        let differ = Differ::new(DiffConfig::default().with_context(0));
        let (a, b) = (Value::list([1, 2, 3]), Value::list([1, 9, 3]));
        let d = differ.diff(&a, &b).unwrap();
        assert_eq!(
            d.to_string(),
            "--- a\n+++ b\n[\n@@ -0,1 +0,1 @@\n-2,\n+9,\n@@  @@\n]"
        );
    }

    fn reconstruct<'a>(result: &DiffResult<'a>) -> (Vec<&'a Value>, Vec<&'a Value>) {
        let (mut left, mut right) = (Vec::new(), Vec::new());
        for op in result.operations() {
            let (items, to_left, to_right) = match op {
                DiffOperation::Delete(items) => (items, true, false),
                DiffOperation::Insert(items) => (items, false, true),
                DiffOperation::Equal(items) => (items, true, true),
                _ => continue,
            };
            for item in items {
                if let DiffItem::Value(v) = item {
                    if to_left {
                        left.push(*v);
                    }
                    if to_right {
                        right.push(*v);
                    }
                }
            }
        }
        (left, right)
    }

    proptest! {
        #[test]
        fn flat_diffs_reconstruct_both_sides(
            a in proptest::collection::vec(0i64..4, 0..24),
            b in proptest::collection::vec(0i64..4, 0..24),
        ) {
            let (va, vb) = (ints(&a), ints(&b));
            let differ = Differ::new(DiffConfig::default().with_context(64));
            let d = differ.diff(&va, &vb).unwrap();
            if a == b {
                prop_assert!(!d.has_changes());
            } else {
                let (left, right) = reconstruct(&d);
                let left: Vec<i64> = left.iter().map(|v| match v { Value::Int(i) => *i, _ => -1 }).collect();
                let right: Vec<i64> = right.iter().map(|v| match v { Value::Int(i) => *i, _ => -1 }).collect();
                prop_assert_eq!(left, a);
                prop_assert_eq!(right, b);
                prop_assert!(d.has_changes());
            }
        }

        #[test]
        fn self_diff_has_no_changes(a in proptest::collection::vec(0i64..100, 0..40)) {
            let v = ints(&a);
            prop_assert!(!diff(&v, &v).unwrap().has_changes());
        }
    }
}

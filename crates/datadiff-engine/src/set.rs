//! Set diffs: membership differences plus a bounded sample of shared members.

use std::collections::HashSet;

use datadiff_types::Value;

use crate::dispatch::Differ;
use crate::error::Result;
use crate::result::{DataType, DiffBuilder, DiffItem, DiffResult};
use crate::surrogate::Surrogate;

pub(crate) fn diff_set<'a>(
    differ: &Differ,
    name: &'a str,
    a: &'a [Value],
    b: &'a [Value],
) -> Result<DiffResult<'a>> {
    let config = differ.config();
    let a = distinct(a, config.max_depth)?;
    let b = distinct(b, config.max_depth)?;
    let in_a: HashSet<&Surrogate<'a>> = a.iter().map(|(s, _)| s).collect();
    let in_b: HashSet<&Surrogate<'a>> = b.iter().map(|(s, _)| s).collect();

    let mut builder = DiffBuilder::new(DataType::Set(name));
    builder
        .delete(
            a.iter()
                .filter(|(s, _)| !in_b.contains(s))
                .map(|(_, v)| DiffItem::Value(*v)),
        )
        .insert(
            b.iter()
                .filter(|(s, _)| !in_a.contains(s))
                .map(|(_, v)| DiffItem::Value(*v)),
        );

    let mut common = a
        .iter()
        .filter(|(s, _)| in_b.contains(s))
        .map(|(_, v)| DiffItem::Value(*v));
    builder.equal(common.by_ref().take(config.context));
    if common.next().is_some() {
        builder.elision();
    }
    Ok(builder.finish())
}

/// Members paired with their surrogates, first occurrence wins.
fn distinct(members: &[Value], max_depth: usize) -> Result<Vec<(Surrogate<'_>, &Value)>> {
    let mut seen = HashSet::with_capacity(members.len());
    let mut out = Vec::with_capacity(members.len());
    for member in members {
        let surrogate = Surrogate::of(member, max_depth)?;
        if seen.insert(surrogate.clone()) {
            out.push((surrogate, member));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::config::DiffConfig;
    use crate::dispatch::{diff, Differ};
    use crate::error::DiffError;
    use crate::result::{DiffItem, DiffOperation};
    use datadiff_types::Value;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn membership_changes() {
        let a = Value::set([
            Value::Int(1),
            Value::Int(3),
            Value::Int(5),
            Value::Int(7),
            Value::from("abc"),
            Value::from("def"),
        ]);
        let b = Value::set([
            Value::from("qwert"),
            Value::Int(3),
            Value::Int(7),
            Value::from("abc"),
        ]);
        let expected = "\
--- a
+++ b
set([
-1,
-5,
-\"def\",
+\"qwert\",
 3,
 7,
 \"abc\",
])";
        assert_eq!(diff(&a, &b).unwrap().to_string(), expected);
    }

    #[test]
    fn shared_members_beyond_context_are_elided() {
        let a = Value::set(0..10);
        let b = Value::set((0..10).chain([42]));
        let differ = Differ::new(DiffConfig::default().with_context(2));
        assert_eq!(
            differ.diff(&a, &b).unwrap().to_string(),
            "--- a\n+++ b\nset([\n+42,\n 0,\n 1,\n@@  @@\n])"
        );
    }

    #[test]
    fn duplicates_collapse() {
        let a = Value::Set {
            name: "set".into(),
            members: vec![Value::Int(1), Value::Int(1), Value::Int(2)],
        };
        let b = Value::set([2]);
        let d = diff(&a, &b).unwrap();
        assert_eq!(d.deletions(), 1);
        assert_eq!(d.insertions(), 0);
    }

    #[test]
    fn left_name_wins() {
        let a = Value::named_set("frozenset", [1]);
        let b = Value::set([2]);
        let d = diff(&a, &b).unwrap();
        assert_eq!(d.open(), "frozenset([");
        assert_eq!(d.close(), "])");
    }

    #[test]
    fn unhashable_member() {
        let a = Value::named_set("bag", [Value::opaque("Widget", "<Widget>")]);
        let b = Value::set([1]);
        assert_eq!(
            diff(&a, &b).unwrap_err(),
            DiffError::Unhashable("<Widget>".into())
        );
    }

    proptest! {
        #[test]
        fn full_context_reconstructs_both_sides(
            a in proptest::collection::vec(0i64..8, 0..10),
            b in proptest::collection::vec(0i64..8, 0..10),
        ) {
            let (va, vb) = (Value::set(a.clone()), Value::set(b.clone()));
            let differ = Differ::new(DiffConfig::default().with_context(usize::MAX));
            let d = differ.diff(&va, &vb).unwrap();

            let mut left = BTreeSet::new();
            let mut right = BTreeSet::new();
            for op in d.operations() {
                let (items, to_left, to_right) = match op {
                    DiffOperation::Delete(items) => (items, true, false),
                    DiffOperation::Insert(items) => (items, false, true),
                    DiffOperation::Equal(items) => (items, true, true),
                    other => panic!("unexpected {other:?}"),
                };
                for item in items {
                    let DiffItem::Value(Value::Int(v)) = item else {
                        panic!("unexpected {item:?}");
                    };
                    prop_assert!(!to_left || left.insert(*v), "{v} reported twice");
                    if to_right {
                        right.insert(*v);
                    }
                }
            }
            prop_assert_eq!(left, a.into_iter().collect::<BTreeSet<_>>());
            prop_assert_eq!(right, b.into_iter().collect::<BTreeSet<_>>());
        }
    }
}

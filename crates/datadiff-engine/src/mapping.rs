//! Mapping diffs: entries keyed by surrogate, sorted for stable output.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use datadiff_types::Value;

use crate::dispatch::Differ;
use crate::error::Result;
use crate::result::{DataType, DiffBuilder, DiffItem, DiffOperation, DiffResult};
use crate::surrogate::Surrogate;

/// Sort key for mapping entries: numbers, then strings, then everything else
/// by surrogate digest.
#[derive(Clone, Copy, Debug)]
enum KeyOrder<'a> {
    Number(f64),
    Text(&'a str),
    Digest(u64),
}

impl<'a> KeyOrder<'a> {
    fn of(key: &'a Value, surrogate: &Surrogate<'_>) -> Self {
        match key {
            Value::Bool(b) => Self::Number(f64::from(u8::from(*b))),
            // Precision loss above 2^53 only affects relative order of huge keys.
            Value::Int(i) => Self::Number(*i as f64),
            Value::Float(x) => Self::Number(*x),
            Value::Str(s) => Self::Text(s),
            _ => Self::Digest(surrogate.digest()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Digest(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(x), Self::Number(y)) => x.total_cmp(y),
            (Self::Text(x), Self::Text(y)) => x.cmp(y),
            (Self::Digest(x), Self::Digest(y)) => x.cmp(y),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

pub(crate) fn diff_mapping<'a>(
    differ: &Differ,
    a: &'a [(Value, Value)],
    b: &'a [(Value, Value)],
) -> Result<DiffResult<'a>> {
    let config = differ.config();
    let surrogate = |key: &'a Value| Surrogate::of(key, config.max_depth);

    let mut b_index = HashMap::with_capacity(b.len());
    for (key, value) in b {
        b_index.insert(surrogate(key)?, value);
    }

    let mut entries: Vec<(KeyOrder<'a>, DiffOperation<'a>)> = Vec::new();
    let mut a_keys = HashSet::with_capacity(a.len());
    let mut budget = config.context;
    let mut skipped = false;

    for (key, old) in a {
        let hashed = surrogate(key)?;
        let order = KeyOrder::of(key, &hashed);
        match b_index.get(&hashed) {
            None => entries.push((order, delete(key, old))),
            Some(&new) if new != old => {
                entries.push((order, delete(key, old)));
                entries.push((order, DiffOperation::Insert(vec![DiffItem::Entry(key, new)])));
            }
            Some(_) => {
                if budget > 0 {
                    entries.push((order, DiffOperation::Equal(vec![DiffItem::Entry(key, old)])));
                } else {
                    skipped = true;
                }
                budget = budget.saturating_sub(1);
            }
        }
        a_keys.insert(hashed);
    }

    for (key, new) in b {
        let hashed = surrogate(key)?;
        if !a_keys.contains(&hashed) {
            let order = KeyOrder::of(key, &hashed);
            entries.push((order, DiffOperation::Insert(vec![DiffItem::Entry(key, new)])));
        }
    }

    entries.sort_by(|(x, _), (y, _)| x.compare(y));

    let mut builder = DiffBuilder::new(DataType::Mapping);
    for (_, op) in entries {
        builder.push(op);
    }
    if skipped {
        builder.elision();
    }
    Ok(builder.finish())
}

fn delete<'a>(key: &'a Value, value: &'a Value) -> DiffOperation<'a> {
    DiffOperation::Delete(vec![DiffItem::Entry(key, value)])
}

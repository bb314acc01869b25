//! Sequence alignment: edit scripts between two ordered sequences, grouped
//! into context-windowed hunks.
//!
//! The default algorithm is a classic longest-common-subsequence table walk
//! that reports its edits through `similar`'s [`DiffHook`] interface, so the
//! opcodes and hunk grouping are the same `similar` types the Myers and
//! patience variants produce. Ties in the table prefer deletions, which keeps
//! the deleted items of a change ahead of the inserted ones.
//!
//! # Invariants
//!
//! - Every hunk is a non-empty run of opcodes covering contiguous ranges.
//! - Equal runs are clipped to `context` items at hunk edges; an interior equal
//!   run longer than `2 * context` splits two hunks.
//! - Two identical sequences produce no hunks.

use std::hash::Hash;
use std::ops::Range;

use similar::algorithms::{Capture, DiffHook, Replace};
use similar::{Algorithm, DiffOp};
use tracing::debug;

use crate::config::Alignment;

/// Above this many table cells the LCS table is not built and Myers is used.
const LCS_TABLE_LIMIT: usize = 1 << 22;

/// The old/new index ranges covered by one hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextWindow {
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl ContextWindow {
    /// The window spanning a hunk from its first to its last opcode.
    pub fn covering(hunk: &[DiffOp]) -> Self {
        match (hunk.first(), hunk.last()) {
            (Some(first), Some(last)) => Self {
                old: first.old_range().start..last.old_range().end,
                new: first.new_range().start..last.new_range().end,
            },
            _ => Self { old: 0..0, new: 0..0 },
        }
    }

    /// `(old_start, old_end, new_start, new_end)`, each bound moved back by
    /// one and clamped at zero.
    pub fn spans(&self) -> (usize, usize, usize, usize) {
        (
            self.old.start.saturating_sub(1),
            self.old.end.saturating_sub(1),
            self.new.start.saturating_sub(1),
            self.new.end.saturating_sub(1),
        )
    }
}

/// Align `old` against `new` and group the edit script into hunks carrying
/// `context` unchanged items on each side of every change.
pub fn grouped_opcodes<T>(
    algorithm: Alignment,
    old: &[T],
    new: &[T],
    context: usize,
) -> Vec<Vec<DiffOp>>
where
    T: Eq + Hash + Ord,
{
    let ops = match algorithm {
        Alignment::Lcs if old.len().saturating_mul(new.len()) <= LCS_TABLE_LIMIT => {
            let mut hook = Replace::new(Capture::new());
            match lcs(&mut hook, old, new) {
                Ok(()) => {}
                Err(never) => match never {},
            }
            hook.into_inner().into_ops()
        }
        Alignment::Lcs => {
            debug!(
                old_len = old.len(),
                new_len = new.len(),
                "sequences too large for an LCS table; aligning with Myers"
            );
            similar::capture_diff_slices(Algorithm::Myers, old, new)
        }
        Alignment::Myers => similar::capture_diff_slices(Algorithm::Myers, old, new),
        Alignment::Patience => similar::capture_diff_slices(Algorithm::Patience, old, new),
    };
    // A context wider than either sequence changes nothing and would overflow
    // the grouping arithmetic.
    let context = context.min(old.len().max(new.len()));
    similar::group_diff_ops(ops, context)
}

/// Longest-common-subsequence alignment reported through a [`DiffHook`].
///
/// Runs are reported whole: one `equal`, `delete` or `insert` call per
/// maximal run.
pub fn lcs<T, D>(d: &mut D, old: &[T], new: &[T]) -> Result<(), D::Error>
where
    T: PartialEq,
    D: DiffHook,
{
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_end = old.len() - suffix;
    let new_end = new.len() - suffix;

    if prefix > 0 {
        d.equal(0, 0, prefix)?;
    }
    lcs_middle(d, old, prefix..old_end, new, prefix..new_end)?;
    if suffix > 0 {
        d.equal(old_end, new_end, suffix)?;
    }
    d.finish()
}

fn lcs_middle<T, D>(
    d: &mut D,
    old: &[T],
    old_range: Range<usize>,
    new: &[T],
    new_range: Range<usize>,
) -> Result<(), D::Error>
where
    T: PartialEq,
    D: DiffHook,
{
    let old = &old[old_range.clone()];
    let new = &new[new_range.clone()];
    let (n, m) = (old.len(), new.len());
    let (os, ns) = (old_range.start, new_range.start);

    if n == 0 || m == 0 {
        if n > 0 {
            d.delete(os, n, ns)?;
        }
        if m > 0 {
            d.insert(os, ns, m)?;
        }
        return Ok(());
    }

    // table[i * width + j] = length of the LCS of old[i..] and new[j..]
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }
    let prefer_delete = |i: usize, j: usize| table[(i + 1) * width + j] >= table[i * width + j + 1];

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            let (start_i, start_j) = (i, j);
            while i < n && j < m && old[i] == new[j] {
                i += 1;
                j += 1;
            }
            d.equal(os + start_i, ns + start_j, i - start_i)?;
        } else if prefer_delete(i, j) {
            let start = i;
            while i < n && old[i] != new[j] && prefer_delete(i, j) {
                i += 1;
            }
            d.delete(os + start, i - start, ns + j)?;
        } else {
            let start = j;
            while j < m && old[i] != new[j] && !prefer_delete(i, j) {
                j += 1;
            }
            d.insert(os + i, ns + start, j - start)?;
        }
    }
    if i < n {
        d.delete(os + i, n - i, ns + j)?;
    }
    if j < m {
        d.insert(os + i, ns + j, m - j)?;
    }
    Ok(())
}

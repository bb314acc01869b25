//! Line diffs of multi-line strings.

use similar::DiffTag;

use crate::align::{self, ContextWindow};
use crate::dispatch::Differ;
use crate::result::{DataType, DiffBuilder, DiffItem, DiffResult};

pub(crate) fn diff_text<'a>(differ: &Differ, a: &'a str, b: &'a str) -> DiffResult<'a> {
    let config = differ.config();
    let old: Vec<&str> = a.split('\n').collect();
    let new: Vec<&str> = b.split('\n').collect();

    let mut builder = DiffBuilder::new(DataType::Text);
    for hunk in align::grouped_opcodes(config.algorithm, &old, &new, config.context) {
        builder.context(ContextWindow::covering(&hunk));
        for op in &hunk {
            let (tag, o, n) = op.as_tag_tuple();
            let deleted = old[o].iter().copied().map(DiffItem::Line);
            let inserted = new[n].iter().copied().map(DiffItem::Line);
            match tag {
                DiffTag::Equal => builder.equal(deleted),
                DiffTag::Delete => builder.delete(deleted),
                DiffTag::Insert => builder.insert(inserted),
                DiffTag::Replace => builder.delete(deleted).insert(inserted),
            };
        }
    }
    builder.finish()
}

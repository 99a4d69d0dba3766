//! Tab computation and retroactive expansion.
//!
//! A tab's width depends on the hypothetical column at its posn, so tabs
//! stay queued until the driver reaches them (or a whole fitting block is
//! inlined), then get spliced into the buffer as runs of spaces.

use crate::queue::{Op, OpId, TabKind};

use super::PrettyStream;

/// Spaces a tab inserts, given the section origin and the hypothetical
/// column at the tab's posn.
pub(crate) fn compute_tab_size(
    kind: TabKind,
    colnum: usize,
    colinc: usize,
    section_start: usize,
    column: usize,
) -> usize {
    let origin = if kind.is_section() { section_start } else { 0 };
    let position = column.saturating_sub(origin);
    if kind.is_relative() {
        let mut count = colnum;
        if colinc > 1 {
            let rem = (position + count) % colinc;
            if rem != 0 {
                count += colinc - rem;
            }
        }
        count
    } else if position < colnum {
        colnum - position
    } else if colinc == 0 {
        0
    } else {
        colinc - ((position - colnum) % colinc)
    }
}

impl PrettyStream<'_> {
    /// Expand every tab up to and including `through` (all of them for
    /// `None`), splicing spaces into the buffer. The stream offset is
    /// decremented by the total insertion so queued posns after the splice
    /// still name the same characters.
    pub(crate) fn expand_tabs(&mut self, through: Option<OpId>) {
        if self.queue.is_empty() {
            return;
        }
        let mut insertions: Vec<(usize, usize)> = Vec::new();
        let mut additional = 0usize;
        let mut column = self.buffer_start_column;
        let mut section_start = self.innermost().section_column;
        for (id, queued) in self.queue.iter() {
            match queued.op {
                Op::Tab {
                    kind,
                    colnum,
                    colinc,
                } => {
                    let index = self.posn_to_index(queued.posn);
                    let size =
                        compute_tab_size(kind, colnum, colinc, section_start, column + index);
                    if size > 0 {
                        insertions.push((index, size));
                        additional += size;
                        column += size;
                    }
                }
                Op::Newline { .. } | Op::BlockStart { .. } => {
                    section_start = column + self.posn_to_index(queued.posn);
                }
                Op::Indent { .. } | Op::BlockEnd => {}
            }
            if Some(id) == through {
                break;
            }
        }
        if additional > 0 {
            self.buffer.insert_spaces(&insertions, additional);
            self.buffer_offset -= additional as i64;
        }
    }
}

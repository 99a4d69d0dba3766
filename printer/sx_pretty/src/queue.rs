//! The pending-operation queue.
//!
//! Layout directives are buffered here, each tagged with the posn at which
//! it was enqueued, until the driver has enough information to commit them.
//! The queue is a deque with a running pop count, so an [`OpId`]
//! (`popped + index`) stays valid across front pops; a back-reference into a
//! range that was dropped simply fails to resolve.

use crate::posn::Posn;
use std::collections::VecDeque;
use std::sync::Arc;

/// Conditional-newline styles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NewlineKind {
    /// Fires iff the enclosing section does not fit on one line.
    Linear,
    /// Fires when the next section would overflow the line, or after a
    /// section that already wrapped, or in miser mode.
    Fill,
    /// Fires only in miser mode.
    Miser,
    /// An unconditional newline that came from literal text.
    Literal,
    /// An unconditional newline requested as layout.
    Mandatory,
}

impl NewlineKind {
    /// Unconditional kinds drive the queue forward immediately.
    #[inline]
    pub(crate) fn is_forcing(self) -> bool {
        matches!(self, NewlineKind::Literal | NewlineKind::Mandatory)
    }
}

/// What an indentation change is measured from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IndentKind {
    /// Relative to the start column of the innermost block.
    Block,
    /// Relative to the column at which the directive was issued.
    Current,
}

/// Tab-stop styles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TabKind {
    /// Absolute column stops.
    Line,
    /// Pad by `colnum`, then round up to a multiple of `colinc`.
    LineRelative,
    /// Column stops measured from the section start.
    Section,
    /// Relative padding measured from the section start.
    SectionRelative,
}

impl TabKind {
    #[inline]
    pub(crate) fn is_section(self) -> bool {
        matches!(self, TabKind::Section | TabKind::SectionRelative)
    }

    #[inline]
    pub(crate) fn is_relative(self) -> bool {
        matches!(self, TabKind::LineRelative | TabKind::SectionRelative)
    }
}

/// Identity of a queued operation; survives front pops.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) struct OpId(usize);

/// A pending layout directive.
#[derive(Clone, Debug)]
pub(crate) enum Op {
    Newline {
        kind: NewlineKind,
        depth: usize,
        /// Posn of the next newline or block-end at this depth or
        /// shallower; `None` while the section is still open.
        section_end: Option<Posn>,
    },
    Indent {
        kind: IndentKind,
        amount: isize,
    },
    BlockStart {
        depth: usize,
        per_line_prefix: Option<Arc<str>>,
        suffix: Option<Arc<str>>,
        section_end: Option<Posn>,
        /// The matching block-end, once enqueued.
        block_end: Option<OpId>,
    },
    BlockEnd,
    Tab {
        kind: TabKind,
        colnum: usize,
        colinc: usize,
    },
}

/// An operation plus the posn it was enqueued at.
#[derive(Clone, Debug)]
pub(crate) struct QueuedOp {
    pub posn: Posn,
    pub op: Op,
}

/// FIFO of pending operations.
#[derive(Debug)]
pub(crate) struct OpQueue {
    ops: VecDeque<QueuedOp>,
    popped: usize,
}

impl OpQueue {
    pub(crate) fn new() -> Self {
        OpQueue {
            ops: VecDeque::new(),
            popped: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub(crate) fn push(&mut self, posn: Posn, op: Op) -> OpId {
        self.ops.push_back(QueuedOp { posn, op });
        OpId(self.popped + self.ops.len() - 1)
    }

    pub(crate) fn front(&self) -> Option<(OpId, &QueuedOp)> {
        self.ops.front().map(|op| (OpId(self.popped), op))
    }

    pub(crate) fn pop_front(&mut self) {
        if self.ops.pop_front().is_some() {
            self.popped += 1;
        }
    }

    /// Pop every operation from the front through `id`, inclusive.
    pub(crate) fn drop_through(&mut self, id: OpId) {
        while self.popped <= id.0 && !self.ops.is_empty() {
            self.pop_front();
        }
    }

    /// Drop everything; ids of the dropped ops never resolve again.
    pub(crate) fn clear(&mut self) {
        self.popped += self.ops.len();
        self.ops.clear();
    }

    pub(crate) fn get_mut(&mut self, id: OpId) -> Option<&mut QueuedOp> {
        let index = id.0.checked_sub(self.popped)?;
        self.ops.get_mut(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (OpId, &QueuedOp)> {
        let popped = self.popped;
        self.ops
            .iter()
            .enumerate()
            .map(move |(i, op)| (OpId(popped + i), op))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (OpId, &mut QueuedOp)> {
        let popped = self.popped;
        self.ops
            .iter_mut()
            .enumerate()
            .map(move |(i, op)| (OpId(popped + i), op))
    }
}

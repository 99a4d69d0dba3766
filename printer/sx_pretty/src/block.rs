//! Committed logical-block records.

/// Book-keeping for one committed logical block.
///
/// The stream keeps a stack of these with a sentinel (all zeros) at the
/// bottom, so "the innermost block" always exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LogicalBlock {
    /// Column the block started at.
    pub start_column: usize,
    /// Column the current section starts at; reset on every fired
    /// conditional newline.
    pub section_column: usize,
    /// Columns of the prefix occupied by per-line prefixes (repeated after
    /// literal newlines too).
    pub per_line_prefix_end: usize,
    /// Total live columns of the prefix, per-line prefixes plus indentation.
    pub prefix_length: usize,
    /// Total active length of the right-justified suffix store.
    pub suffix_length: usize,
    /// Line number the current section started on.
    pub section_start_line: usize,
}

impl LogicalBlock {
    pub(crate) fn sentinel() -> Self {
        LogicalBlock::default()
    }
}

//! The pretty stream.
//!
//! Callers push characters and layout directives; the stream buffers them
//! speculatively together with a queue of pending operations and lets the
//! break-decision driver (see `drive`) emit finished lines to the target
//! sink.
//!
//! Position arithmetic lives here: `posn = index + buffer_offset`, and
//! column computation is *hypothetical* — where a character would land if
//! the stream were emitted right now with no further breaks — which is
//! exactly the question break decisions ask.

mod drive;
mod tabs;

use smallvec::SmallVec;
use std::sync::Arc;

use crate::block::LogicalBlock;
use crate::buffer::{CharBuffer, PrefixBuffer, SuffixBuffer};
use crate::config::PrintConfig;
use crate::error::{PrintError, PrintResult};
use crate::posn::Posn;
use crate::queue::{IndentKind, NewlineKind, Op, OpId, OpQueue, TabKind};
use crate::sink::Sink;

use tabs::compute_tab_size;

/// One-shot callback fired on the next character write; returns a character
/// to emit just before it. Used to inject a space between a comma sigil and
/// a following sugar-affecting character such as `.` or `@`.
pub type CharOutHook = fn(char) -> Option<char>;

/// A logical block that has been opened but not yet closed by
/// `end_logical_block`.
struct PendingBlock {
    op: OpId,
    suffix: Option<Arc<str>>,
}

/// Buffered, break-deciding output stream.
pub struct PrettyStream<'a> {
    target: &'a mut dyn Sink,
    line_length: usize,
    print_lines: Option<usize>,
    miser_width: Option<usize>,
    readably: bool,
    buffer: CharBuffer,
    /// Cumulative shift between buffer indices and stream posns; signed
    /// because tab expansion splices characters in behind existing posns.
    buffer_offset: i64,
    /// Column `buffer[0]` would appear at if emitted now.
    buffer_start_column: usize,
    line_number: usize,
    /// Committed blocks, sentinel at the bottom.
    blocks: SmallVec<[LogicalBlock; 8]>,
    prefix: PrefixBuffer,
    suffix: SuffixBuffer,
    queue: OpQueue,
    pending_blocks: SmallVec<[PendingBlock; 4]>,
    char_out_hook: Option<CharOutHook>,
}

impl<'a> PrettyStream<'a> {
    /// Wrap `target` with the layout parameters from `config`.
    pub fn new(target: &'a mut dyn Sink, config: &PrintConfig) -> Self {
        let mut blocks = SmallVec::new();
        blocks.push(LogicalBlock::sentinel());
        PrettyStream {
            target,
            line_length: config.right_margin,
            print_lines: config.lines,
            miser_width: config.miser_width,
            readably: config.readably,
            buffer: CharBuffer::new(),
            buffer_offset: 0,
            buffer_start_column: 0,
            line_number: 0,
            blocks,
            prefix: PrefixBuffer::new(),
            suffix: SuffixBuffer::new(),
            queue: OpQueue::new(),
            pending_blocks: SmallVec::new(),
            char_out_hook: None,
        }
    }

    // ------------------------------------------------------------------
    // Position arithmetic
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn index_to_posn(&self, index: usize) -> Posn {
        Posn(index as i64 + self.buffer_offset)
    }

    #[inline]
    pub(crate) fn posn_to_index(&self, posn: Posn) -> usize {
        debug_assert!(posn.0 >= self.buffer_offset);
        #[expect(
            clippy::cast_sign_loss,
            reason = "queued posns are never behind the buffer offset"
        )]
        let index = (posn.0 - self.buffer_offset) as usize;
        index
    }

    /// Hypothetical column of buffer index `index`, replaying pending tabs
    /// (they widen) and section openers (they move the tab origin).
    pub(crate) fn index_column(&self, index: usize) -> usize {
        let mut column = self.buffer_start_column;
        let mut section_start = self.innermost().section_column;
        let end_posn = self.index_to_posn(index);
        for (_, queued) in self.queue.iter() {
            if queued.posn >= end_posn {
                break;
            }
            match queued.op {
                Op::Tab {
                    kind,
                    colnum,
                    colinc,
                } => {
                    column += compute_tab_size(
                        kind,
                        colnum,
                        colinc,
                        section_start,
                        column + self.posn_to_index(queued.posn),
                    );
                }
                Op::Newline { .. } | Op::BlockStart { .. } => {
                    section_start = column + self.posn_to_index(queued.posn);
                }
                Op::Indent { .. } | Op::BlockEnd => {}
            }
        }
        column + index
    }

    #[inline]
    pub(crate) fn posn_column(&self, posn: Posn) -> usize {
        self.index_column(self.posn_to_index(posn))
    }

    #[inline]
    pub(crate) fn innermost(&self) -> &LogicalBlock {
        // The sentinel guarantees the stack is never empty.
        &self.blocks[self.blocks.len() - 1]
    }

    #[inline]
    pub(crate) fn innermost_mut(&mut self) -> &mut LogicalBlock {
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    /// Miser mode: the innermost block starts too close to the margin.
    pub(crate) fn misering(&self) -> bool {
        self.miser_width.is_some_and(|width| {
            self.line_length
                .saturating_sub(self.innermost().start_column)
                <= width
        })
    }

    // ------------------------------------------------------------------
    // Character input
    // ------------------------------------------------------------------

    /// Write one character; embedded `\n` becomes a literal newline.
    pub fn write_char(&mut self, ch: char) -> PrintResult<()> {
        self.fire_hook(ch)?;
        if ch == '\n' {
            self.newline(NewlineKind::Literal)
        } else {
            self.push_char(ch)
        }
    }

    /// Write a string, splitting on embedded `\n` into literal newlines.
    pub fn write_str(&mut self, s: &str) -> PrintResult<()> {
        let chars: Vec<char> = s.chars().collect();
        let Some(&first) = chars.first() else {
            return Ok(());
        };
        self.fire_hook(first)?;
        let mut start = 0;
        while start < chars.len() {
            match chars[start..].iter().position(|&c| c == '\n') {
                Some(rel) => {
                    self.write_chunk(&chars[start..start + rel])?;
                    self.newline(NewlineKind::Literal)?;
                    start += rel + 1;
                }
                None => {
                    self.write_chunk(&chars[start..])?;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Arm the one-shot character hook.
    pub fn set_char_out_hook(&mut self, hook: CharOutHook) {
        self.char_out_hook = Some(hook);
    }

    fn fire_hook(&mut self, next: char) -> PrintResult<()> {
        if let Some(hook) = self.char_out_hook.take() {
            if let Some(injected) = hook(next) {
                self.push_char(injected)?;
            }
        }
        Ok(())
    }

    fn push_char(&mut self, ch: char) -> PrintResult<()> {
        self.ensure_space(1)?;
        self.buffer.push(ch);
        Ok(())
    }

    fn write_chunk(&mut self, chars: &[char]) -> PrintResult<()> {
        let mut start = 0;
        while start < chars.len() {
            let available = self.ensure_space(chars.len() - start)?;
            let count = available.min(chars.len() - start);
            self.buffer.extend_from_slice(&chars[start..start + count]);
            start += count;
        }
        Ok(())
    }

    /// Overflow relief: make room in the buffer, preferring to emit text
    /// over growing once the line is already overfull.
    fn ensure_space(&mut self, want: usize) -> PrintResult<usize> {
        loop {
            let available = self.buffer.available();
            if available > 0 {
                return Ok(available);
            }
            if self.buffer.len() > self.line_length {
                // Stalled past the margin: drive the queue, and if that
                // commits nothing to the sink, dump a partial line.
                let wrote = self.maybe_output(false)?;
                if !wrote {
                    self.output_partial_line()?;
                }
            } else {
                self.buffer.grow_for(want);
                return Ok(self.buffer.available());
            }
        }
    }

    // ------------------------------------------------------------------
    // Layout directives
    // ------------------------------------------------------------------

    /// Enqueue a conditional newline. `Mandatory` and `Literal` drive the
    /// queue forward immediately.
    pub fn newline(&mut self, kind: NewlineKind) -> PrintResult<()> {
        let depth = self.pending_blocks.len();
        let posn = self.index_to_posn(self.buffer.len());
        let id = self.queue.push(
            posn,
            Op::Newline {
                kind,
                depth,
                section_end: None,
            },
        );
        self.close_open_sections(id, posn, depth);
        self.maybe_output(kind.is_forcing())?;
        Ok(())
    }

    /// Queue an indentation change, effective at the next line break.
    pub fn indent(&mut self, kind: IndentKind, amount: isize) {
        let posn = self.index_to_posn(self.buffer.len());
        self.queue.push(posn, Op::Indent { kind, amount });
    }

    /// Queue a tab stop.
    pub fn tab(&mut self, kind: TabKind, colnum: usize, colinc: usize) {
        let posn = self.index_to_posn(self.buffer.len());
        self.queue.push(
            posn,
            Op::Tab {
                kind,
                colnum,
                colinc,
            },
        );
    }

    /// Open a logical block. `prefix` is written immediately; with
    /// `per_line` it also repeats after every wrap. `suffix` is saved and
    /// written by the matching [`PrettyStream::end_logical_block`].
    pub fn start_logical_block(
        &mut self,
        prefix: Option<&str>,
        per_line: bool,
        suffix: Option<&str>,
    ) -> PrintResult<()> {
        if let Some(p) = prefix {
            if !p.is_empty() {
                self.write_str(p)?;
            }
        }
        let depth = self.pending_blocks.len();
        let posn = self.index_to_posn(self.buffer.len());
        let per_line_prefix = match prefix {
            Some(p) if per_line && !p.is_empty() => Some(Arc::<str>::from(p)),
            _ => None,
        };
        let suffix: Option<Arc<str>> = match suffix {
            Some(s) if !s.is_empty() => Some(Arc::from(s)),
            _ => None,
        };
        let id = self.queue.push(
            posn,
            Op::BlockStart {
                depth,
                per_line_prefix,
                suffix: suffix.clone(),
                section_end: None,
                block_end: None,
            },
        );
        self.pending_blocks.push(PendingBlock { op: id, suffix });
        Ok(())
    }

    /// Close the innermost open block, writing its saved suffix first.
    pub fn end_logical_block(&mut self) -> PrintResult<()> {
        let Some(pending) = self.pending_blocks.pop() else {
            return Err(PrintError::unmatched_block_end());
        };
        if let Some(suffix) = pending.suffix.clone() {
            self.write_str(&suffix)?;
        }
        let depth = self.pending_blocks.len();
        let posn = self.index_to_posn(self.buffer.len());
        let id = self.queue.push(posn, Op::BlockEnd);
        if let Some(start) = self.queue.get_mut(pending.op) {
            if let Op::BlockStart { block_end, .. } = &mut start.op {
                *block_end = Some(id);
            }
        }
        self.close_open_sections(id, posn, depth);
        Ok(())
    }

    /// Run `body` inside a logical block.
    pub fn logical_block<F>(
        &mut self,
        prefix: Option<&str>,
        per_line: bool,
        suffix: Option<&str>,
        body: F,
    ) -> PrintResult<()>
    where
        F: FnOnce(&mut Self) -> PrintResult<()>,
    {
        self.start_logical_block(prefix, per_line, suffix)?;
        body(self)?;
        self.end_logical_block()
    }

    /// A newline or block-end at `depth` ends every still-open section at
    /// that depth or deeper.
    fn close_open_sections(&mut self, closer: OpId, closer_posn: Posn, depth: usize) {
        for (id, queued) in self.queue.iter_mut() {
            if id == closer {
                continue;
            }
            match &mut queued.op {
                Op::Newline {
                    depth: op_depth,
                    section_end,
                    ..
                }
                | Op::BlockStart {
                    depth: op_depth,
                    section_end,
                    ..
                } => {
                    if section_end.is_none() && *op_depth >= depth {
                        *section_end = Some(closer_posn);
                    }
                }
                Op::Indent { .. } | Op::BlockEnd | Op::Tab { .. } => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Flushing
    // ------------------------------------------------------------------

    /// Drain the queue, expand remaining tabs, and write everything still
    /// buffered. Afterwards the buffer and queue are empty; flushing twice
    /// is the same as flushing once.
    pub fn force_output(&mut self) -> PrintResult<()> {
        self.maybe_output(false)?;
        self.expand_tabs(None);
        if !self.buffer.is_empty() {
            let len = self.buffer.len();
            self.emit_range(0, len)?;
            self.buffer_start_column += len;
            self.buffer_offset += len as i64;
            self.buffer.clear();
        }
        self.queue.clear();
        Ok(())
    }

    /// Copy `buffer[start..end]` to the target sink.
    pub(crate) fn emit_range(&mut self, start: usize, end: usize) -> PrintResult<()> {
        if start >= end {
            return Ok(());
        }
        let text: String = self.buffer.as_slice()[start..end].iter().collect();
        self.target.write_str(&text)
    }
}

#[cfg(test)]
mod tests;

//! The break-decision driver.
//!
//! `maybe_output` drains the operation queue from the front. For each
//! operation it decides, from the hypothetical column of a known future
//! point, whether to commit; a three-valued `fits_on_line` answer of
//! "unknown" stops the loop until more input arrives.

use tracing::trace;

use crate::block::LogicalBlock;
use crate::error::{PrintError, PrintResult};
use crate::posn::Posn;
use crate::queue::{IndentKind, NewlineKind, Op};

use super::PrettyStream;

/// Answer of a fit query against the right margin.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Fits {
    Yes,
    No,
    /// Not enough of the future is buffered to decide.
    Unknown,
}

impl PrettyStream<'_> {
    /// Drain as much of the queue as can be decided. Returns whether any
    /// line (full or partial) was written to the target.
    pub(crate) fn maybe_output(&mut self, force: bool) -> PrintResult<bool> {
        let mut output_anything = false;
        loop {
            let Some((front_id, front)) = self.queue.front() else {
                break;
            };
            let front = front.clone();
            match front.op {
                Op::Newline {
                    kind, section_end, ..
                } => {
                    let fire = match kind {
                        NewlineKind::Literal | NewlineKind::Mandatory | NewlineKind::Linear => true,
                        NewlineKind::Miser => self.misering(),
                        NewlineKind::Fill => {
                            if self.misering()
                                || self.line_number > self.innermost().section_start_line
                            {
                                true
                            } else {
                                match self.fits_on_line(section_end, force) {
                                    Fits::Yes => false,
                                    Fits::No => true,
                                    Fits::Unknown => break,
                                }
                            }
                        }
                    };
                    trace!(?kind, fire, line = self.line_number, "newline decision");
                    if fire {
                        output_anything = true;
                        self.output_line(front.posn, kind)?;
                    }
                    self.queue.pop_front();
                }
                Op::Indent { kind, amount } => {
                    if !self.misering() {
                        let base = match kind {
                            IndentKind::Block => self.innermost().start_column,
                            IndentKind::Current => self.posn_column(front.posn),
                        };
                        #[expect(
                            clippy::cast_possible_wrap,
                            clippy::cast_sign_loss,
                            reason = "columns are far below i64 range and the sum is clamped at 0"
                        )]
                        let column = (base as isize + amount).max(0) as usize;
                        self.set_indentation(column);
                    }
                    self.queue.pop_front();
                }
                Op::BlockStart {
                    section_end,
                    block_end,
                    per_line_prefix,
                    suffix,
                    ..
                } => {
                    match self.fits_on_line(section_end, force) {
                        Fits::Yes => {
                            // The whole block fits on the line: expand its
                            // tabs and drop it from the queue so it prints
                            // as one inline literal.
                            let Some(end) = block_end else {
                                break;
                            };
                            trace!("logical block fits inline");
                            self.expand_tabs(Some(end));
                            self.queue.drop_through(end);
                        }
                        Fits::No => {
                            let column = self.posn_column(front.posn);
                            trace!(column, "logical block commit");
                            self.really_start_logical_block(
                                column,
                                per_line_prefix.as_deref(),
                                suffix.as_deref(),
                            );
                            self.queue.pop_front();
                        }
                        Fits::Unknown => break,
                    }
                }
                Op::BlockEnd => {
                    self.really_end_logical_block();
                    self.queue.pop_front();
                }
                Op::Tab { .. } => {
                    self.expand_tabs(Some(front_id));
                    self.queue.pop_front();
                }
            }
        }
        Ok(output_anything)
    }

    /// Would everything up to `until` (or the whole buffer) fit on the
    /// current line? Reserves room for the ` ..` truncation marker and the
    /// pending suffixes when the next line is the last budgeted one.
    pub(crate) fn fits_on_line(&self, until: Option<Posn>, force: bool) -> Fits {
        let mut available = self.line_length;
        if !self.readably {
            if let Some(lines) = self.print_lines {
                if self.line_number + 1 >= lines {
                    available = available.saturating_sub(3 + self.innermost().suffix_length);
                }
            }
        }
        match until {
            Some(posn) => {
                if self.posn_column(posn) <= available {
                    Fits::Yes
                } else {
                    Fits::No
                }
            }
            None if force => Fits::No,
            None => {
                if self.index_column(self.buffer.len()) > available {
                    Fits::No
                } else {
                    Fits::Unknown
                }
            }
        }
    }

    /// Emit one line ending at `until_posn`. For conditional breaks the
    /// blanks immediately before the break are elided; a literal newline
    /// keeps them and restarts after the per-line prefix only.
    pub(crate) fn output_line(&mut self, until_posn: Posn, kind: NewlineKind) -> PrintResult<()> {
        let literal = kind == NewlineKind::Literal;
        let amount_to_consume = self.posn_to_index(until_posn);
        let amount_to_print = if literal {
            amount_to_consume
        } else {
            self.buffer.as_slice()[..amount_to_consume]
                .iter()
                .rposition(|&c| c != ' ')
                .map_or(0, |i| i + 1)
        };
        self.emit_range(0, amount_to_print)?;
        self.line_number += 1;
        if !self.readably {
            if let Some(lines) = self.print_lines {
                if self.line_number >= lines {
                    self.target.write_str(" ..")?;
                    let suffix_length = self.innermost().suffix_length;
                    if suffix_length > 0 {
                        let text: String = self.suffix.tail(suffix_length).iter().collect();
                        self.target.write_str(&text)?;
                    }
                    return Err(PrintError::line_limit());
                }
            }
        }
        self.target.write_str("\n")?;
        self.buffer_start_column = 0;
        let prefix_length = if literal {
            self.innermost().per_line_prefix_end
        } else {
            self.innermost().prefix_length
        };
        let prefix_chars: Vec<char> = self.prefix.chars(prefix_length).to_vec();
        let shift = amount_to_consume as i64 - prefix_length as i64;
        self.buffer.shift_for_line(amount_to_consume, &prefix_chars);
        self.buffer_offset += shift;
        if !literal {
            let line_number = self.line_number;
            let block = self.innermost_mut();
            block.section_column = prefix_length;
            block.section_start_line = line_number;
        }
        Ok(())
    }

    /// Dump buffered text up to the first queued operation (or all of it)
    /// when the line cannot be broken any further.
    pub(crate) fn output_partial_line(&mut self) -> PrintResult<()> {
        let count = match self.queue.front() {
            Some((_, queued)) => self.posn_to_index(queued.posn),
            None => self.buffer.len(),
        };
        if count == 0 {
            return Err(PrintError::partial_line_on_empty());
        }
        self.emit_range(0, count)?;
        self.buffer_start_column += count;
        self.buffer.drop_front(count);
        self.buffer_offset += count as i64;
        Ok(())
    }

    /// Move the innermost block's indentation to at least `column`.
    pub(crate) fn set_indentation(&mut self, column: usize) {
        let current = self.innermost().prefix_length;
        let minimum = self.innermost().per_line_prefix_end;
        self.prefix.ensure_capacity(column);
        if column > current {
            self.prefix.fill_spaces(current, column);
        }
        self.innermost_mut().prefix_length = column.max(minimum);
    }

    /// Commit a block at `column`: push its record, raise indentation, and
    /// install its per-line prefix and suffix.
    pub(crate) fn really_start_logical_block(
        &mut self,
        column: usize,
        per_line_prefix: Option<&str>,
        suffix: Option<&str>,
    ) {
        let prev = *self.innermost();
        self.blocks.push(LogicalBlock {
            start_column: column,
            section_column: column,
            per_line_prefix_end: prev.per_line_prefix_end,
            prefix_length: prev.prefix_length,
            suffix_length: prev.suffix_length,
            section_start_line: self.line_number,
        });
        self.set_indentation(column);
        if let Some(prefix) = per_line_prefix {
            self.innermost_mut().per_line_prefix_end = column;
            let chars: Vec<char> = prefix.chars().collect();
            self.prefix.write_at(column - chars.len(), &chars);
        }
        if let Some(suffix) = suffix {
            let new_length = self.suffix.append(prev.suffix_length, suffix);
            self.innermost_mut().suffix_length = new_length;
        }
    }

    /// Pop the innermost committed block. If the outer block is indented
    /// deeper than the inner one was, the uncovered prefix columns become
    /// spaces again.
    pub(crate) fn really_end_logical_block(&mut self) {
        if self.blocks.len() <= 1 {
            return;
        }
        let Some(old) = self.blocks.pop() else {
            return;
        };
        let new_indent = self.innermost().prefix_length;
        if new_indent > old.prefix_length {
            self.prefix.fill_spaces(old.prefix_length, new_indent);
        }
    }
}

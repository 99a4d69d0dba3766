#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::object::with_pretty_stream;
use pretty_assertions::assert_eq;

fn render<F>(config: &PrintConfig, body: F) -> String
where
    F: FnOnce(&mut PrettyStream<'_>) -> PrintResult<()>,
{
    let mut out = String::new();
    with_pretty_stream(&mut out, config, body).unwrap();
    out
}

fn margin(columns: usize) -> PrintConfig {
    PrintConfig::with_right_margin(columns)
}

/// Write `items` inside a `(`…`)` block separated by space + `kind`.
fn sep_block(
    stream: &mut PrettyStream<'_>,
    items: &[&str],
    kind: NewlineKind,
) -> PrintResult<()> {
    stream.logical_block(Some("("), false, Some(")"), |s| {
        let mut first = true;
        for item in items {
            if !first {
                s.write_char(' ')?;
                s.newline(kind)?;
            }
            s.write_str(item)?;
            first = false;
        }
        Ok(())
    })
}

#[test]
fn plain_text_passes_through() {
    let out = render(&margin(80), |s| s.write_str("hello world"));
    assert_eq!(out, "hello world");
}

#[test]
fn embedded_newlines_are_literal() {
    let out = render(&margin(80), |s| s.write_str("one\ntwo\n\nthree"));
    assert_eq!(out, "one\ntwo\n\nthree");
}

#[test]
fn fill_fits_on_one_line() {
    let out = render(&margin(20), |s| {
        sep_block(s, &["a", "b", "c"], NewlineKind::Fill)
    });
    assert_eq!(out, "(a b c)");
}

#[test]
fn fill_overflows_at_margin() {
    let out = render(&margin(20), |s| {
        sep_block(
            s,
            &["aaaa", "bbbb", "cccc", "dddd", "eeee"],
            NewlineKind::Fill,
        )
    });
    assert_eq!(out, "(aaaa bbbb cccc\n dddd eeee)");
}

#[test]
fn linear_is_all_or_nothing_when_overflowing() {
    let out = render(&margin(3), |s| {
        s.logical_block(None, false, None, |s| {
            s.write_str("x")?;
            s.write_char(' ')?;
            s.newline(NewlineKind::Linear)?;
            s.write_str("y")?;
            s.write_char(' ')?;
            s.newline(NewlineKind::Linear)?;
            s.write_str("z")
        })
    });
    assert_eq!(out, "x\ny\nz");
}

#[test]
fn linear_stays_inline_when_fitting() {
    let out = render(&margin(20), |s| {
        sep_block(s, &["x", "y", "z"], NewlineKind::Linear)
    });
    assert_eq!(out, "(x y z)");
}

#[test]
fn nested_blocks_fit_inline() {
    let out = render(&margin(20), |s| {
        s.logical_block(Some("["), false, Some("]"), |s| {
            s.logical_block(Some("{"), false, Some("}"), |s| s.write_str("q"))
        })
    });
    assert_eq!(out, "[{q}]");
}

#[test]
fn nested_blocks_close_suffixes_in_lifo_order() {
    let out = render(&margin(6), |s| {
        s.logical_block(Some("["), false, Some("]"), |s| {
            s.write_str("aaaa")?;
            s.write_char(' ')?;
            s.newline(NewlineKind::Fill)?;
            s.logical_block(Some("{"), false, Some("}"), |s| s.write_str("bbbb"))
        })
    });
    assert_eq!(out, "[aaaa\n {bbbb}]");
}

#[test]
fn block_indentation_is_relative_to_start_column() {
    let out = render(&margin(8), |s| {
        s.logical_block(Some("("), false, Some(")"), |s| {
            s.write_str("cond")?;
            s.indent(IndentKind::Block, 2);
            s.write_char(' ')?;
            s.newline(NewlineKind::Fill)?;
            s.write_str("xx")?;
            s.write_char(' ')?;
            s.newline(NewlineKind::Fill)?;
            s.write_str("yyyy")
        })
    });
    assert_eq!(out, "(cond\n   xx\n   yyyy)");
}

#[test]
fn current_indentation_tracks_issue_column() {
    let out = render(&margin(8), |s| {
        s.logical_block(Some("("), false, Some(")"), |s| {
            s.write_str("ab")?;
            s.write_char(' ')?;
            s.indent(IndentKind::Current, 0);
            s.write_str("cd")?;
            s.write_char(' ')?;
            s.newline(NewlineKind::Fill)?;
            s.write_str("efgh")
        })
    });
    assert_eq!(out, "(ab cd\n    efgh)");
}

#[test]
fn per_line_prefix_repeats_after_breaks() {
    let out = render(&margin(80), |s| {
        s.logical_block(Some(";; "), true, None, |s| {
            s.write_str("alpha")?;
            s.newline(NewlineKind::Mandatory)?;
            s.write_str("beta\ngamma")
        })
    });
    assert_eq!(out, ";; alpha\n;; beta\n;; gamma");
}

#[test]
fn fill_breaks_after_a_section_that_wrapped() {
    let out = render(&margin(20), |s| {
        s.logical_block(Some("("), false, Some(")"), |s| {
            s.logical_block(Some("["), false, Some("]"), |s| {
                s.write_str("aa")?;
                s.newline(NewlineKind::Mandatory)?;
                s.write_str("bb")
            })?;
            s.write_char(' ')?;
            s.newline(NewlineKind::Fill)?;
            s.write_str("z")
        })
    });
    // "z" would fit after "bb]", but the previous section spans lines, so
    // the fill break fires anyway.
    assert_eq!(out, "([aa\n  bb]\n z)");
}

#[test]
fn miser_newlines_fire_in_narrow_blocks() {
    let config = PrintConfig {
        right_margin: 20,
        miser_width: Some(15),
        ..PrintConfig::default()
    };
    let out = render(&config, |s| {
        s.write_str("controls")?;
        s.logical_block(Some("("), false, Some(")"), |s| {
            s.write_str("aaaa")?;
            s.indent(IndentKind::Block, 3);
            s.write_char(' ')?;
            s.newline(NewlineKind::Miser)?;
            s.write_str("bbbbbbbbbb")
        })
    });
    // Miser mode: the break fires and the indent directive is ignored, so
    // the continuation sits at the block start column.
    assert_eq!(out, "controls(aaaa\n         bbbbbbbbbb)");
}

#[test]
fn miser_newlines_are_inert_without_miser_width() {
    let out = render(&margin(20), |s| {
        s.write_str("controls")?;
        s.logical_block(Some("("), false, Some(")"), |s| {
            s.write_str("aaaa")?;
            s.write_char(' ')?;
            s.newline(NewlineKind::Miser)?;
            s.write_str("bbbbbbbbbb")
        })
    });
    assert_eq!(out, "controls(aaaa bbbbbbbbbb)");
}

#[test]
fn line_budget_truncates_with_marker_and_suffix() {
    let config = PrintConfig {
        right_margin: 20,
        lines: Some(2),
        ..PrintConfig::default()
    };
    let out = render(&config, |s| {
        sep_block(
            s,
            &["aaaa", "bbbb", "cccc", "dddd", "eeee"],
            NewlineKind::Mandatory,
        )
    });
    assert_eq!(out, "(aaaa\n bbbb ..)");
}

#[test]
fn readably_disables_the_line_budget() {
    let config = PrintConfig {
        right_margin: 20,
        lines: Some(2),
        readably: true,
        ..PrintConfig::default()
    };
    let out = render(&config, |s| {
        sep_block(s, &["aaaa", "bbbb", "cccc"], NewlineKind::Mandatory)
    });
    assert_eq!(out, "(aaaa\n bbbb\n cccc)");
}

#[test]
fn line_tab_pads_to_the_stop() {
    let out = render(&margin(80), |s| {
        s.write_str("ab")?;
        s.tab(TabKind::Line, 10, 0);
        s.write_str("cd")
    });
    assert_eq!(out, "ab        cd");
}

#[test]
fn section_relative_tab_measures_from_section_start() {
    let out = render(&margin(80), |s| {
        s.write_str("pre ")?;
        s.logical_block(None, false, None, |s| {
            s.write_str("abc")?;
            s.tab(TabKind::SectionRelative, 0, 8);
            s.write_str("x")
        })
    });
    // The section starts at column 4; after three characters the tab pads
    // to the next multiple of 8 from the section start.
    assert_eq!(out, "pre abc     x");
}

#[test]
fn aligned_tab_columns_across_lines() {
    let out = render(&margin(80), |s| {
        s.write_str("k1")?;
        s.tab(TabKind::Line, 8, 4);
        s.write_str("v1\n")?;
        s.write_str("key2")?;
        s.tab(TabKind::Line, 8, 4);
        s.write_str("v2")
    });
    assert_eq!(out, "k1      v1\nkey2    v2");
}

#[test]
fn overlong_line_without_breaks_flushes_partially() {
    let body = "x".repeat(300);
    let out = render(&margin(10), |s| s.write_str(&body));
    assert_eq!(out, body);
}

#[test]
fn partial_flush_keeps_later_breaks_working() {
    let body = "y".repeat(200);
    let out = render(&margin(10), |s| {
        s.write_str(&body)?;
        s.newline(NewlineKind::Mandatory)?;
        s.write_str("tail")
    });
    assert_eq!(out, format!("{body}\ntail"));
}

#[test]
fn flush_is_idempotent() {
    let mut out = String::new();
    {
        let mut stream = PrettyStream::new(&mut out, &margin(80));
        stream.write_str("stable").unwrap();
        stream.force_output().unwrap();
        stream.force_output().unwrap();
    }
    assert_eq!(out, "stable");
}

#[test]
fn writes_after_flush_continue_the_line() {
    let mut out = String::new();
    {
        let mut stream = PrettyStream::new(&mut out, &margin(10));
        stream.write_str("abcde").unwrap();
        stream.force_output().unwrap();
        // Column tracking survives the flush: the next characters overflow
        // the margin only when the whole line does.
        stream.write_str("fghij").unwrap();
        stream.force_output().unwrap();
    }
    assert_eq!(out, "abcdefghij");
}

fn space_before_at(next: char) -> Option<char> {
    (next == '@' || next == '.').then_some(' ')
}

#[test]
fn char_out_hook_fires_once() {
    let out = render(&margin(80), |s| {
        s.write_char(',')?;
        s.set_char_out_hook(space_before_at);
        s.write_str("@x@y")
    });
    assert_eq!(out, ", @x@y");
}

#[test]
fn char_out_hook_can_decline() {
    let out = render(&margin(80), |s| {
        s.write_char(',')?;
        s.set_char_out_hook(space_before_at);
        s.write_str("plain")
    });
    assert_eq!(out, ",plain");
}

#[test]
fn unmatched_block_end_errors() {
    let mut out = String::new();
    let mut stream = PrettyStream::new(&mut out, &margin(80));
    let err = stream.end_logical_block().unwrap_err();
    assert!(matches!(err, PrintError::UnmatchedBlockEnd));
}

#[test]
fn sentinel_block_is_never_popped() {
    let mut out = String::new();
    {
        let mut stream = PrettyStream::new(&mut out, &margin(5));
        stream
            .logical_block(Some("("), false, Some(")"), |s| {
                s.write_str("abcdefgh")?;
                s.newline(NewlineKind::Linear)?;
                s.write_str("ij")
            })
            .unwrap();
        stream.force_output().unwrap();
        assert_eq!(stream.blocks.len(), 1);
        assert!(stream.queue.is_empty());
        assert!(stream.buffer.is_empty());
    }
}

#[test]
fn posn_arithmetic_round_trips_across_shifts() {
    let mut out = String::new();
    {
        let mut stream = PrettyStream::new(&mut out, &margin(8));
        stream.write_str("aaaa bbbb cccc").unwrap();
        stream.newline(NewlineKind::Mandatory).unwrap();
        stream.write_str("dd").unwrap();
        let posn = stream.index_to_posn(1);
        assert_eq!(stream.posn_to_index(posn), 1);
        stream.force_output().unwrap();
    }
    assert_eq!(out, "aaaa bbbb cccc\ndd");
}

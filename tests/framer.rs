// tests/framer.rs

mod common;
use crate::common::init_tracing;

use proptest::prelude::*;

use pssh::color::Palette;
use pssh::task::{FramerKey, LineFramer};
use pssh::types::StreamKind;

const OUT: FramerKey = FramerKey {
    fd: 5,
    kind: StreamKind::Out,
};
const ERR: FramerKey = FramerKey {
    fd: 6,
    kind: StreamKind::Err,
};

fn text(bytes: Option<Vec<u8>>) -> Option<String> {
    bytes.map(|b| String::from_utf8(b).unwrap())
}

#[test]
fn complete_lines_are_annotated_with_host_and_arrow() {
    init_tracing();
    let mut framer = LineFramer::new("web1", true, true);

    let out = text(framer.frame(OUT, b"hello\nworld\n", false));
    assert_eq!(out.as_deref(), Some("web1 -> hello\nweb1 -> world\n"));

    let err = text(framer.frame(ERR, b"oops\n", false));
    assert_eq!(err.as_deref(), Some("web1 => oops\n"));
}

#[test]
fn partial_line_is_held_back_until_its_newline_arrives() {
    init_tracing();
    let mut framer = LineFramer::new("web1", true, true);

    let first = text(framer.frame(OUT, b"a\nb", false));
    assert_eq!(first.as_deref(), Some("web1 -> a\n"));
    assert_eq!(framer.pending(OUT), b"b");

    let second = text(framer.frame(OUT, b"c\n", false));
    assert_eq!(second.as_deref(), Some("web1 -> bc\n"));
    assert!(framer.pending(OUT).is_empty());
}

#[test]
fn chunk_without_any_newline_produces_nothing_while_buffering() {
    init_tracing();
    let mut framer = LineFramer::new("web1", true, true);

    assert_eq!(framer.frame(OUT, b"par", false), None);
    assert_eq!(framer.frame(OUT, b"tial", false), None);
    assert_eq!(framer.pending(OUT), b"partial");
}

#[test]
fn forced_finish_releases_fragment_with_unterminated_mark() {
    init_tracing();
    let mut framer = LineFramer::new("web1", true, true);

    assert_eq!(framer.frame(OUT, b"partial", false), None);
    let flushed = text(framer.frame(OUT, b"", true));
    assert_eq!(flushed.as_deref(), Some("web1 -> partial\\\n"));
    assert!(framer.pending(OUT).is_empty());
}

#[test]
fn unbuffered_partial_line_is_printed_immediately_with_mark() {
    init_tracing();
    let mut framer = LineFramer::new("web1", true, false);

    let out = text(framer.frame(OUT, b"partial", false));
    assert_eq!(out.as_deref(), Some("web1 -> partial\\\n"));

    // Nothing left for end of stream.
    assert_eq!(framer.frame(OUT, b"", true), None);
}

#[test]
fn empty_chunk_with_nothing_pending_yields_none() {
    init_tracing();
    let mut framer = LineFramer::new("web1", true, true);
    assert_eq!(framer.frame(OUT, b"", false), None);
    assert_eq!(framer.frame(OUT, b"", true), None);
}

#[test]
fn without_annotation_lines_are_raw_and_unmarked() {
    init_tracing();
    let mut framer = LineFramer::new("web1", false, false);

    let out = text(framer.frame(OUT, b"one\ntwo", false));
    assert_eq!(out.as_deref(), Some("one\ntwo\n"));
}

#[test]
fn blank_lines_and_carriage_returns_are_kept() {
    init_tracing();
    let mut framer = LineFramer::new("h", true, true);

    let out = text(framer.frame(OUT, b"\nx\r\n", false));
    assert_eq!(out.as_deref(), Some("h -> \nh -> x\r\n"));
}

#[test]
fn fragments_are_tracked_per_descriptor_and_kind() {
    init_tracing();
    let mut framer = LineFramer::new("h", true, true);

    assert_eq!(framer.frame(OUT, b"out-", false), None);
    assert_eq!(framer.frame(ERR, b"err-", false), None);

    let err = text(framer.frame(ERR, b"tail\n", false));
    assert_eq!(err.as_deref(), Some("h => err-tail\n"));
    assert_eq!(framer.pending(OUT), b"out-");
}

#[test]
fn ansi_palette_colours_the_arrow() {
    init_tracing();
    let mut framer = LineFramer::new("h", true, true).with_palette(Palette::Ansi);

    let out = framer.frame(OUT, b"x\n", false).unwrap();
    let expected = format!("h {} x\n", Palette::Ansi.out_arrow());
    assert_eq!(out, expected.into_bytes());
}

#[test]
fn emit_writes_framed_text_to_sink() {
    init_tracing();
    let mut framer = LineFramer::new("h", true, true);
    let mut sink: Vec<u8> = Vec::new();

    framer.emit(OUT, b"a\nb", false, &mut sink).unwrap();
    framer.emit(OUT, b"", true, &mut sink).unwrap();

    assert_eq!(sink, b"h -> a\nh -> b\\\n");
}

proptest! {
    #[test]
    fn unannotated_output_reassembles_the_stream(
        data in proptest::collection::vec(prop_oneof![Just(b'\n'), any::<u8>()], 0..400),
        cuts in proptest::collection::vec(0usize..400, 0..8),
    ) {
        let mut framer = LineFramer::new("h", false, true);

        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(data.len())).collect();
        cuts.push(data.len());
        cuts.sort_unstable();

        let mut out = Vec::new();
        let mut start = 0;
        for cut in cuts {
            if let Some(text) = framer.frame(OUT, &data[start..cut], false) {
                out.extend(text);
            }
            start = cut;
        }
        if let Some(text) = framer.frame(OUT, b"", true) {
            out.extend(text);
        }

        let mut expected = data.clone();
        if !expected.is_empty() && expected.last() != Some(&b'\n') {
            expected.push(b'\n');
        }
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn buffered_output_only_contains_whole_lines(
        chunks in proptest::collection::vec("[a-z\n]{0,20}", 1..10),
    ) {
        let mut framer = LineFramer::new("h", true, true);
        for chunk in &chunks {
            if let Some(text) = framer.frame(OUT, chunk.as_bytes(), false) {
                let text = String::from_utf8(text).unwrap();
                prop_assert!(text.ends_with('\n'));
                for line in text.lines() {
                    prop_assert!(line.starts_with("h -> "));
                    prop_assert!(!line.ends_with('\\'));
                }
            }
        }
    }
}

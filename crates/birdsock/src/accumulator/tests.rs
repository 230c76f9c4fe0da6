//! Unit tests for the byte accumulator.

use std::io;

use rstest::rstest;

use super::*;
use crate::test_support::{ReadEvent, ScriptedStream};

#[test]
fn ensure_at_least_reads_until_target_is_met() {
    let stream = ScriptedStream::chunks(&[b"00", b"01 ", b"Hello\n"]);
    let mut accumulator = Accumulator::new(stream);

    let fill = accumulator.ensure_at_least(5).expect("fill succeeds");

    assert_eq!(
        fill,
        Fill {
            read: 5,
            status: FillStatus::Satisfied
        }
    );
    assert_eq!(accumulator.buffered(), b"0001 ");
}

#[test]
fn ensure_at_least_skips_reading_when_buffer_suffices() {
    let stream = ScriptedStream::chunks(&[b"0001 Hello\n"]);
    let observer = stream.observer();
    let mut accumulator = Accumulator::new(stream);
    accumulator.ensure_at_least(5).expect("first fill");

    let fill = accumulator.ensure_at_least(5).expect("second fill");

    assert_eq!(fill.read, 0);
    assert!(fill.is_satisfied());
    assert_eq!(observer.reads(), 1, "second fill must not touch the stream");
}

#[test]
fn ensure_at_least_reports_end_of_stream_with_bytes_read() {
    let stream = ScriptedStream::chunks(&[b"00"]);
    let mut accumulator = Accumulator::new(stream);

    let fill = accumulator.ensure_at_least(5).expect("fill succeeds");

    assert_eq!(
        fill,
        Fill {
            read: 2,
            status: FillStatus::EndOfStream
        }
    );
    assert_eq!(accumulator.len(), 2);
}

#[rstest]
#[case::single_chunk(&[b"1012-route A\n0000 \n".as_slice()], 12)]
#[case::split_before_delimiter(&[b"1012-rou".as_slice(), b"te A", b"\n"], 12)]
#[case::delimiter_first_in_chunk(&[b"1012-route A".as_slice(), b"\n0000 \n"], 12)]
fn fill_until_returns_delimiter_offset(#[case] chunks: &[&[u8]], #[case] expected: usize) {
    let stream = ScriptedStream::chunks(chunks);
    let mut accumulator = Accumulator::new(stream);

    let offset = accumulator.fill_until(b'\n').expect("search succeeds");

    assert_eq!(offset, Some(expected));
}

#[test]
fn fill_until_leaves_bytes_in_place() {
    let stream = ScriptedStream::chunks(&[b"0001 Hi\n"]);
    let mut accumulator = Accumulator::new(stream);

    accumulator.fill_until(b'\n').expect("search succeeds");

    assert_eq!(accumulator.buffered(), b"0001 Hi\n");
}

#[test]
fn fill_until_returns_none_at_end_of_stream() {
    let stream = ScriptedStream::chunks(&[b"1012-partial"]);
    let mut accumulator = Accumulator::new(stream);

    let offset = accumulator.fill_until(b'\n').expect("search succeeds");

    assert_eq!(offset, None);
    assert_eq!(accumulator.buffered(), b"1012-partial");
}

#[test]
fn small_chunk_size_grows_buffer_incrementally() {
    let stream = ScriptedStream::chunks(&[b"0001 Hello\n"]);
    let observer = stream.observer();
    let mut accumulator = Accumulator::with_chunk_size(stream, 4);

    let offset = accumulator.fill_until(b'\n').expect("search succeeds");

    assert_eq!(offset, Some(10));
    assert_eq!(observer.reads(), 3);
}

#[test]
fn zero_chunk_size_is_clamped() {
    let accumulator = Accumulator::with_chunk_size(ScriptedStream::chunks(&[]), 0);
    assert_eq!(accumulator.chunk_size(), 1);
}

#[test]
fn advance_consumes_from_the_front() {
    let stream = ScriptedStream::chunks(&[b"0001 Hi\n0000 \n"]);
    let mut accumulator = Accumulator::new(stream);
    accumulator.ensure_at_least(1).expect("fill succeeds");

    accumulator.advance(8);

    assert_eq!(accumulator.buffered(), b"0000 \n");
    accumulator.advance(100);
    assert!(accumulator.is_empty());
}

#[test]
fn interrupted_reads_are_retried() {
    let stream = ScriptedStream::new([
        ReadEvent::Fail(io::ErrorKind::Interrupted),
        ReadEvent::Data(b"0001 Hi\n".to_vec()),
    ]);
    let mut accumulator = Accumulator::new(stream);

    let fill = accumulator.ensure_at_least(5).expect("fill succeeds");

    assert!(fill.is_satisfied());
}

#[test]
fn other_read_errors_propagate() {
    let stream = ScriptedStream::new([ReadEvent::Fail(io::ErrorKind::ConnectionReset)]);
    let mut accumulator = Accumulator::new(stream);

    let error = accumulator.fill_until(b'\n').expect_err("read fails");

    assert_eq!(error.kind(), io::ErrorKind::ConnectionReset);
}

#[test]
fn clear_discards_buffered_bytes() {
    let stream = ScriptedStream::chunks(&[b"0001 Hi\n"]);
    let mut accumulator = Accumulator::new(stream);
    accumulator.ensure_at_least(1).expect("fill succeeds");

    accumulator.clear();

    assert!(accumulator.is_empty());
}

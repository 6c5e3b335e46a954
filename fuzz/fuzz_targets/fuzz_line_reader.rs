//! Fuzz target: `LineReader::poll`
//!
//! Drives arbitrary byte sequences through the line reader and asserts
//! that it never panics, never yields a line longer than its capacity or
//! containing a terminator, and always ends up ready for a fresh line.
//!
//! cargo fuzz run fuzz_line_reader

#![no_main]

use fanled::protocol::line_reader::{LineReader, MAX_LINE_LEN, ReadOutcome};
use fanled::protocol::transport::MemoryTransport;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader: LineReader = LineReader::new();
    let mut wire = MemoryTransport::new();
    wire.inject(data);

    while let Ok(Some(outcome)) = reader.poll(&mut wire) {
        if let ReadOutcome::Line(line) = outcome {
            assert!(line.len() <= MAX_LINE_LEN, "line exceeds capacity");
            assert!(!line.contains(&b'\n'), "terminator leaked into line");
            assert!(!line.contains(&b'\r'), "carriage return leaked into line");
        }
    }
    assert_eq!(wire.pending(), 0, "reader must drain the transport");

    // A terminated command after any garbage is still recognised.
    reader.reset();
    wire.inject(b"GET?\n");
    assert_eq!(reader.poll(&mut wire), Ok(Some(ReadOutcome::Line(b"GET?"))));
});

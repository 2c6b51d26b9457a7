#![allow(missing_docs)]
#![allow(dead_code)]

pub const ORIGINAL: &str = concat!(
    r#"<msg id="1">hello</msg>"#,
    r#"<msg id="2"><msg>nested ☃</msg></msg>"#,
    r#"<msg>日本</msg>"#,
);

// This stream simulates socket reads of the document above. Chunks are cut
// mid-delimiter and mid-character so that reads have to wait both for
// closing markers and for the rest of a UTF-8 sequence.
#[rustfmt::skip]
pub const STREAM: [&[u8]; 7] = [
    br#"<msg id="1">hel"#,                          // open, no close yet
    br#"lo</ms"#,                                   // close marker cut in half
    b"g><msg id=\"2\"><msg>nested \xE2\x98",      // first element closes; snowman cut after 2 bytes
    b"\x83</msg>",                                  // snowman completes; inner close only
    b"</msg><msg>\xE6",                             // outer close; next element opens; cut inside a CJK char
    b"\x97\xA5\xE6\x9C\xAC</msg",                   // CJK completes; close marker missing '>'
    b">",                                           // final close
];

/// The elements a nesting-aware `<msg` / `</msg>` read yields from `STREAM`.
pub const ELEMENTS: [&str; 3] = [
    r#"<msg id="1">hello</msg>"#,
    r#"<msg id="2"><msg>nested ☃</msg></msg>"#,
    r#"<msg>日本</msg>"#,
];

#[test]
fn assert_stream_example() {
    assert_eq!(STREAM.concat(), ORIGINAL.as_bytes());
    assert_eq!(ELEMENTS.concat(), ORIGINAL);
}

#![allow(missing_docs)]

mod common;

use std::{fmt::Write as _, thread, time::Duration};

use scanbuf::{
    Bounds, DecodeError, Mode, Nesting, Read, Session, SessionError, SessionOptions, Snapshot,
};

use crate::common::{ELEMENTS, STREAM};

fn render_stream(session: &Session) -> String {
    let mut out = String::new();
    for (i, chunk) in STREAM.iter().enumerate() {
        session.write(chunk).unwrap();
        loop {
            match session.read_enclosed::<String>("<msg", "</msg>", Bounds::Inclusive, Nesting::Aware)
            {
                Ok(Some(element)) => writeln!(out, "{i}: element {element:?}").unwrap(),
                Ok(None) => {
                    writeln!(out, "{i}: waiting").unwrap();
                    break;
                }
                Err(SessionError::Decode(err)) => {
                    writeln!(out, "{i}: {err}").unwrap();
                    break;
                }
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }
    out
}

#[test]
fn snapshot_fragmented_text_stream() {
    let session = Session::start(Mode::Text).unwrap();
    insta::assert_snapshot!(render_stream(&session), @r#"
    0: waiting
    1: waiting
    2: buffer is not valid UTF-8 after 47 bytes
    3: element "<msg id=\"1\">hello</msg>"
    3: waiting
    4: buffer is not valid UTF-8 after 44 bytes
    5: element "<msg id=\"2\"><msg>nested ☃</msg></msg>"
    5: waiting
    6: element "<msg>日本</msg>"
    6: waiting
    "#);
    session.stop().unwrap();
}

#[test]
fn binary_stream_yields_same_elements_without_decoding() {
    let session = Session::start(Mode::Binary).unwrap();
    let mut got = Vec::new();
    for chunk in STREAM {
        session.write(chunk).unwrap();
        while let Some(element) = session
            .read::<Vec<u8>>(Read::across(&b"<msg"[..], &b"</msg>"[..]))
            .unwrap()
        {
            got.push(String::from_utf8(element).unwrap());
        }
    }
    assert_eq!(got, ELEMENTS);
}

#[test]
fn measured_bytes() {
    let session = Session::start(Mode::Binary).unwrap();
    session.write([23u8, 45]).unwrap();
    assert_eq!(session.read_measured::<Vec<u8>>(3), Ok(None));
    session.write([67u8, 89]).unwrap();
    assert_eq!(session.read_measured::<Vec<u8>>(3), Ok(Some(vec![23, 45, 67])));
    assert_eq!(session.snapshot().unwrap().data(), [89]);
}

#[test]
fn measured_graphemes() {
    let session = Session::start(Mode::Text).unwrap();
    session.write("e\u{301}a\u{1F1EF}").unwrap();
    // The regional indicator may still pair with the next one, but is a
    // complete cluster on its own as far as the buffer knows.
    assert_eq!(
        session.read_measured::<String>(2),
        Ok(Some("e\u{301}a".to_owned()))
    );
    assert_eq!(session.read_measured::<String>(2), Ok(None));
}

#[test]
fn terminated_exclusive_then_inclusive() {
    let session = Session::start(Mode::Text).unwrap();
    session.write("foo<br/>bar<br/>").unwrap();
    assert_eq!(
        session.read_terminated::<String>("<br/>", Bounds::Exclusive),
        Ok(Some("foo".to_owned()))
    );
    assert_eq!(
        session.read_terminated::<String>("<br/>", Bounds::Inclusive),
        Ok(Some("<br/>".to_owned()))
    );
    assert_eq!(
        session.read_terminated::<String>("<br/>", Bounds::Inclusive),
        Ok(Some("bar<br/>".to_owned()))
    );
}

#[test]
fn nesting_and_overlap_ignoring() {
    let session = Session::start(Mode::Text).unwrap();
    session.write("<e>foo<e>bar</e></e>baz").unwrap();
    let snapshot = session.snapshot().unwrap();

    assert_eq!(
        session.read_enclosed::<String>("<e>", "</e>", Bounds::Inclusive, Nesting::Aware),
        Ok(Some("<e>foo<e>bar</e></e>".to_owned()))
    );
    assert_eq!(session.snapshot().unwrap().data(), b"baz");

    let scratch = Session::from_snapshot(snapshot).unwrap();
    assert_eq!(
        scratch.read_enclosed::<String>("<e>", "</e>", Bounds::Inclusive, Nesting::IgnoreOverlap),
        Ok(Some("<e>foo<e>bar</e>".to_owned()))
    );
    assert_eq!(scratch.snapshot().unwrap().data(), b"</e>baz");
}

#[test]
fn incomplete_read_is_repeatable() {
    let session = Session::start(Mode::Text).unwrap();
    session.write("<e>foo</e").unwrap();
    let read = Read::across("<e>", "</e>");
    assert_eq!(session.read::<String>(read), Ok(None));
    assert_eq!(session.read::<String>(read), Ok(None));
    assert_eq!(session.snapshot().unwrap().data(), b"<e>foo</e");

    session.write(">").unwrap();
    assert_eq!(session.read::<String>(read), Ok(Some("<e>foo</e>".to_owned())));
}

#[test]
fn mode_isolation() {
    let binary = Session::start(Mode::Binary).unwrap();
    binary.write(b"abc\n").unwrap();
    assert_eq!(
        binary.read_terminated::<String>("\n", Bounds::Inclusive),
        Err(SessionError::ModeMismatch {
            expected: Mode::Binary,
            found: Mode::Text,
        })
    );
    assert_eq!(binary.snapshot().unwrap().data(), b"abc\n");

    let text = Session::start(Mode::Text).unwrap();
    text.write("abc\n").unwrap();
    assert_eq!(
        text.read_measured::<Vec<u8>>(1),
        Err(SessionError::ModeMismatch {
            expected: Mode::Text,
            found: Mode::Binary,
        })
    );
    assert_eq!(
        text.read_terminated::<String>("\n", Bounds::Inclusive),
        Ok(Some("abc\n".to_owned()))
    );
}

#[test]
fn decode_error_leaves_buffer_alone() {
    let session = Session::start(Mode::Text).unwrap();
    session.write([b'a', b';', 0xC3]).unwrap();
    assert_eq!(
        session.read_terminated::<String>(";", Bounds::Inclusive),
        Err(SessionError::Decode(DecodeError {
            valid_up_to: 2,
            incomplete: true,
        }))
    );
    session.write([0xA9]).unwrap();
    assert_eq!(
        session.read_terminated::<String>(";", Bounds::Inclusive),
        Ok(Some("a;".to_owned()))
    );
    assert_eq!(session.read_measured::<String>(1), Ok(Some("é".to_owned())));
}

#[test]
fn invalid_mode_names_are_rejected() {
    assert_eq!(
        "utf16".parse::<Mode>(),
        Err(SessionError::InvalidMode("utf16".to_owned()))
    );
    let session = Session::start("Text".parse().unwrap()).unwrap();
    assert_eq!(session.mode(), Mode::Text);
}

#[test]
fn writes_from_clones_are_applied_in_order() {
    const THREADS: usize = 4;
    const LINES: usize = 200;

    let session = Session::start(Mode::Text).unwrap();
    let writers: Vec<_> = (0..THREADS)
        .map(|t| {
            let session = session.clone();
            thread::spawn(move || {
                for n in 0..LINES {
                    session.write(format!("{t}:{n}\n")).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let mut next = [0usize; THREADS];
    while let Some(line) = session
        .read_terminated::<String>("\n", Bounds::Inclusive)
        .unwrap()
    {
        let (t, n) = line.trim_end().split_once(':').unwrap();
        let t: usize = t.parse().unwrap();
        assert_eq!(n.parse::<usize>().unwrap(), next[t], "lines from writer {t}");
        next[t] += 1;
    }
    assert_eq!(next, [LINES; THREADS]);
}

#[test]
fn stop_is_terminal_for_every_handle() {
    let session = Session::start(Mode::Binary).unwrap();
    let other = session.clone();
    session.write(b"pending").unwrap();
    session.stop().unwrap();

    assert_eq!(other.write(b"more"), Err(SessionError::Stopped));
    assert_eq!(other.read_measured::<Vec<u8>>(1), Err(SessionError::Stopped));
    assert_eq!(other.snapshot(), Err(SessionError::Stopped));
    assert_eq!(session.stop(), Err(SessionError::Stopped));
}

#[test]
fn timed_out_read_still_runs() {
    let session = Session::start(Mode::Text).unwrap();
    session.write("line\n").unwrap();
    match session.read_timeout::<String>(Read::through("\n"), Duration::ZERO) {
        Ok(Some(line)) => assert_eq!(line, "line\n"),
        Err(SessionError::Timeout(d)) => assert_eq!(d, Duration::ZERO),
        other => panic!("unexpected result: {other:?}"),
    }
    // Either way the worker consumed the line.
    assert_eq!(session.read_measured::<String>(1), Ok(None));
}

#[test]
fn replace_is_guarded_by_generation() {
    let session = Session::with_options(SessionOptions {
        mode: Mode::Binary,
        thread_name: Some("replace-test".to_owned()),
        ..Default::default()
    })
    .unwrap();
    session.write(b"abc").unwrap();
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.mode(), Mode::Binary);

    session.write(b"d").unwrap();
    assert_eq!(
        session.replace(snapshot.generation(), Snapshot::new(Mode::Binary, b"z".to_vec())),
        Err(SessionError::Conflict {
            expected: snapshot.generation(),
            found: snapshot.generation() + 1,
        })
    );

    let current = session.snapshot().unwrap();
    assert_eq!(current.data(), b"abcd");
    session
        .replace(current.generation(), Snapshot::new(Mode::Binary, b"z".to_vec()))
        .unwrap();
    assert_eq!(session.read_measured::<Vec<u8>>(1), Ok(Some(b"z".to_vec())));
}

//! Pulls whole records out of a stream that arrives in awkward fragments.
//!
//! A producer thread plays the role of a socket: it writes a small XML-ish
//! document into a shared [`Session`] a few bytes at a time, cutting through
//! closing tags and multi-byte characters. The main thread keeps asking for
//! the next `<item>` record and only ever sees complete ones.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=debug cargo run -p scanbuf --example fragmented_feed
//! ```

use std::{thread, time::Duration};

use scanbuf::{Bounds, Mode, Nesting, Session, SessionError};

fn main() -> Result<(), SessionError> {
    env_logger::init();

    let session = Session::start(Mode::Text)?;
    let producer = {
        let session = session.clone();
        thread::spawn(move || -> Result<(), SessionError> {
            let fragments: [&[u8]; 8] = [
                b"<item>caf\xC3",
                b"\xA9</it",
                b"em><item>nested <item>",
                b"inner</item>",
                b" done</item><item>\xE2\x98",
                b"\x83</item>",
                b"<item>tail",
                b"</item>",
            ];
            for fragment in fragments {
                session.write(fragment)?;
                thread::sleep(Duration::from_millis(20));
            }
            Ok(())
        })
    };

    let mut records = 0;
    while records < 4 {
        match session.read_enclosed::<String>("<item>", "</item>", Bounds::Exclusive, Nesting::Aware) {
            Ok(Some(item)) => {
                records += 1;
                println!("record {records}: {item}");
            }
            // Either nothing complete yet or a character is still cut in half.
            Ok(None) | Err(SessionError::Decode(_)) => thread::sleep(Duration::from_millis(5)),
            Err(err) => return Err(err),
        }
    }

    if let Ok(result) = producer.join() {
        result?;
    }
    session.stop()
}

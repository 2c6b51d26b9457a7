#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use scanbuf::{Bounds, Engine, Mode, Nesting, Read, SessionError};

#[derive(Debug, Arbitrary)]
enum Shape {
    Measured(u8),
    Terminated(Vec<u8>),
    Enclosed(Vec<u8>, Vec<u8>, bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    text: bool,
    seed: u64,
    shape: Shape,
    data: Vec<u8>,
}

impl Shape {
    fn read(&self) -> Read<'_, [u8]> {
        match self {
            Shape::Measured(n) => Read::Measured(usize::from(*n)),
            Shape::Terminated(t) => Read::through(t),
            Shape::Enclosed(l, r, ignore_overlap) => Read::Enclosed {
                left: l,
                right: r,
                bounds: Bounds::Inclusive,
                nesting: if *ignore_overlap {
                    Nesting::IgnoreOverlap
                } else {
                    Nesting::Aware
                },
            },
        }
    }
}

fn as_text(delimiter: &[u8]) -> &str {
    core::str::from_utf8(delimiter).unwrap_or("\u{FFFD}")
}

/// Reads one inclusive element in the engine's own mode.
fn read_one(engine: &mut Engine, read: Read<'_, [u8]>) -> Result<Option<Vec<u8>>, SessionError> {
    match engine.mode() {
        Mode::Binary => engine.read::<Vec<u8>>(read),
        Mode::Text => {
            let read = match read {
                Read::Measured(n) => Read::Measured(n),
                Read::Terminated { terminator, bounds } => Read::Terminated {
                    terminator: as_text(terminator),
                    bounds,
                },
                Read::Enclosed {
                    left,
                    right,
                    bounds,
                    nesting,
                } => Read::Enclosed {
                    left: as_text(left),
                    right: as_text(right),
                    bounds,
                    nesting,
                },
            };
            engine.read::<String>(read).map(|s| s.map(String::into_bytes))
        }
    }
}

/// Every inclusive element read, followed by whatever is still pending, must
/// reconstruct the input no matter how it was split into writes.
fn scanner(input: &Input) {
    let mode = if input.text { Mode::Text } else { Mode::Binary };
    let mut engine = Engine::new(mode);
    let mut rng = SmallRng::seed_from_u64(input.seed);
    let read = input.shape.read();

    let mut out = Vec::new();
    let mut rest = input.data.as_slice();
    while !rest.is_empty() {
        let (chunk, tail) = rest.split_at(rng.random_range(1..=rest.len()));
        rest = tail;
        engine.write(chunk);
        loop {
            let before = engine.pending();
            match read_one(&mut engine, read) {
                Ok(Some(element)) => {
                    assert_eq!(before - engine.pending(), element.len());
                    out.extend_from_slice(&element);
                    if element.is_empty() {
                        break;
                    }
                }
                Ok(None) | Err(SessionError::Decode(_)) => {
                    assert_eq!(before, engine.pending());
                    break;
                }
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    out.extend_from_slice(engine.snapshot().data());
    assert_eq!(out, input.data);
}

fuzz_target!(|input: Input| scanner(&input));

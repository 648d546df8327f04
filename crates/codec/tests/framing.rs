//! Framing properties of the session format.

use std::io::{self, Read};

use arena::Arena;
use codec::{Separators, SessionReader, SessionWriter};
use proptest::prelude::*;

/// Reader that returns the data in chunks of the given sizes, cycling.
struct Chunked {
    data: Vec<u8>,
    pos: usize,
    sizes: Vec<usize>,
    turn: usize,
}

impl Read for Chunked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = self.sizes[self.turn % self.sizes.len()];
        self.turn += 1;
        let n = want.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn payload() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![b'a'..=b'z', Just(b' '), Just(b'\n'), Just(b'>'), Just(b'~')],
        0..24,
    )
    .prop_filter("payload must not contain a sentinel", |bytes| {
        !bytes.windows(2).any(|w| w == b"~>" || w == b"<~") && bytes.last() != Some(&b'~')
    })
}

proptest! {
    #[test]
    fn recorded_sessions_replay_identically(
        records in proptest::collection::vec((payload(), payload()), 0..8),
        sizes in proptest::collection::vec(1usize..9, 1..4),
    ) {
        let mut writer = SessionWriter::new(Vec::new(), Separators::default());
        for (request, response) in &records {
            writer.write_record(request, response).unwrap();
        }
        let data = writer.into_inner();

        let source = Chunked { data, pos: 0, sizes, turn: 0 };
        let mut reader = SessionReader::new(source, Separators::default());
        let mut arena = Arena::with_capacity(4096);
        let mut decoded = Vec::new();
        while let Some(record) = reader.read_record(&mut arena).unwrap() {
            decoded.push((
                arena.bytes(record.request).to_vec(),
                arena.bytes(record.response).to_vec(),
            ));
        }
        prop_assert_eq!(decoded, records);
    }
}

#[test]
fn custom_separators_frame_multibyte_sentinels() {
    let separators = Separators::new("<<REQ>>", "<<RES>>").unwrap();
    let mut writer = SessionWriter::new(Vec::new(), separators.clone());
    writer.write_record(b"<<RE", b"RES>>").unwrap();
    let data = writer.into_inner();

    let mut arena = Arena::with_capacity(256);
    let mut reader = SessionReader::new(data.as_slice(), separators);
    let record = reader.read_record(&mut arena).unwrap().unwrap();
    assert_eq!(arena.bytes(record.request), b"<<RE");
    assert_eq!(arena.bytes(record.response), b"RES>>");
    assert!(reader.read_record(&mut arena).unwrap().is_none());
}

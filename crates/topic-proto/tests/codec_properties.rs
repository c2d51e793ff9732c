//! Property tests for line framing and broker line classification.

use bytes::BytesMut;
use proptest::prelude::*;
use tokio_util::codec::Decoder;
use topic_proto::{LineCodec, ServerLine, INSPECTING_KEYWORD};

fn line_strategy() -> impl Strategy<Value = String> {
    "[^\r\n]{0,40}"
}

proptest! {
    /// However the byte stream is chunked by the network, the decoded lines
    /// are the same.
    #[test]
    fn decoding_is_independent_of_chunking(
        lines in prop::collection::vec(line_strategy(), 1..8),
        chunk in 1usize..16,
    ) {
        let wire: Vec<u8> = lines
            .iter()
            .flat_map(|l| l.bytes().chain(std::iter::once(b'\n')))
            .collect();

        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();
        for piece in wire.chunks(chunk) {
            buf.extend_from_slice(piece);
            while let Some(line) = codec.decode(&mut buf).unwrap() {
                decoded.push(line);
            }
        }

        prop_assert!(buf.is_empty());
        prop_assert_eq!(decoded, lines);
    }

    /// Only lines led by the control keyword are control lines; all others are
    /// passed through untouched.
    #[test]
    fn non_control_lines_are_verbatim_payload(line in line_strategy()) {
        prop_assume!(line.split_whitespace().next() != Some(INSPECTING_KEYWORD));
        prop_assert_eq!(ServerLine::parse(&line), ServerLine::Payload(line.clone()));
    }

    /// Any value token other than a case-insensitive boolean coerces to false.
    #[test]
    fn unknown_inspection_values_coerce_to_false(value in "[a-zA-Z0-9]{1,10}") {
        let lowered = value.to_ascii_lowercase();
        prop_assume!(lowered != "true" && lowered != "false");

        match ServerLine::parse(&format!("{INSPECTING_KEYWORD} {value}")) {
            ServerLine::Inspecting(signal) => {
                prop_assert!(!signal.active);
                prop_assert!(signal.coerced);
            }
            other => prop_assert!(false, "expected control line, got {:?}", other),
        }
    }
}

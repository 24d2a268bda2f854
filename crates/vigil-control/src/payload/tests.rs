//! Unit tests for payload handling.

use rstest::rstest;

use super::*;

#[rstest]
#[case::plain(b"plugina".as_slice(), "plugina")]
#[case::trailing_newline(b"plugina\n".as_slice(), "plugina")]
#[case::only_one_newline_stripped(b"plugina\n\n".as_slice(), "plugina\n")]
#[case::newline_only(b"\n".as_slice(), "")]
fn decode_strips_one_trailing_newline(#[case] payload: &[u8], #[case] expected: &str) {
    assert_eq!(decode(payload).expect("valid payload"), expected);
}

#[rstest]
#[case::empty(Vec::new())]
#[case::at_limit(vec![b'a'; MAX_PAYLOAD_LEN])]
#[case::not_utf8(vec![0xff, 0xfe])]
fn decode_rejects_invalid_payloads(#[case] payload: Vec<u8>) {
    let error = decode(&payload).expect_err("payload must be rejected");
    assert!(matches!(error, CheckError::InvalidArgument { .. }));
}

#[test]
fn decode_accepts_longest_payload() {
    let payload = vec![b'a'; MAX_PAYLOAD_LEN - 1];
    assert_eq!(decode(&payload).map(str::len), Ok(MAX_PAYLOAD_LEN - 1));
}

#[rstest]
#[case::single("plugina", &["plugina"])]
#[case::commas("a,b,c", &["a", "b", "c"])]
#[case::mixed(" a\t,b  c,", &["a", "b", "c"])]
#[case::separators_only(" ,\t", &[])]
fn tokens_skip_empty_fields(#[case] text: &str, #[case] expected: &[&str]) {
    assert_eq!(tokens(text).collect::<Vec<_>>(), expected);
}

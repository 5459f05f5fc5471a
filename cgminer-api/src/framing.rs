//! Response framing and wire-format repair.
//!
//! The daemon ends every response with a single NUL byte and sends no length
//! prefix, so a response is complete only once that byte arrives. Its JSON
//! body has a known defect: sibling objects inside an array are written
//! back-to-back without a separating comma (`}{`), and the body may contain
//! newlines. [`repair`] fixes both textually before any decoding happens, so
//! the decoder never needs to be tolerant.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{ApiError, ApiResult};

/// Byte terminating every daemon response.
pub const TERMINATOR: u8 = 0x00;

/// Read one response, up to and including the terminator.
///
/// Fails with [`ApiError::Framing`] if the peer closes before the terminator
/// arrives, including when it closes without sending anything.
pub async fn read_frame<R>(reader: &mut R) -> ApiResult<Vec<u8>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(4096);
    reader.read_until(TERMINATOR, &mut buf).await?;

    if buf.last() != Some(&TERMINATOR) {
        return Err(ApiError::Framing {
            received: buf.len(),
        });
    }

    Ok(buf)
}

/// Repair a raw response body into parseable JSON text.
///
/// Newlines go first: a `}` and `{` on either side of a line break only
/// become adjacent once the break is removed. Trailing terminators are
/// stripped last. Applying this twice gives the same result as once.
pub fn repair(raw: &str) -> String {
    raw.replace('\n', "")
        .replace("}{", "},{")
        .trim_end_matches(char::from(TERMINATOR))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn test_repair_known_defect() {
        let raw = "{\"STATUS\":[{\"a\":1}]}{\"EXTRA\":2}\n";
        assert_eq!(repair(raw), r#"{"STATUS":[{"a":1}]},{"EXTRA":2}"#);
    }

    #[test_case("{\"a\":1}\0", r#"{"a":1}"#; "terminator_only")]
    #[test_case("{\"a\":1}\0\0", r#"{"a":1}"#; "repeated_terminator")]
    #[test_case("{\"S\":[{\"a\":1}\n{\"b\":2}]}\0", r#"{"S":[{"a":1},{"b":2}]}"#; "split_across_lines")]
    #[test_case("{\"S\":[{}{}{}]}", r#"{"S":[{},{},{}]}"#; "runs_of_empty_objects")]
    #[test_case("{\"S\":[{\"a\":1},{\"b\":2}]}", r#"{"S":[{"a":1},{"b":2}]}"#; "already_valid")]
    #[test_case("", ""; "empty")]
    fn test_repair_cases(raw: &str, expected: &str) {
        assert_eq!(repair(raw), expected);
    }

    #[test]
    fn test_repaired_stats_body_parses() {
        // bmminer sends the STATS records back-to-back
        let raw = "{\"STATUS\":[{\"STATUS\":\"S\"}],\"STATS\":[{\"Type\":\"S9\"}{\"Elapsed\":10}],\"id\":1}\0";
        let value: serde_json::Value = serde_json::from_str(&repair(raw)).unwrap();
        assert_eq!(value["STATS"][1]["Elapsed"], 10);
    }

    proptest! {
        #[test]
        fn repair_is_idempotent(raw in "[{}\\n\\x00a:,\"]{0,64}") {
            let once = repair(&raw);
            prop_assert_eq!(repair(&once), once.clone());
            prop_assert!(!once.contains('\n'));
            prop_assert!(!once.contains("}{"), "adjacent objects remain after repair");
        }
    }

    #[tokio::test]
    async fn test_read_frame_stops_at_terminator() {
        let mut input: &[u8] = b"{\"a\":1}\0{\"next\":2}\0";
        let frame = read_frame(&mut input).await.unwrap();
        assert_eq!(frame, b"{\"a\":1}\0");
        assert_eq!(input, b"{\"next\":2}\0");
    }

    #[tokio::test]
    async fn test_read_frame_without_terminator() {
        let mut input: &[u8] = b"{\"STATUS\":[";
        let err = read_frame(&mut input).await.unwrap_err();
        assert!(matches!(err, ApiError::Framing { received: 11 }));
    }

    #[tokio::test]
    async fn test_read_frame_empty_stream() {
        let mut input: &[u8] = b"";
        let err = read_frame(&mut input).await.unwrap_err();
        assert!(matches!(err, ApiError::Framing { received: 0 }));
    }
}

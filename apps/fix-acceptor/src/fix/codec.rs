//! FIX 4.2 wire codec.
//!
//! Framing is `8=BeginString`, `9=BodyLength`, body, `10=CheckSum`, with
//! every field terminated by SOH. BodyLength counts the bytes between the
//! SOH that ends the `9=` field and the start of the `10=` field; CheckSum
//! is the sum of all preceding bytes mod 256, rendered as three zero-padded
//! decimal digits.
//!
//! The decoder is incremental: partial reads accumulate in an internal
//! buffer and a message is only emitted once the full frame (including the
//! checksum trailer) has arrived.

use super::message::FixMessage;
use super::tags::{BEGIN_STRING, SOH, TAG_BEGIN_STRING, TAG_BODY_LENGTH, TAG_CHECK_SUM};

/// Upper bound on the digit count of `9=BodyLength`. A longer run of
/// digits is treated as malformed rather than waited on.
const MAX_BODY_LENGTH_DIGITS: usize = 7;

/// Checksum trailer size: `10=` + three digits + SOH.
const TRAILER_LEN: usize = 7;

/// Errors that invalidate a frame. Any of these tears the connection down
/// without a FIX-level response.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FramingError {
    /// Stream does not begin with `8=FIX.4.2`.
    #[error("missing or unsupported BeginString")]
    BadBeginString,

    /// `9=BodyLength` absent or not a plausible integer.
    #[error("malformed BodyLength")]
    BadBodyLength,

    /// Declared BodyLength does not land on the `10=` checksum field.
    #[error("BodyLength does not match framed message")]
    BodyLengthMismatch,

    /// Checksum trailer disagrees with the computed sum.
    #[error("checksum mismatch: message carries {declared}, computed {computed:03}")]
    ChecksumMismatch {
        /// Checksum digits carried in the message.
        declared: String,
        /// Sum of the preceding bytes mod 256.
        computed: u8,
    },

    /// A field is not terminated by SOH.
    #[error("tag value not terminated by SOH")]
    UnterminatedTag,

    /// A field has no `=` or a non-numeric tag number.
    #[error("malformed tag in field {field:?}")]
    BadTag {
        /// The offending field text.
        field: String,
    },

    /// Non-ASCII byte where ASCII is required.
    #[error("non-ASCII byte {byte:#04x} in message")]
    NonAscii {
        /// The offending byte.
        byte: u8,
    },
}

/// Sum of `bytes` mod 256 (the FIX checksum).
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Serialize an outbound message body into a full FIX frame.
///
/// `msg` must hold the body only (starting at `35=MsgType`); BeginString,
/// BodyLength and CheckSum are written here.
#[must_use]
pub fn encode(msg: &FixMessage) -> Vec<u8> {
    let mut body = Vec::with_capacity(128);
    for (tag, value) in msg.tags() {
        debug_assert!(
            !matches!(*tag, TAG_BEGIN_STRING | TAG_BODY_LENGTH | TAG_CHECK_SUM),
            "framing tags are codec-owned"
        );
        body.extend_from_slice(tag.to_string().as_bytes());
        body.push(b'=');
        body.extend_from_slice(value.as_bytes());
        body.push(SOH);
    }

    let mut out = Vec::with_capacity(body.len() + 32);
    out.extend_from_slice(format!("8={BEGIN_STRING}").as_bytes());
    out.push(SOH);
    out.extend_from_slice(format!("9={}", body.len()).as_bytes());
    out.push(SOH);
    out.extend_from_slice(&body);

    let sum = checksum(&out);
    out.extend_from_slice(format!("10={sum:03}").as_bytes());
    out.push(SOH);
    out
}

/// Incremental FIX frame decoder.
#[derive(Debug, Default)]
pub struct FixDecoder {
    buf: Vec<u8>,
}

impl FixDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes read from the socket.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes currently buffered, for diagnostics on framing errors.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Try to extract the next complete message.
    ///
    /// Returns `Ok(None)` while the frame is still partial. Any framing
    /// error leaves the buffer untouched for the caller to log.
    pub fn next_message(&mut self) -> Result<Option<FixMessage>, FramingError> {
        let header = format!("8={BEGIN_STRING}\x01");
        let header = header.as_bytes();

        if self.buf.is_empty() {
            return Ok(None);
        }
        if self.buf.len() < header.len() {
            return if header.starts_with(&self.buf) {
                Ok(None)
            } else {
                Err(FramingError::BadBeginString)
            };
        }
        if !self.buf.starts_with(header) {
            return Err(FramingError::BadBeginString);
        }

        // 9=<digits><SOH>
        let len_field = &self.buf[header.len()..];
        if len_field.len() < 2 {
            return Ok(None);
        }
        if &len_field[..2] != b"9=" {
            return Err(FramingError::BadBodyLength);
        }
        let digits = &len_field[2..];
        let Some(soh_at) = digits
            .iter()
            .take(MAX_BODY_LENGTH_DIGITS + 1)
            .position(|b| *b == SOH)
        else {
            return if digits.len() > MAX_BODY_LENGTH_DIGITS {
                Err(FramingError::BadBodyLength)
            } else {
                Ok(None)
            };
        };
        let digits = &digits[..soh_at];
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return Err(FramingError::BadBodyLength);
        }
        // All-digit ASCII, bounded length: parse cannot fail.
        let body_len: usize = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(FramingError::BadBodyLength)?;

        let header_len = header.len() + 2 + soh_at + 1;
        let total = header_len + body_len + TRAILER_LEN;
        if self.buf.len() < total {
            return Ok(None);
        }

        let trailer = &self.buf[header_len + body_len..total];
        if &trailer[..3] != b"10=" {
            return Err(FramingError::BodyLengthMismatch);
        }
        if trailer[TRAILER_LEN - 1] != SOH {
            return Err(FramingError::UnterminatedTag);
        }
        if let Some(byte) = self.buf[..total].iter().find(|b| !b.is_ascii()) {
            return Err(FramingError::NonAscii { byte: *byte });
        }

        let declared = String::from_utf8_lossy(&trailer[3..6]).into_owned();
        let computed = checksum(&self.buf[..header_len + body_len]);
        let declared_value: Option<u8> = if trailer[3..6].iter().all(u8::is_ascii_digit) {
            declared.parse::<u32>().ok().map(|v| (v % 256) as u8)
        } else {
            None
        };
        if declared_value != Some(computed) {
            return Err(FramingError::ChecksumMismatch { declared, computed });
        }

        let message = parse_fields(&self.buf[..total])?;
        self.buf.drain(..total);
        Ok(Some(message))
    }
}

/// Split a validated frame into its ordered tag sequence.
fn parse_fields(frame: &[u8]) -> Result<FixMessage, FramingError> {
    let mut tags = Vec::new();
    for field in frame.split(|b| *b == SOH) {
        if field.is_empty() {
            continue;
        }
        let text = String::from_utf8_lossy(field);
        let Some(eq) = text.find('=') else {
            return Err(FramingError::BadTag {
                field: text.into_owned(),
            });
        };
        let (tag, value) = text.split_at(eq);
        let tag: u32 = tag.parse().map_err(|_| FramingError::BadTag {
            field: text.clone().into_owned(),
        })?;
        tags.push((tag, value[1..].to_string()));
    }
    Ok(FixMessage::from_tags(tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::tags;
    use proptest::prelude::*;

    fn frame(body: &str) -> Vec<u8> {
        let body = body.replace('|', "\x01");
        let mut out = format!("8=FIX.4.2\x019={}\x01{body}", body.len()).into_bytes();
        let sum = checksum(&out);
        out.extend_from_slice(format!("10={sum:03}\x01").as_bytes());
        out
    }

    #[test]
    fn decode_complete_message() {
        let mut decoder = FixDecoder::new();
        decoder.feed(&frame("35=0|49=TEST|56=BROKER|34=2|"));

        let msg = decoder.next_message().unwrap().unwrap();
        assert_eq!(msg.msg_type(), Some("0"));
        assert_eq!(msg.get(tags::TAG_SENDER_COMP_ID), Some("TEST"));
        assert_eq!(msg.get_u64(tags::TAG_MSG_SEQ_NUM), Some(2));
        // Framing tags retained for audit.
        assert_eq!(msg.get(tags::TAG_BEGIN_STRING), Some("FIX.4.2"));
        assert!(msg.get(tags::TAG_CHECK_SUM).is_some());
    }

    #[test]
    fn decode_accumulates_partial_reads() {
        let bytes = frame("35=A|49=TEST|56=BROKER|34=1|98=0|108=30|");
        let mut decoder = FixDecoder::new();

        for chunk in bytes.chunks(3) {
            assert_eq!(decoder.next_message().map(|m| m.is_some()), Ok(false));
            decoder.feed(chunk);
        }
        let msg = decoder.next_message().unwrap().unwrap();
        assert_eq!(msg.msg_type(), Some("A"));
        assert_eq!(msg.get_u64(tags::TAG_HEART_BT_INT), Some(30));
    }

    #[test]
    fn decode_two_messages_in_one_buffer() {
        let mut bytes = frame("35=0|49=A|56=B|34=1|");
        bytes.extend_from_slice(&frame("35=0|49=A|56=B|34=2|"));

        let mut decoder = FixDecoder::new();
        decoder.feed(&bytes);

        let first = decoder.next_message().unwrap().unwrap();
        let second = decoder.next_message().unwrap().unwrap();
        assert_eq!(first.get_u64(tags::TAG_MSG_SEQ_NUM), Some(1));
        assert_eq!(second.get_u64(tags::TAG_MSG_SEQ_NUM), Some(2));
        assert_eq!(decoder.next_message(), Ok(None));
    }

    #[test]
    fn reject_wrong_begin_string() {
        let mut decoder = FixDecoder::new();
        decoder.feed(b"8=FIX.4.4\x019=5\x0135=0\x0110=000\x01");
        assert_eq!(decoder.next_message(), Err(FramingError::BadBeginString));
    }

    #[test]
    fn reject_garbage_prefix() {
        let mut decoder = FixDecoder::new();
        decoder.feed(b"GET / HTTP/1.1\r\n");
        assert_eq!(decoder.next_message(), Err(FramingError::BadBeginString));
    }

    #[test]
    fn reject_bad_checksum() {
        let mut bytes = frame("35=0|49=A|56=B|34=1|");
        let n = bytes.len();
        bytes[n - 2] = b'9'; // corrupt last checksum digit

        let mut decoder = FixDecoder::new();
        decoder.feed(&bytes);
        assert!(matches!(
            decoder.next_message(),
            Err(FramingError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn reject_body_length_mismatch() {
        // Declares 4 bytes of body but carries more before the trailer.
        let mut out = b"8=FIX.4.2\x019=4\x0135=0\x0149=A\x01".to_vec();
        let sum = checksum(&out);
        out.extend_from_slice(format!("10={sum:03}\x01").as_bytes());

        let mut decoder = FixDecoder::new();
        decoder.feed(&out);
        assert_eq!(decoder.next_message(), Err(FramingError::BodyLengthMismatch));
    }

    #[test]
    fn reject_non_numeric_body_length() {
        let mut decoder = FixDecoder::new();
        decoder.feed(b"8=FIX.4.2\x019=abc\x01");
        assert_eq!(decoder.next_message(), Err(FramingError::BadBodyLength));
    }

    #[test]
    fn reject_non_ascii_bytes() {
        let mut bytes = frame("35=0|49=AB|56=B|34=1|");
        bytes[16] = 0xC3; // inside the body
        let mut decoder = FixDecoder::new();
        decoder.feed(&bytes);
        assert!(matches!(
            decoder.next_message(),
            Err(FramingError::NonAscii { .. })
        ));
    }

    #[test]
    fn empty_decoder_yields_nothing() {
        let mut decoder = FixDecoder::new();
        assert_eq!(decoder.next_message(), Ok(None));
    }

    #[test]
    fn encode_computes_length_and_checksum() {
        let mut msg = FixMessage::new(tags::msg_type::HEARTBEAT);
        msg.push(tags::TAG_SENDER_COMP_ID, "BROKER");
        let bytes = encode(&msg);

        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("8=FIX.4.2\x019=15\x01"));

        let mut decoder = FixDecoder::new();
        decoder.feed(&bytes);
        let parsed = decoder.next_message().unwrap().unwrap();
        assert_eq!(parsed.msg_type(), Some("0"));
        assert_eq!(parsed.get(tags::TAG_SENDER_COMP_ID), Some("BROKER"));
    }

    proptest! {
        // Parse(Serialize(m)) preserves the tag sequence for any printable body.
        #[test]
        fn encode_decode_round_trip(values in proptest::collection::vec("[ -~&&[^=|\x01]]{1,12}", 1..8)) {
            let mut msg = FixMessage::new("8");
            for (i, value) in values.iter().enumerate() {
                msg.push(100 + i as u32, value.clone());
            }

            let mut decoder = FixDecoder::new();
            decoder.feed(&encode(&msg));
            let parsed = decoder.next_message().unwrap().unwrap();

            // Skip the framing tags (8, 9, 10) that parsing retains.
            let body: Vec<_> = parsed
                .tags()
                .iter()
                .filter(|(t, _)| !matches!(*t, 8 | 9 | 10))
                .cloned()
                .collect();
            prop_assert_eq!(body, msg.tags().to_vec());
        }
    }
}

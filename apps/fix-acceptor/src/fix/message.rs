//! Dynamic tag/value view of a FIX message.
//!
//! The wire stays a dynamic bag of `tag=value` pairs for forward
//! compatibility; typed order/report structs are layered on top in the
//! domain. Tag order is preserved for audit, lookup is by tag number.

use rust_decimal::Decimal;

use super::tags::TAG_MSG_TYPE;

/// A parsed or under-construction FIX message.
///
/// Holds the tag sequence in wire order. For outbound messages this is the
/// body only (starting at `35=MsgType`); BeginString, BodyLength and
/// CheckSum are computed by the codec at serialization time. For inbound
/// messages the framing tags are retained as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixMessage {
    tags: Vec<(u32, String)>,
}

impl FixMessage {
    /// Create an outbound message body starting with `35=<msg_type>`.
    #[must_use]
    pub fn new(msg_type: &str) -> Self {
        Self {
            tags: vec![(TAG_MSG_TYPE, msg_type.to_string())],
        }
    }

    /// Reassemble a message from an already-ordered tag sequence.
    #[must_use]
    pub fn from_tags(tags: Vec<(u32, String)>) -> Self {
        Self { tags }
    }

    /// Append a tag.
    pub fn push(&mut self, tag: u32, value: impl Into<String>) {
        self.tags.push((tag, value.into()));
    }

    /// Append a decimal tag, trimmed to at most 6 decimal places with
    /// trailing zeros removed.
    pub fn push_decimal(&mut self, tag: u32, value: Decimal) {
        self.tags.push((tag, format_decimal(value)));
    }

    /// The ordered tag sequence.
    #[must_use]
    pub fn tags(&self) -> &[(u32, String)] {
        &self.tags
    }

    /// First value for `tag`, if present.
    #[must_use]
    pub fn get(&self, tag: u32) -> Option<&str> {
        self.tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
    }

    /// The MsgType (tag 35) value.
    #[must_use]
    pub fn msg_type(&self) -> Option<&str> {
        self.get(TAG_MSG_TYPE)
    }

    /// Parse a tag value as `u64`.
    #[must_use]
    pub fn get_u64(&self, tag: u32) -> Option<u64> {
        self.get(tag).and_then(|v| v.parse().ok())
    }

    /// Parse a tag value as a decimal.
    #[must_use]
    pub fn get_decimal(&self, tag: u32) -> Option<Decimal> {
        self.get(tag).and_then(|v| v.parse().ok())
    }

    /// Render with `|` in place of SOH, for RECV/SEND traces.
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        let mut out = String::new();
        for (tag, value) in &self.tags {
            out.push_str(&format!("{tag}={value}|"));
        }
        out
    }
}

/// Serialize a decimal for the wire: up to 6 decimal places, trailing
/// zeros trimmed.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    let rounded = value.round_dp(6).normalize();
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::tags;
    use rust_decimal_macros::dec;

    #[test]
    fn new_message_starts_with_msg_type() {
        let msg = FixMessage::new(tags::msg_type::EXECUTION_REPORT);
        assert_eq!(msg.msg_type(), Some("8"));
        assert_eq!(msg.tags().len(), 1);
    }

    #[test]
    fn lookup_by_tag_number() {
        let mut msg = FixMessage::new(tags::msg_type::NEW_ORDER_SINGLE);
        msg.push(tags::TAG_CL_ORD_ID, "ORD-1");
        msg.push(tags::TAG_ORDER_QTY, "100");

        assert_eq!(msg.get(tags::TAG_CL_ORD_ID), Some("ORD-1"));
        assert_eq!(msg.get_u64(tags::TAG_ORDER_QTY), Some(100));
        assert_eq!(msg.get(tags::TAG_SYMBOL), None);
    }

    #[test]
    fn first_value_wins_for_duplicate_tags() {
        let msg = FixMessage::from_tags(vec![(58, "first".into()), (58, "second".into())]);
        assert_eq!(msg.get(58), Some("first"));
    }

    #[test]
    fn decimal_values_parse() {
        let mut msg = FixMessage::new(tags::msg_type::NEW_ORDER_SINGLE);
        msg.push(tags::TAG_PRICE, "230.10");
        assert_eq!(msg.get_decimal(tags::TAG_PRICE), Some(dec!(230.10)));
    }

    #[test]
    fn format_decimal_trims_trailing_zeros() {
        assert_eq!(format_decimal(dec!(230.100)), "230.1");
        assert_eq!(format_decimal(dec!(167.25)), "167.25");
        assert_eq!(format_decimal(dec!(0)), "0");
    }

    #[test]
    fn format_decimal_caps_at_six_places() {
        assert_eq!(format_decimal(dec!(33.3333333333)), "33.333333");
    }

    #[test]
    fn wire_string_uses_pipes() {
        let mut msg = FixMessage::new(tags::msg_type::HEARTBEAT);
        msg.push(tags::TAG_SENDER_COMP_ID, "BROKER");
        assert_eq!(msg.to_wire_string(), "35=0|49=BROKER|");
    }
}

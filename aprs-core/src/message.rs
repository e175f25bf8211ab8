//! Decode the message format: 9-byte addressee, separator, then body with
//! optional `{seq-id` suffix, plus the ack/reject/bulletin special cases.

use crate::types::{DecodedPacket, MessageType, PacketDataType};

/// Decode a `:` message information field in place.
///
/// A field shorter than the fixed 9-byte addressee reclassifies the packet
/// as invalid/test data rather than failing the decode.
pub fn decode_message(packet: &mut DecodedPacket) {
    let field = packet.information_field.clone();

    let addressee = match field.get(..9) {
        Some(a) => a,
        None => {
            packet.data_type = PacketDataType::InvalidOrTestData;
            return;
        }
    };
    packet.message.addressee = addressee.to_uppercase().trim().to_string();

    // Byte 9 is the closing ':' separator; body starts at 10
    let mut body = match field.get(10..) {
        Some(b) => b.to_string(),
        None => return,
    };

    if body.len() > 3 && body.is_char_boundary(3) {
        let head = &body[..3];
        if head.eq_ignore_ascii_case("ack") {
            packet.message.msg_type = MessageType::Ack;
            packet.message.seq_id = body[3..].to_string();
            packet.message.msg_text.clear();
            return;
        }
        if head.eq_ignore_ascii_case("rej") {
            packet.message.msg_type = MessageType::Reject;
            packet.message.seq_id = body[3..].to_string();
            packet.message.msg_text.clear();
            return;
        }
    }

    // Trailing {NNNNN is the sequence id
    if let Some(idx) = body.rfind('{') {
        packet.message.seq_id = body[idx + 1..].to_string();
        body.truncate(idx);
    }

    packet.message.msg_type = MessageType::General;

    if !body.is_empty() {
        if starts_with_ci(&body, "NWS-") {
            packet.message.msg_type = MessageType::Nws;
        } else if starts_with_ci(&body, "NWS_") {
            body = body.replace("NWS_", "NWS-");
            packet.message.msg_type = MessageType::Nws;
        } else if starts_with_ci(&body, "BLN") {
            // The addressee decides bulletin vs announcement
            let a = packet.message.addressee.as_bytes();
            if a.len() >= 4 && a.starts_with(b"BLN") {
                if a[3].is_ascii_alphabetic() {
                    packet.message.msg_type = MessageType::Announcement;
                } else if a[3].is_ascii_digit() {
                    packet.message.msg_type = MessageType::Bulletin;
                }
            }
        } else if starts_with_ci(&body, "AA:") || starts_with_ci(&body, "[AA]") {
            packet.message.msg_type = MessageType::AutoAnswer;
        }
    }

    packet.message.msg_text = body;
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Callsign, MessageData, Position};

    fn msg_packet(info: &str) -> DecodedPacket {
        DecodedPacket {
            raw: String::new(),
            source: Callsign::new("W1AW"),
            dest: Callsign::new("APRS"),
            digipeater_path: String::new(),
            data_type_ch: Some(':'),
            data_type: PacketDataType::Message,
            source_path_header: String::new(),
            information_field: info.to_string(),
            comment: String::new(),
            symbol_table: None,
            symbol_code: None,
            from_d7: false,
            from_d700: false,
            timestamp: None,
            position: Position::default(),
            message: MessageData::default(),
        }
    }

    #[test]
    fn test_general_message_with_seq() {
        let mut p = msg_packet("N0CALL   :Hello{001");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::General);
        assert_eq!(p.message.addressee, "N0CALL");
        assert_eq!(p.message.msg_text, "Hello");
        assert_eq!(p.message.seq_id, "001");
    }

    #[test]
    fn test_general_message_without_seq() {
        let mut p = msg_packet("N0CALL   :Hello there");
        decode_message(&mut p);
        assert_eq!(p.message.msg_text, "Hello there");
        assert_eq!(p.message.seq_id, "");
    }

    #[test]
    fn test_ack() {
        let mut p = msg_packet("N0CALL   :ack001");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::Ack);
        assert_eq!(p.message.seq_id, "001");
        assert_eq!(p.message.msg_text, "");
    }

    #[test]
    fn test_reject_case_insensitive() {
        let mut p = msg_packet("N0CALL   :REJ42");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::Reject);
        assert_eq!(p.message.seq_id, "42");
    }

    #[test]
    fn test_bare_ack_is_general() {
        // "ack" with no sequence id is 3 bytes, below the special-case gate
        let mut p = msg_packet("N0CALL   :ack");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::General);
        assert_eq!(p.message.msg_text, "ack");
    }

    #[test]
    fn test_bulletin() {
        let mut p = msg_packet("BLN3     :BLN snow emergency downtown");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::Bulletin);
    }

    #[test]
    fn test_announcement() {
        let mut p = msg_packet("BLNQ     :BLN club meeting 7pm");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::Announcement);
    }

    #[test]
    fn test_nws() {
        let mut p = msg_packet("N0CALL   :NWS-WARN tornado warning");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::Nws);
    }

    #[test]
    fn test_nws_underscore_normalized() {
        let mut p = msg_packet("N0CALL   :NWS_WARN flood watch");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::Nws);
        assert_eq!(p.message.msg_text, "NWS-WARN flood watch");
    }

    #[test]
    fn test_auto_answer() {
        let mut p = msg_packet("N0CALL   :AA:away from keyboard");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::AutoAnswer);

        let mut p = msg_packet("N0CALL   :[AA]back at 5");
        decode_message(&mut p);
        assert_eq!(p.message.msg_type, MessageType::AutoAnswer);
    }

    #[test]
    fn test_short_field_reclassifies() {
        let mut p = msg_packet("N0CALL");
        decode_message(&mut p);
        assert_eq!(p.data_type, PacketDataType::InvalidOrTestData);
    }

    #[test]
    fn test_addressee_only_no_body() {
        let mut p = msg_packet("N0CALL   ");
        decode_message(&mut p);
        assert_eq!(p.message.addressee, "N0CALL");
        assert_eq!(p.message.msg_type, MessageType::Unknown);
        assert_eq!(p.message.msg_text, "");
    }
}

//! Decode one TNC2 line into a `DecodedPacket`.
//!
//! Pipeline: header split, data-type classification, then dispatch to the
//! matching information-field decoder:
//! - `!` `=`       position (without/with messaging)
//! - `/` `@`       timestamp + position
//! - `:`           message
//! - `` ` `` `'` 0x1C 0x1D  Mic-E
//! - everything else recognized: left undecoded (a successful outcome)
//!
//! Structural header errors fail the decode; field-level faults degrade to
//! cleared sentinel values; an unknown data type only raises a diagnostic.

use chrono::{DateTime, Utc};

use crate::geo;
use crate::header;
use crate::message;
use crate::mic_e;
use crate::position;
use crate::timestamp;
use crate::types::{
    AprsError, DecodedPacket, Diagnostic, MessageData, PacketDataType, Position, Result,
};

/// Bytes of timestamp ahead of a timestamped position report.
const TIMESTAMP_LEN: usize = 7;

/// Decode result: the packet plus any non-fatal diagnostics raised while
/// decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub packet: DecodedPacket,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode a raw TNC2 line, stamping "current date" timestamp formats from
/// the wall clock.
pub fn decode_packet(line: &str) -> Result<Decoded> {
    decode_packet_at(line, Utc::now())
}

/// Decode with an explicit "now" for the timestamp formats that borrow the
/// current month/year. This is the whole pipeline; `decode_packet` is the
/// wall-clock wrapper.
pub fn decode_packet_at(line: &str, now: DateTime<Utc>) -> Result<Decoded> {
    let h = header::parse_header(line)?;
    let mut packet = DecodedPacket {
        raw: line.to_string(),
        source: h.source,
        dest: h.dest,
        digipeater_path: h.digipeater_path,
        data_type_ch: h.data_type_ch,
        data_type: h.data_type,
        source_path_header: h.source_path_header,
        information_field: h.information_field,
        comment: String::new(),
        symbol_table: None,
        symbol_code: None,
        from_d7: false,
        from_d700: false,
        timestamp: None,
        position: Position::default(),
        message: MessageData::default(),
    };
    let mut diagnostics = Vec::new();

    if packet.information_field.is_empty() {
        // Bare header is a beacon, whatever the type char claimed
        packet.data_type = PacketDataType::Beacon;
        return Ok(Decoded {
            packet,
            diagnostics,
        });
    }

    match packet.data_type {
        PacketDataType::Unknown => {
            diagnostics.push(Diagnostic {
                raw: line.to_string(),
                message: "unknown packet type".to_string(),
            });
        }
        PacketDataType::Position | PacketDataType::PositionMsg => {
            let field = packet.information_field.clone();
            packet.comment = position::decode_position_and_symbol(&mut packet, &field);
        }
        PacketDataType::PositionTime | PacketDataType::PositionTimeMsg => {
            let field = packet.information_field.clone();
            let ts = field
                .get(..TIMESTAMP_LEN)
                .ok_or(AprsError::TruncatedField {
                    field: "timestamp",
                    expected: TIMESTAMP_LEN,
                    actual: field.len(),
                })?;
            packet.timestamp = timestamp::decode_timestamp(ts, now);
            let rest = field[TIMESTAMP_LEN..].to_string();
            packet.comment = position::decode_position_and_symbol(&mut packet, &rest);
        }
        PacketDataType::Message => message::decode_message(&mut packet),
        t if t.is_mic_e() => mic_e::decode_mic_e(&mut packet)?,
        // Recognized but intentionally undecoded kinds
        _ => {}
    }

    if packet.position.is_valid() && packet.position.gridsquare.is_empty() {
        packet.position.gridsquare = geo::lat_lon_to_grid_square(
            packet.position.coordinates.latitude.value,
            packet.position.coordinates.longitude.value,
        );
    }

    Ok(Decoded {
        packet,
        diagnostics,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

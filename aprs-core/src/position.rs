//! Decode the fixed-width uncompressed and base-91 compressed position
//! formats.
//!
//! Uncompressed (19 bytes, first byte a digit):
//! `DDMM.MMN/S` lat, symbol table, `DDDMM.MME/W` lon, symbol code.
//!
//! Compressed (13 bytes): symbol table, 4 base-91 digits lat, 4 base-91
//! digits lon, symbol code, then course/speed/compression-type bytes that
//! this decoder consumes but does not interpret.

use crate::geo;
use crate::types::DecodedPacket;

/// Base-91 digit zero is ASCII 33 (`!`).
const BASE91_OFFSET: i64 = 33;
/// Latitude scale: 380926 = 91^4 / 2 / 90.
const LAT_SCALE: f64 = 380_926.0;
/// Longitude scale: 190463 = 91^4 / 2 / 180.
const LON_SCALE: f64 = 190_463.0;
/// Bytes in a compressed position report.
const COMPRESSED_LEN: usize = 13;
/// Bytes in an uncompressed position report.
const UNCOMPRESSED_LEN: usize = 19;

/// Decode the position+symbol prefix of `field` into `packet`, returning
/// whatever trails the report as the comment source.
///
/// Field-level faults are non-fatal: the position is reset to the invalid
/// sentinel and decoding of the remainder continues. An internal fault
/// (e.g. a report sliced mid multibyte character) degrades to returning the
/// whole field undecoded.
pub fn decode_position_and_symbol(packet: &mut DecodedPacket, field: &str) -> String {
    match decode_inner(packet, field) {
        Some(comment) => comment,
        None => field.to_string(),
    }
}

fn decode_inner(packet: &mut DecodedPacket, field: &str) -> Option<String> {
    let first = match field.chars().next() {
        Some(ch) => ch,
        None => {
            packet.position.clear();
            return Some(String::new());
        }
    };

    if first.is_ascii_digit() {
        decode_uncompressed(packet, field)
    } else {
        decode_compressed(packet, field)
    }
}

fn decode_uncompressed(packet: &mut DecodedPacket, field: &str) -> Option<String> {
    if field.len() < UNCOMPRESSED_LEN {
        packet.position.clear();
        return Some(String::new());
    }

    let lat = field.get(0..8)?;
    packet.symbol_table = Some(field.as_bytes()[8] as char);
    let lon = field.get(9..18)?;
    packet.symbol_code = Some(field.as_bytes()[18] as char);

    packet.position.coordinates.latitude = geo::coordinate_from_nmea(lat);
    packet.position.coordinates.longitude = geo::coordinate_from_nmea(lon);

    let lat_v = packet.position.coordinates.latitude.value;
    let lon_v = packet.position.coordinates.longitude.value;
    if !(-90.0..=90.0).contains(&lat_v) || !(-180.0..=180.0).contains(&lon_v) {
        packet.position.clear();
    }

    Some(field.get(UNCOMPRESSED_LEN..)?.to_string())
}

fn decode_compressed(packet: &mut DecodedPacket, field: &str) -> Option<String> {
    if field.len() < COMPRESSED_LEN {
        packet.position.clear();
        return Some(String::new());
    }

    let bytes = field.as_bytes();

    // A compressed report never starts with a digit, so digit overlays are
    // written as a..j and mapped back to 0..9 here
    let table = bytes[0] as char;
    packet.symbol_table = Some(match table {
        'a'..='j' => (bytes[0] - b'a' + b'0') as char,
        _ => table,
    });
    packet.symbol_code = Some(bytes[9] as char);

    let lat_sum = base91(&bytes[1..5]);
    let lon_sum = base91(&bytes[5..9]);
    packet.position.coordinates.latitude =
        geo::coordinate_from_lat(90.0 - lat_sum as f64 / LAT_SCALE);
    packet.position.coordinates.longitude =
        geo::coordinate_from_lon(-180.0 + lon_sum as f64 / LON_SCALE);

    // Bytes 10-12 carry course/speed/compression type — consumed, undecoded
    Some(field.get(COMPRESSED_LEN..)?.to_string())
}

fn base91(digits: &[u8]) -> i64 {
    digits
        .iter()
        .fold(0, |acc, &b| acc * 91 + (b as i64 - BASE91_OFFSET))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Callsign, MessageData, PacketDataType, Position};

    fn blank_packet() -> DecodedPacket {
        DecodedPacket {
            raw: String::new(),
            source: Callsign::new("N0CALL"),
            dest: Callsign::new("APRS"),
            digipeater_path: String::new(),
            data_type_ch: Some('!'),
            data_type: PacketDataType::Position,
            source_path_header: String::new(),
            information_field: String::new(),
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

    // -- Uncompressed --

    #[test]
    fn test_uncompressed_known_position() {
        let mut p = blank_packet();
        let comment = decode_position_and_symbol(&mut p, "4903.50N/07201.75W-Test 001234");
        assert!((p.position.coordinates.latitude.value - 49.058333).abs() < 1e-4);
        assert!((p.position.coordinates.longitude.value + 72.029166).abs() < 1e-4);
        assert_eq!(p.symbol_table, Some('/'));
        assert_eq!(p.symbol_code, Some('-'));
        assert_eq!(comment, "Test 001234");
    }

    #[test]
    fn test_uncompressed_southern_western() {
        let mut p = blank_packet();
        decode_position_and_symbol(&mut p, "3351.36S/15112.90E#");
        assert!((p.position.coordinates.latitude.value + 33.856).abs() < 1e-3);
        assert!((p.position.coordinates.longitude.value - 151.215).abs() < 1e-3);
    }

    #[test]
    fn test_uncompressed_too_short_clears() {
        let mut p = blank_packet();
        let comment = decode_position_and_symbol(&mut p, "4903.50N/0720");
        assert!(!p.position.is_valid());
        assert_eq!(comment, "");
    }

    #[test]
    fn test_uncompressed_out_of_range_clears_but_keeps_comment() {
        // 99 degrees of latitude cannot exist; position resets to the
        // invalid sentinel, trailing bytes still come back as comment
        let mut p = blank_packet();
        let comment = decode_position_and_symbol(&mut p, "9903.50N/07201.75W-still here");
        assert!(!p.position.is_valid());
        assert_eq!(comment, "still here");
    }

    #[test]
    fn test_uncompressed_garbled_minutes_become_invalid() {
        // Unparsable NMEA decodes to 0, which is the invalid sentinel
        let mut p = blank_packet();
        decode_position_and_symbol(&mut p, "49AB.50N/07201.75W-");
        assert!(!p.position.coordinates.latitude.value.is_nan());
        assert_eq!(p.position.coordinates.latitude.value, 0.0);
    }

    // -- Compressed --

    #[test]
    fn test_compressed_known_position()  {
        // APRS 1.01 sample: /5L!!<*e7> decodes to 49.5/-72.75
        let mut p = blank_packet();
        let comment = decode_position_and_symbol(&mut p, "/5L!!<*e7>{?! comment");
        assert!((p.position.coordinates.latitude.value - 49.5).abs() < 0.01);
        assert!((p.position.coordinates.longitude.value + 72.75).abs() < 0.01);
        assert_eq!(p.symbol_table, Some('/'));
        assert_eq!(p.symbol_code, Some('>'));
        assert_eq!(comment, " comment");
    }

    #[test]
    fn test_compressed_digit_overlay_remap() {
        let mut p = blank_packet();
        decode_position_and_symbol(&mut p, "c5L!!<*e7>{?!");
        assert_eq!(p.symbol_table, Some('2'));
    }

    #[test]
    fn test_compressed_too_short_clears() {
        let mut p = blank_packet();
        let comment = decode_position_and_symbol(&mut p, "/5L!!<*e");
        assert!(!p.position.is_valid());
        assert_eq!(comment, "");
    }

    #[test]
    fn test_empty_field_clears() {
        let mut p = blank_packet();
        let comment = decode_position_and_symbol(&mut p, "");
        assert!(!p.position.is_valid());
        assert_eq!(comment, "");
    }
}

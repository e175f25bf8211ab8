//! Mic-E decoding — position and velocity packed into the destination
//! callsign plus the first bytes of the information field.
//!
//! Each of the six destination characters hides one latitude digit in its
//! low nibble and one flag bit (message code, N/S, longitude offset, E/W)
//! in its high bits. The information field carries longitude and
//! speed/course as printable bytes offset by 28.
//!
//! Validation failures abort without populating the position, but state
//! already written (latitude, symbols) is left in place — faithfully
//! matching the behavior this format has always been decoded with.

use crate::geo;
use crate::types::{AprsError, DecodedPacket, Result};

/// Destination digits are ASCII offset by 0x30.
const DEST_DIGIT_OFFSET: u8 = 0x30;
/// `L` converts to the space/ambiguous digit.
const SPACE_DIGIT: i32 = 0x0A;
/// Raw value of `L` after the 0x30 shift.
const RAW_L: i32 = 0x1C;
/// Information-field bytes are offset by 28.
const INFO_OFFSET: i32 = 28;
/// Longitude degrees fold points (the encoding overlays 0-179 onto 28-127).
const LON_FOLD_HIGH: i32 = 190;
const LON_FOLD_LOW: i32 = 180;
/// Speed and course fold points.
const SPEED_FOLD: i32 = 800;
const COURSE_FOLD: i32 = 400;

/// Recover a destination-callsign digit.
///
/// `A..K` collapse onto digits with the 0x10 flag bit kept; the space digit
/// clears to 0 (position ambiguity is not tracked any further).
fn convert_dest(ch: u8) -> i32 {
    let mut ci = ch as i32 - DEST_DIGIT_OFFSET as i32;
    if ci == RAW_L {
        ci = SPACE_DIGIT;
    }
    if ci > 0x10 && ci <= 0x1B {
        ci -= 1;
    }
    if ci & 0x0F == SPACE_DIGIT {
        ci &= 0xF0;
    }
    ci
}

/// Character ranges legal in the first three destination bytes when any of
/// them carries the custom-format flag (`A..K`).
fn valid_custom(ch: u8) -> bool {
    !(ch < b'0' || ch > b'L' || (ch > b'9' && ch < b'A'))
}

/// Standard destination character ranges: digits, `L`, or `P..Z`.
fn valid_standard(ch: u8) -> bool {
    !(ch < b'0' || ch > b'Z' || (ch > b'9' && ch < b'L') || (ch > b'L' && ch < b'P'))
}

/// Decode a Mic-E packet in place.
///
/// A destination callsign of 7 or fewer than 6 characters, or any character
/// outside the allowed ranges, rejects the packet without touching the
/// position. An information field too short to hold the longitude is a
/// structural error (the field is mandatory for this data type).
pub fn decode_mic_e(packet: &mut DecodedPacket) -> Result<()> {
    let dest = packet.dest.station.clone();
    let d = dest.as_bytes();
    if d.len() < 6 || d.len() == 7 {
        return Ok(());
    }

    // Validate every character before committing to anything
    let custom = d[..3].iter().any(|ch| (b'A'..=b'K').contains(ch));
    for &ch in &d[..3] {
        let ok = if custom {
            valid_custom(ch)
        } else {
            valid_standard(ch)
        };
        if !ok {
            return Ok(());
        }
    }
    for &ch in &d[3..6] {
        if !valid_standard(ch) {
            return Ok(());
        }
    }
    if d.len() > 6 {
        if d[6] != b'-' || !d[7].is_ascii_digit() {
            return Ok(());
        }
        if d.len() == 9 && !d[8].is_ascii_digit() {
            return Ok(());
        }
    }

    // Latitude digits and flag bits from the destination
    let mut c = convert_dest(d[0]);
    let mut mes = 0u8;
    if c & 0x10 != 0 {
        mes = 0x08; // custom format flag
    }
    if c >= 0x10 {
        mes += 0x04;
    }
    let mut deg = (c & 0x0F) * 10;
    c = convert_dest(d[1]);
    if c >= 0x10 {
        mes += 0x02;
    }
    deg += c & 0x0F;
    c = convert_dest(d[2]);
    if c >= 0x10 {
        mes += 0x01;
    }
    packet.message.msg_index = mes;
    let mut min = (c & 0x0F) * 10;
    c = convert_dest(d[3]);
    let north = c >= 0x20;
    min += c & 0x0F;
    c = convert_dest(d[4]);
    let hundred = c >= 0x20; // +100 degrees longitude
    let mut hundredths = (c & 0x0F) * 10;
    c = convert_dest(d[5]);
    let west = c >= 0x20;
    hundredths += c & 0x0F;

    let mut lat = deg as f64 + min as f64 / 60.0 + hundredths as f64 / 6000.0;
    if !north {
        lat = -lat;
    }
    packet.position.coordinates.latitude = geo::coordinate_from_lat(lat);

    let info = packet.information_field.clone();
    let ib = info.as_bytes();

    // Symbol and radio-model bytes
    if ib.len() > 6 {
        packet.symbol_code = Some(ib[6] as char);
    }
    if ib.len() > 7 {
        packet.symbol_table = Some(ib[7] as char);
    }
    if ib.len() > 8 {
        packet.from_d7 = ib[8] == b'>';
        packet.from_d700 = ib[8] == b']';
    }

    if ib.len() < 3 {
        return Err(AprsError::TruncatedField {
            field: "Mic-E longitude",
            expected: 3,
            actual: ib.len(),
        });
    }

    // Longitude from the first three information bytes
    let mut lon_deg = ib[0] as i32 - INFO_OFFSET;
    let mut lon_min = ib[1] as i32 - INFO_OFFSET;
    let lon_hund = ib[2] as i32 - INFO_OFFSET;
    if !(0..=99).contains(&lon_deg) || !(0..=99).contains(&lon_min) || !(0..=99).contains(&lon_hund)
    {
        // Whole position goes, latitude included
        packet.position.clear();
        return Ok(());
    }

    if hundred {
        lon_deg += 100;
    }
    if lon_deg >= LON_FOLD_HIGH {
        lon_deg -= LON_FOLD_HIGH;
    } else if lon_deg >= LON_FOLD_LOW {
        lon_deg -= 80;
    }
    if lon_min >= 60 {
        lon_min -= 60;
    }
    let mut lon = lon_deg as f64 + lon_min as f64 / 60.0 + lon_hund as f64 / 6000.0;
    if west {
        lon = -lon;
    }
    packet.position.coordinates.longitude = geo::coordinate_from_lon(lon);

    packet.comment = if ib.len() > 8 {
        String::from_utf8_lossy(&ib[8..]).into_owned()
    } else {
        String::new()
    };

    // Speed (knots) and course (degrees), with the tens carry split across
    // bytes 3-5. Course 0 means "no course/speed data".
    if ib.len() > 5 {
        let m = ib[4] as i32 - INFO_OFFSET;
        if !(0..=97).contains(&m) {
            return Ok(());
        }
        let sp = ib[3] as i32 - INFO_OFFSET;
        if !(0..=99).contains(&sp) {
            return Ok(());
        }
        let mut speed = sp * 10 + m / 10;
        let crs = ib[5] as i32 - INFO_OFFSET;
        if !(0..=99).contains(&crs) {
            return Ok(());
        }
        let mut course = (m % 10) * 100 + crs;
        if speed >= SPEED_FOLD {
            speed -= SPEED_FOLD;
        }
        if course >= COURSE_FOLD {
            course -= COURSE_FOLD;
        }
        if course > 0 {
            packet.position.course = course as u16;
            packet.position.speed = speed as u16;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Callsign, MessageData, PacketDataType, Position};

    fn mic_e_packet(dest: &str, info: &str) -> DecodedPacket {
        DecodedPacket {
            raw: String::new(),
            source: Callsign::new("N0NHJ-5"),
            dest: Callsign::new(dest),
            digipeater_path: String::new(),
            data_type_ch: Some('\''),
            data_type: PacketDataType::Tmd700,
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
    fn test_convert_dest_digits() {
        assert_eq!(convert_dest(b'0'), 0);
        assert_eq!(convert_dest(b'9'), 9);
        // L is the space/ambiguous digit, collapsed to 0
        assert_eq!(convert_dest(b'L'), 0);
        // A-K carry the custom flag bit over digits 0-9
        assert_eq!(convert_dest(b'A'), 0x10);
        assert_eq!(convert_dest(b'B'), 0x11);
        assert_eq!(convert_dest(b'K'), 0x10); // K = custom space digit
        // P-Z carry the standard flag bit
        assert_eq!(convert_dest(b'P'), 0x20);
        assert_eq!(convert_dest(b'Y'), 0x29);
        assert_eq!(convert_dest(b'Z'), 0x20); // Z = standard space digit
    }

    #[test]
    fn test_known_position() {
        // Hand-decoded: S8RSUX -> 38 deg 23.58 min N, hundred-degrees flag
        // set; "sDJl" -> 107 deg 40.46 min W
        let mut p = mic_e_packet("S8RSUX", "sDJl");
        decode_mic_e(&mut p).unwrap();
        assert!(p.position.is_valid());
        assert!((p.position.coordinates.latitude.value - 38.39297).abs() < 1e-4);
        assert!((p.position.coordinates.longitude.value + 107.67433).abs() < 1e-4);
        assert_eq!(p.message.msg_index, 5);
        assert_eq!(p.position.course, 0);
        assert_eq!(p.position.speed, 0);
    }

    #[test]
    fn test_rejects_seven_char_dest() {
        let mut p = mic_e_packet("S8RSUXA", "sDJl");
        decode_mic_e(&mut p).unwrap();
        assert!(!p.position.is_valid());
    }

    #[test]
    fn test_rejects_short_dest() {
        let mut p = mic_e_packet("S8RSU", "sDJl");
        decode_mic_e(&mut p).unwrap();
        assert!(!p.position.is_valid());
    }

    #[test]
    fn test_dest_with_ssid_suffix() {
        let mut p = mic_e_packet("S8RSUX-5", "sDJl");
        decode_mic_e(&mut p).unwrap();
        assert!(p.position.is_valid());
    }

    #[test]
    fn test_rejects_invalid_range_char() {
        // 'M' is outside both allowed tables for chars 3-5
        let mut p = mic_e_packet("S8RSMX", "sDJl");
        decode_mic_e(&mut p).unwrap();
        assert!(!p.position.is_valid());
        assert_eq!(p.message.msg_index, 0);
    }

    #[test]
    fn test_bad_longitude_clears_latitude_too() {
        // 0x1A - 28 is negative: longitude validation wipes the whole
        // position, including the already-decoded latitude
        let mut p = mic_e_packet("S8RSUX", "\u{1A}DJl");
        decode_mic_e(&mut p).unwrap();
        assert!(!p.position.is_valid());
        assert_eq!(p.position.coordinates.latitude.value, 0.0);
    }

    #[test]
    fn test_truncated_info_is_error() {
        let mut p = mic_e_packet("S8RSUX", "sD");
        let err = decode_mic_e(&mut p).unwrap_err();
        assert!(matches!(err, AprsError::TruncatedField { .. }));
        // Partial state: latitude was already written before the fault
        assert!(p.position.coordinates.latitude.value != 0.0);
    }

    #[test]
    fn test_speed_and_course() {
        // Bytes 3-5: sp=('l'-28)=80, m=('"'-28)=6, crs=('>'-28)=34
        // speed = 80*10 + 6/10 = 800 -> folds to 0; course = 600+34 = 634
        // -> folds to 234
        let mut p = mic_e_packet("S8RSUX", "sDJl\">");
        decode_mic_e(&mut p).unwrap();
        assert_eq!(p.position.course, 234);
        assert_eq!(p.position.speed, 0);
    }

    #[test]
    fn test_course_zero_leaves_both_unset() {
        // m=0, crs=0 -> course 0 -> no course/speed data
        let mut p = mic_e_packet("S8RSUX", "sDJ\u{1c}\u{1c}\u{1c}");
        decode_mic_e(&mut p).unwrap();
        assert_eq!(p.position.course, 0);
        assert_eq!(p.position.speed, 0);
    }

    #[test]
    fn test_symbol_and_radio_model_flags() {
        let mut p = mic_e_packet("S8RSUX", "sDJl\">/V]comment text");
        decode_mic_e(&mut p).unwrap();
        assert_eq!(p.symbol_code, Some('/'));
        assert_eq!(p.symbol_table, Some('V'));
        assert!(p.from_d700);
        assert!(!p.from_d7);
        assert_eq!(p.comment, "]comment text");
    }

    #[test]
    fn test_custom_format_flag_in_msg_index() {
        // 'A' in the first char flags custom encoding: mes gets 0x08 | 0x04
        let mut p = mic_e_packet("A8BSUX", "sDJl");
        decode_mic_e(&mut p).unwrap();
        assert_eq!(p.message.msg_index & 0x08, 0x08);
    }
}

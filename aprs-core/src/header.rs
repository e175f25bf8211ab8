//! Split a raw TNC2 line into its header components.
//!
//! Wire shape: `SRC>DEST[,DIGI1[,DIGI2...]]:<TYPE-CHAR><INFO>`
//!
//! The first `>` ends the source callsign and the first `:` ends the header;
//! both must exist, `:` after `>`. When the type character is recognized the
//! information field starts one byte past it; otherwise the type char is
//! dropped and the information field starts right after `:`.

use crate::types::{AprsError, Callsign, PacketDataType, Result};

/// Header components of one line, before information-field decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketHeader {
    pub source: Callsign,
    pub dest: Callsign,
    /// Raw comma-joined digipeater path, empty if none.
    pub digipeater_path: String,
    pub data_type_ch: Option<char>,
    pub data_type: PacketDataType,
    /// Everything before `:`, path included.
    pub source_path_header: String,
    pub information_field: String,
}

/// Split one raw line. Fails only on structural header errors.
pub fn parse_header(line: &str) -> Result<PacketHeader> {
    let gt = line
        .find('>')
        .ok_or_else(|| AprsError::MalformedHeader("missing '>'".into()))?;
    let colon = line
        .find(':')
        .ok_or_else(|| AprsError::MalformedHeader("missing ':'".into()))?;
    if colon <= gt {
        return Err(AprsError::MalformedHeader(
            "':' before '>' separator".into(),
        ));
    }

    let source_path_header = line[..colon].to_string();
    let source = Callsign::new(&line[..gt]);

    // Destination runs to the first comma; the rest of the header is the path
    let between = &line[gt + 1..colon];
    let (dest, digipeater_path) = match between.find(',') {
        Some(comma) if comma > 0 => (
            Callsign::new(&between[..comma]),
            between[comma + 1..].to_string(),
        ),
        _ => (Callsign::new(between), String::new()),
    };

    let after_colon = &line[colon + 1..];
    let data_type_ch = after_colon.chars().next();
    let data_type = data_type_ch
        .map(PacketDataType::from_char)
        .unwrap_or(PacketDataType::Unknown);

    // Unrecognized type chars stay part of the information field
    let (data_type_ch, information_field) = match data_type_ch {
        Some(ch) if data_type != PacketDataType::Unknown => {
            (Some(ch), after_colon[ch.len_utf8()..].to_string())
        }
        _ => (None, after_colon.to_string()),
    };

    Ok(PacketHeader {
        source,
        dest,
        digipeater_path,
        data_type_ch,
        data_type,
        source_path_header,
        information_field,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

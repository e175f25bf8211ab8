//! Shared types, error enum, and the decoded-packet data model for aprs-core.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// All errors produced by aprs-core.
#[derive(Debug, Error)]
pub enum AprsError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    #[error("truncated {field} field: expected {expected} bytes, got {actual}")]
    TruncatedField {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unknown data type character: {0:?}")]
    UnknownDataType(char),
}

pub type Result<T> = std::result::Result<T, AprsError>;

/// A non-fatal decode diagnostic. Replaces the observer/event channel of
/// older parsers: the caller gets the raw line back and decides whether to
/// log and continue or halt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub raw: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Packet data types
// ---------------------------------------------------------------------------

/// APRS packet kind, keyed by the data type character after the header `:`.
///
/// Only a subset is meaningfully decoded; the rest are recognized and left
/// undecoded, which is a successful outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PacketDataType {
    Unknown,
    Beacon,
    /// 0x1C — current Mic-E data (rev 0 beta)
    MicECurrent,
    /// 0x1D — old Mic-E data (rev 0 beta)
    MicEOld,
    /// `!` — position without timestamp (no messaging), or Ultimeter 2000
    Position,
    /// `#` — Peet Bros U-II weather station
    PeetBrosUII1,
    /// `$` — raw GPS data or Ultimeter 2000
    RawGpsOrU2k,
    /// `%` — Agrelo DFJr / MicroFinder
    MicroFinder,
    /// `&` — reserved, map feature
    MapFeature,
    /// `'` — old Mic-E data (but current for TM-D700)
    Tmd700,
    /// `)` — item
    Item,
    /// `*` — Peet Bros U-II weather station
    PeetBrosUII2,
    /// `+` — reserved, shelter data with time
    ShelterData,
    /// `,` — invalid data or test data
    InvalidOrTestData,
    /// `.` — reserved, space weather
    SpaceWeather,
    /// `/` — position with timestamp (no messaging)
    PositionTime,
    /// `:` — message
    Message,
    /// `;` — object
    Object,
    /// `<` — station capabilities
    StationCapabilities,
    /// `=` — position without timestamp (with messaging)
    PositionMsg,
    /// `>` — status
    Status,
    /// `?` — query
    Query,
    /// `@` — position with timestamp (with messaging)
    PositionTimeMsg,
    /// `T` — telemetry data
    Telemetry,
    /// `[` — Maidenhead grid locator beacon (obsolete)
    MaidenheadGridLoc,
    /// `_` — weather report without position
    WeatherReport,
    /// `` ` `` — current Mic-E data (not used in TM-D700)
    MicE,
    /// `{` — user-defined packet format
    UserDefined,
    /// `}` — third-party traffic
    ThirdParty,
}

impl PacketDataType {
    /// Classify a data type character. Total — every char maps to a kind,
    /// with unrecognized characters collapsing to `Unknown`.
    pub fn from_char(ch: char) -> PacketDataType {
        match ch {
            ' ' => PacketDataType::Beacon,
            '\u{1C}' => PacketDataType::MicECurrent,
            '\u{1D}' => PacketDataType::MicEOld,
            '!' => PacketDataType::Position,
            '#' => PacketDataType::PeetBrosUII1,
            '$' => PacketDataType::RawGpsOrU2k,
            '%' => PacketDataType::MicroFinder,
            '&' => PacketDataType::MapFeature,
            '\'' => PacketDataType::Tmd700,
            ')' => PacketDataType::Item,
            '*' => PacketDataType::PeetBrosUII2,
            '+' => PacketDataType::ShelterData,
            ',' => PacketDataType::InvalidOrTestData,
            '.' => PacketDataType::SpaceWeather,
            '/' => PacketDataType::PositionTime,
            ':' => PacketDataType::Message,
            ';' => PacketDataType::Object,
            '<' => PacketDataType::StationCapabilities,
            '=' => PacketDataType::PositionMsg,
            '>' => PacketDataType::Status,
            '?' => PacketDataType::Query,
            '@' => PacketDataType::PositionTimeMsg,
            'T' => PacketDataType::Telemetry,
            '[' => PacketDataType::MaidenheadGridLoc,
            '_' => PacketDataType::WeatherReport,
            '`' => PacketDataType::MicE,
            '{' => PacketDataType::UserDefined,
            '}' => PacketDataType::ThirdParty,
            _ => PacketDataType::Unknown,
        }
    }

    /// True for the four Mic-E encodings.
    pub fn is_mic_e(&self) -> bool {
        matches!(
            self,
            PacketDataType::MicE
                | PacketDataType::MicECurrent
                | PacketDataType::MicEOld
                | PacketDataType::Tmd700
        )
    }
}

// ---------------------------------------------------------------------------
// Callsign
// ---------------------------------------------------------------------------

/// A station identifier split into base callsign and SSID.
///
/// `station` keeps the full uppercased form (`BASE-SSID`). If the text after
/// the first `-` is not a valid u8, the whole string is treated as the base
/// and the SSID is 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callsign {
    pub station: String,
    pub base: String,
    pub ssid: u8,
}

impl Callsign {
    pub fn new(callsign: &str) -> Self {
        let station = callsign.trim().to_uppercase();
        let split = station.split_once('-').and_then(|(base, rest)| {
            // A second dash ends the SSID digits ("W1AW-5-1" -> ssid 5)
            let ssid_text = rest.split('-').next().unwrap_or("");
            ssid_text
                .parse::<u8>()
                .ok()
                .map(|ssid| (base.to_string(), ssid))
        });
        match split {
            Some((base, ssid)) => Callsign {
                base,
                station,
                ssid,
            },
            None => Callsign {
                base: station.clone(),
                station,
                ssid: 0,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinates and position
// ---------------------------------------------------------------------------

/// One axis of a position: numeric degrees plus its canonical NMEA form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coordinate {
    pub value: f64,
    pub nmea: String,
}

impl Coordinate {
    pub fn clear(&mut self) {
        self.value = 0.0;
        self.nmea.clear();
    }
}

/// Latitude/longitude pair. `(0, 0)` is the wire-format "invalid" sentinel —
/// indistinguishable from a true report at the equator/prime-meridian
/// crossing, an inherited limitation kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoordinateSet {
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

impl CoordinateSet {
    pub fn clear(&mut self) {
        self.latitude.clear();
        self.longitude.clear();
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.value != 0.0 || self.longitude.value != 0.0
    }
}

/// Decoded position block. Course 0 means "unknown/unset".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Position {
    pub coordinates: CoordinateSet,
    pub ambiguity: u8,
    /// Degrees; 0 = unset.
    pub course: u16,
    /// Knots.
    pub speed: u16,
    /// Feet.
    pub altitude: i32,
    pub gridsquare: String,
}

impl Position {
    pub fn clear(&mut self) {
        self.coordinates.clear();
        self.ambiguity = 0;
        self.course = 0;
        self.speed = 0;
        self.altitude = 0;
        self.gridsquare.clear();
    }

    pub fn is_valid(&self) -> bool {
        self.coordinates.is_valid()
    }
}

// ---------------------------------------------------------------------------
// Message data
// ---------------------------------------------------------------------------

/// Message classification for `:` packets (plus the Mic-E message index).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MessageType {
    #[default]
    Unknown,
    General,
    Bulletin,
    Announcement,
    Nws,
    Ack,
    Reject,
    AutoAnswer,
}

/// Decoded message fields. `msg_index` is the Mic-E message code and is only
/// meaningful for Mic-E packets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub addressee: String,
    pub seq_id: String,
    pub msg_text: String,
    pub msg_type: MessageType,
    pub msg_index: u8,
}

// ---------------------------------------------------------------------------
// Decoded packet
// ---------------------------------------------------------------------------

/// A fully decoded TNC2 packet. Built fresh per decode call and never
/// mutated afterwards, so independent decodes are safe to run concurrently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPacket {
    pub raw: String,
    pub source: Callsign,
    pub dest: Callsign,
    /// Raw comma-joined digipeater path, empty if none.
    pub digipeater_path: String,
    /// None when the type character was not recognized.
    pub data_type_ch: Option<char>,
    pub data_type: PacketDataType,
    pub source_path_header: String,
    pub information_field: String,
    pub comment: String,
    pub symbol_table: Option<char>,
    pub symbol_code: Option<char>,
    /// Radio-model flags recovered from Mic-E comments.
    pub from_d7: bool,
    pub from_d700: bool,
    pub timestamp: Option<DateTime<Utc>>,
    pub position: Position,
    pub message: MessageData,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

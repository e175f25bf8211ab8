//! aprs-core: Pure decode + beaconing library for APRS TNC2 packets.
//!
//! No async, no I/O — just algorithms. One line of TNC2 text in, one
//! immutable `DecodedPacket` out, plus a diagnostics list instead of an
//! event channel. The transport that feeds lines in (APRS-IS socket, TNC
//! serial port) lives with the caller.

pub mod beacon;
pub mod decode;
pub mod geo;
pub mod header;
pub mod message;
pub mod mic_e;
pub mod passcode;
pub mod position;
pub mod timestamp;
pub mod types;

// Re-export commonly used types at crate root
pub use beacon::{Location, SmartBeaconing};
pub use decode::{decode_packet, decode_packet_at, Decoded};
pub use header::{parse_header, PacketHeader};
pub use passcode::{aprs_passcode, server_logon_string};
pub use types::*;

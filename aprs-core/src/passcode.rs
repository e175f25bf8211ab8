//! APRS-IS login passcode — the 15-bit hash servers use to tell licensed
//! operators from read-only clients.

/// Hash seed, fixed by the APRS-IS protocol.
const PASSCODE_SEED: u16 = 0x73E2;

/// Compute the login passcode for a callsign. Only the base callsign (no
/// SSID) participates, uppercased.
pub fn aprs_passcode(callsign: &str) -> u16 {
    let cs = callsign.trim().to_uppercase();
    let base = cs.split('-').next().unwrap_or("");

    // Pad to even length so bytes pair up high/low
    let mut bytes = base.as_bytes().to_vec();
    if bytes.len() % 2 != 0 {
        bytes.push(0);
    }

    let mut hash = PASSCODE_SEED;
    for pair in bytes.chunks(2) {
        hash ^= (pair[0] as u16) << 8;
        hash ^= pair[1] as u16;
    }
    hash & 0x7FFF
}

/// Build the APRS-IS server login line.
pub fn server_logon_string(callsign: &str, product: &str, version: &str) -> String {
    format!(
        "user {} pass {} vers {} {}",
        callsign,
        aprs_passcode(callsign),
        product,
        version
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

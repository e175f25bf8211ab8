//! Coordinate conversions — Maidenhead grid locators and NMEA degree-minute
//! strings.
//!
//! Grid cells: two letters (20° lon x 10° lat fields), two digits (2° x 1°
//! squares), two letters (1/12° x 1/24° subsquares). The inverse returns the
//! cell center.

use crate::types::{Coordinate, CoordinateSet};

/// Build a 6-character Maidenhead locator from degrees lat/lon.
pub fn lat_lon_to_grid_square(lat: f64, lon: f64) -> String {
    let mut lat = lat + 90.0;
    let mut lon = lon + 180.0;
    let mut locator = String::with_capacity(6);

    let v = (lon / 20.0) as u8;
    lon -= v as f64 * 20.0;
    locator.push((b'A' + v) as char);
    let v = (lat / 10.0) as u8;
    lat -= v as f64 * 10.0;
    locator.push((b'A' + v) as char);

    locator.push((b'0' + (lon / 2.0) as u8) as char);
    locator.push((b'0' + lat as u8) as char);

    lon -= (lon / 2.0).trunc() * 2.0;
    lat -= lat.trunc();
    locator.push((b'A' + (lon * 12.0) as u8) as char);
    locator.push((b'A' + (lat * 24.0) as u8) as char);
    locator
}

/// Resolve a 4- or 6-character locator to the coordinates of its cell
/// center. Returns `None` for anything not matching the
/// letter-letter-digit-digit-letter-letter pattern.
pub fn grid_square_to_lat_lon(locator: &str) -> Option<CoordinateSet> {
    let mut loc = locator.trim().to_uppercase();
    if loc.len() == 4 {
        // Subsquare "IL" lands near the center of the square
        loc.push_str("IL");
    }

    let b = loc.as_bytes();
    if b.len() != 6
        || !b[..2].iter().all(|c| (b'A'..=b'R').contains(c))
        || !b[2..4].iter().all(u8::is_ascii_digit)
        || !b[4..].iter().all(|c| (b'A'..=b'X').contains(c))
    {
        return None;
    }

    let lon = (b[0] - b'A') as f64 * 20.0
        + (b[2] - b'0') as f64 * 2.0
        + ((b[4] - b'A') as f64 + 0.5) / 12.0
        - 180.0;
    let lat = (b[1] - b'A') as f64 * 10.0
        + (b[3] - b'0') as f64
        + ((b[5] - b'A') as f64 + 0.5) / 24.0
        - 90.0;

    Some(CoordinateSet {
        latitude: coordinate_from_lat(lat),
        longitude: coordinate_from_lon(lon),
    })
}

/// Format latitude as `DDMM.MM[N|S]`.
pub fn lat_to_nmea(lat: f64) -> String {
    let (degrees, minutes) = degrees_minutes(lat);
    format!("{:02}{:05.2}{}", degrees, minutes, if lat < 0.0 { 'S' } else { 'N' })
}

/// Format longitude as `DDDMM.MM[E|W]`.
pub fn lon_to_nmea(lon: f64) -> String {
    let (degrees, minutes) = degrees_minutes(lon);
    format!("{:03}{:05.2}{}", degrees, minutes, if lon < 0.0 { 'W' } else { 'E' })
}

fn degrees_minutes(d: f64) -> (u32, f64) {
    let l = d.abs();
    let degrees = l.floor();
    ((degrees as u32), (l - degrees) * 60.0)
}

/// Parse an NMEA degree-minute string back to decimal degrees.
///
/// Length 8 selects latitude (`DDMM.MM` + N/S), length 9 longitude
/// (`DDDMM.MM` + E/W). Any other length or parse failure yields 0.
pub fn nmea_to_f64(nmea: &str) -> f64 {
    match nmea.len() {
        8 => parse_nmea_axis(nmea, 2, 'S'),
        9 => parse_nmea_axis(nmea, 3, 'W'),
        _ => 0.0,
    }
}

fn parse_nmea_axis(nmea: &str, deg_digits: usize, negative_suffix: char) -> f64 {
    // .get() keeps multibyte garbage from panicking the slice
    let degrees: f64 = match nmea.get(..deg_digits).and_then(|s| s.parse().ok()) {
        Some(v) => v,
        None => return 0.0,
    };
    let minutes: f64 = match nmea
        .get(deg_digits..deg_digits + 5)
        .and_then(|s| s.parse().ok())
    {
        Some(v) => v,
        None => return 0.0,
    };
    let d = degrees + minutes / 60.0;
    let last = nmea.chars().last().unwrap_or('\0');
    if last.eq_ignore_ascii_case(&negative_suffix) {
        -d
    } else {
        d
    }
}

/// Build a `Coordinate` carrying both forms from an NMEA string.
pub fn coordinate_from_nmea(nmea: &str) -> Coordinate {
    Coordinate {
        value: nmea_to_f64(nmea),
        nmea: nmea.trim().to_string(),
    }
}

/// Build a latitude `Coordinate` from decimal degrees.
pub fn coordinate_from_lat(lat: f64) -> Coordinate {
    Coordinate {
        value: lat,
        nmea: lat_to_nmea(lat),
    }
}

/// Build a longitude `Coordinate` from decimal degrees.
pub fn coordinate_from_lon(lon: f64) -> Coordinate {
    Coordinate {
        value: lon,
        nmea: lon_to_nmea(lon),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

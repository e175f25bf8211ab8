//! SmartBeaconing — adaptive beacon-rate decisions for a GPS tracker.
//!
//! Pure state machine: feed it one stream of (position, time, speed,
//! bearing) samples and it answers "transmit now?". The only state is the
//! last sample that answered yes. One engine per GPS source; callers with
//! multiple sources must serialize access or the rate decision corrupts.

use serde::Serialize;

/// Seconds that must elapse before a turn can trigger a beacon.
const TURN_TIME: f64 = 15.0;
/// Minimum bearing-change threshold in degrees.
const TURN_MIN: f64 = 10.0;
/// Threshold slope: added degrees shrink as speed (mph) grows.
const TURN_SLOPE: f64 = 240.0;
/// m/s to mph.
const MPH_PER_MPS: f64 = 2.236_936_29;

/// One GPS sample. Speed in m/s, bearing in degrees (None when the fix has
/// no heading), timestamp in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub timestamp: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub bearing: Option<f64>,
}

/// Beacon-rate engine with fast/slow speed thresholds and interval bounds.
///
/// Defaults: 60 s at or above 100 km/h, 1200 s at or below 5 km/h, linear
/// in between.
#[derive(Debug, Clone)]
pub struct SmartBeaconing {
    /// m/s at or above which the fast rate applies.
    pub fast_speed: f64,
    /// Seconds between beacons at fast speed.
    pub fast_rate: u32,
    /// m/s at or below which the slow rate applies.
    pub slow_speed: f64,
    /// Seconds between beacons at slow speed.
    pub slow_rate: u32,

    prev: Option<Location>,
}

impl Default for SmartBeaconing {
    fn default() -> Self {
        SmartBeaconing {
            fast_speed: 100.0 / 3.6, // km/h -> m/s
            fast_rate: 60,
            slow_speed: 5.0 / 3.6,
            slow_rate: 1200,
            prev: None,
        }
    }
}

impl SmartBeaconing {
    pub fn new(fast_speed: f64, fast_rate: u32, slow_speed: f64, slow_rate: u32) -> Self {
        SmartBeaconing {
            fast_speed,
            fast_rate,
            slow_speed,
            slow_rate,
            prev: None,
        }
    }

    /// Decide whether to beacon for this sample. A yes makes the sample the
    /// new reference point; a no leaves state untouched.
    pub fn check(&mut self, location: Location) -> bool {
        let beacon = match &self.prev {
            None => true,
            Some(prev) => {
                if self.corner_peg(&location, prev) {
                    true
                } else {
                    let elapsed = location.timestamp - prev.timestamp;
                    elapsed >= self.beacon_rate(location.speed) as f64
                }
            }
        };

        if beacon {
            self.prev = Some(location);
        }
        beacon
    }

    /// Beacon interval in seconds for a given speed, interpolated between
    /// the fast and slow bounds.
    fn beacon_rate(&self, speed: f64) -> u32 {
        if speed <= self.slow_speed {
            self.slow_rate
        } else if speed >= self.fast_speed {
            self.fast_rate
        } else {
            let rate = self.fast_rate as f64
                + (self.slow_rate as f64 - self.fast_rate as f64) * (self.fast_speed - speed)
                    / (self.fast_speed - self.slow_speed);
            rate.round() as u32
        }
    }

    /// True when a sharp turn warrants an extra beacon ahead of the rate
    /// schedule.
    fn corner_peg(&self, location: &Location, prev: &Location) -> bool {
        let speed = location.speed;
        let elapsed = location.timestamp - prev.timestamp;

        // Standing still or hardly moving: no corner pegging
        if speed.abs() < 0.01 {
            return false;
        }

        // Last bearing unknown: fall back to the turn-time floor alone
        let prev_bearing = match prev.bearing {
            Some(b) => b,
            None => return elapsed >= TURN_TIME,
        };
        let bearing = match location.bearing {
            Some(b) => b,
            None => return false,
        };

        // Threshold tightens as speed grows
        let threshold = (TURN_MIN + TURN_SLOPE / (speed * MPH_PER_MPS)).floor();
        elapsed >= TURN_TIME && bearing_angle(bearing, prev_bearing) > threshold
    }
}

/// Smallest angle between two bearings, 0-180 degrees.
fn bearing_angle(alpha: f64, beta: f64) -> f64 {
    let delta = (alpha - beta).abs() % 360.0;
    if delta <= 180.0 {
        delta
    } else {
        360.0 - delta
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

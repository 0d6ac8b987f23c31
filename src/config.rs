use defmt::Format;

/// Identifier broadcast in every status message.
pub const VEHICLE_ID: &str = "1";

/// Minimum time between two status broadcasts.
pub const SEND_INTERVAL_MS: u32 = 1000;

/// Reported in place of the GPS position while there is no valid fix (New Delhi).
pub const FALLBACK_COORDINATE: Coordinate = Coordinate {
    latitude: 28.7041,
    longitude: 77.1025,
};

#[derive(Debug, Clone, Copy, PartialEq, Format)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Configuration parameters for the tracker loop
#[derive(Debug, Clone, Format)]
pub struct TrackerConfig {
    pub vehicle_id: &'static str,
    pub send_interval_ms: u32,
    pub fallback: Coordinate,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            vehicle_id: VEHICLE_ID,
            send_interval_ms: SEND_INTERVAL_MS,
            fallback: FALLBACK_COORDINATE,
        }
    }
}

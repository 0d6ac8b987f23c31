use chrono::NaiveTime;
use defmt::Format;
use nmea::sentences::rmc::RmcStatusOfFix;
use nmea::ParseResult;

use super::error::GnssError;
use crate::config::Coordinate;

const KMPH_PER_KNOT: f64 = 1.852;

/// Latest position, speed and validity decoded from the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Format)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    /// Speed over ground in km/h
    pub speed: f64,
    pub valid: bool,
    /// UTC time of the last positional sentence
    #[defmt(Debug2Format)]
    pub time: Option<NaiveTime>,
}

impl Fix {
    /// The coordinate to report: the decoded one when valid, `fallback` otherwise.
    pub fn coordinate_or(&self, fallback: Coordinate) -> Coordinate {
        if self.valid {
            Coordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            }
        } else {
            fallback
        }
    }

    /// Folds one decoded sentence into the fix.
    ///
    /// Speed only changes on an RMC with a fix; a void RMC keeps the last one.
    pub fn apply(&mut self, data: &ParseResult) -> Result<(), GnssError> {
        match data {
            ParseResult::RMC(rmc) => {
                if rmc.fix_time.is_some() {
                    self.time = rmc.fix_time;
                }

                if rmc.status_of_fix == RmcStatusOfFix::Invalid {
                    self.valid = false;
                    return Err(GnssError::NoFix);
                }

                if let Some(knots) = rmc.speed_over_ground {
                    self.speed = f64::from(knots) * KMPH_PER_KNOT;
                }

                self.set_position(rmc.lat, rmc.lon)
            }
            ParseResult::GGA(gga) => {
                if gga.fix_time.is_some() {
                    self.time = gga.fix_time;
                }

                if !gga.fix_type.is_some_and(|fix_type| fix_type.is_valid()) {
                    self.valid = false;
                    return Err(GnssError::NoFix);
                }

                self.set_position(gga.latitude, gga.longitude)
            }
            _ => Err(GnssError::UnsupportedSentence),
        }
    }

    fn set_position(
        &mut self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<(), GnssError> {
        let latitude = latitude.ok_or(GnssError::MissingField("latitude"));
        let longitude = longitude.ok_or(GnssError::MissingField("longitude"));

        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) => {
                self.latitude = latitude;
                self.longitude = longitude;
                self.valid = true;
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                self.valid = false;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FALLBACK_COORDINATE;

    #[test]
    fn test_default_fix_is_invalid() {
        let fix = Fix::default();

        assert!(!fix.valid);
        assert_eq!(fix.coordinate_or(FALLBACK_COORDINATE), FALLBACK_COORDINATE);
    }

    #[test]
    fn test_valid_fix_reports_own_coordinate() {
        let fix = Fix {
            latitude: 12.5,
            longitude: -3.25,
            speed: 0.0,
            valid: true,
            time: None,
        };

        assert_eq!(
            fix.coordinate_or(FALLBACK_COORDINATE),
            Coordinate {
                latitude: 12.5,
                longitude: -3.25
            }
        );
    }

    #[test]
    fn test_invalid_fix_ignores_stale_coordinate() {
        let fix = Fix {
            latitude: 12.5,
            longitude: -3.25,
            speed: 7.0,
            valid: false,
            time: None,
        };

        assert_eq!(fix.coordinate_or(FALLBACK_COORDINATE), FALLBACK_COORDINATE);
    }

    #[test]
    fn test_apply_rmc() {
        let data = nmea::parse_str(
            "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W,A*07",
        )
        .unwrap();
        let mut fix = Fix::default();

        assert!(fix.apply(&data).is_ok());
        assert!(fix.valid);
        assert!((fix.latitude - 48.1173).abs() < 1e-6);
        assert!((fix.longitude - 11.516_666).abs() < 1e-5);
        assert!((fix.speed - 22.4 * KMPH_PER_KNOT).abs() < 1e-4);
        assert_eq!(fix.time, NaiveTime::from_hms_opt(12, 35, 19));
    }

    #[test]
    fn test_apply_void_rmc_keeps_speed() {
        let data = nmea::parse_str("$GPRMC,123520,V,,,,,010.0,,230394,,,N*74").unwrap();
        let mut fix = Fix {
            latitude: 1.0,
            longitude: 2.0,
            speed: 41.48,
            valid: true,
            time: None,
        };

        assert!(matches!(fix.apply(&data), Err(GnssError::NoFix)));
        assert!(!fix.valid);
        assert_eq!(fix.speed, 41.48);
        assert_eq!(fix.time, NaiveTime::from_hms_opt(12, 35, 20));
    }
}

//! Geotemporal boundary: place name to coordinates, local wall clock to
//! UTC instant.
//!
//! Geocoding and zone lookup are outbound capabilities; production
//! implementations call real services, tests use fixed tables. The
//! [`BuiltinGazetteer`] is a small offline table for demos and fallbacks.

use chrono::offset::LocalResult;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::chart::{ChartInputs, ResolvedInstant};
use crate::error::{ChartError, ChartResult};

/// Geocoder output for one place string.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_name: String,
}

/// Place string to coordinates.
pub trait Geocoder: Send + Sync {
    fn resolve_place(&self, text: &str) -> ChartResult<GeocodedPlace>;
}

/// Coordinates (plus a rough instant, for zones with historical changes)
/// to an IANA time zone identifier.
pub trait TimeZoneLookup: Send + Sync {
    fn resolve_time_zone(
        &self,
        latitude: f64,
        longitude: f64,
        instant_estimate: chrono::DateTime<Utc>,
    ) -> ChartResult<String>;
}

/// Resolves [`ChartInputs`] into the one UTC instant and location all
/// downstream astronomical computation runs on.
pub struct GeotemporalResolver {
    geocoder: Box<dyn Geocoder>,
    timezones: Box<dyn TimeZoneLookup>,
}

impl GeotemporalResolver {
    pub fn new(geocoder: Box<dyn Geocoder>, timezones: Box<dyn TimeZoneLookup>) -> Self {
        GeotemporalResolver { geocoder, timezones }
    }

    /// Geocode, look up the zone, then interpret the local wall clock in
    /// that zone. Called before any ephemeris work.
    pub fn resolve(&self, inputs: &ChartInputs) -> ChartResult<ResolvedInstant> {
        let place = self.geocoder.resolve_place(&inputs.location)?;
        let naive = local_naive(inputs)?;

        // The zone is not known yet, so estimate the instant as if the
        // wall clock were UTC. Zones close enough to shift the estimate
        // across a tzdb boundary are vanishingly rare.
        let estimate = Utc.from_utc_datetime(&naive);
        let zone_id =
            self.timezones
                .resolve_time_zone(place.latitude, place.longitude, estimate)?;
        let zone: Tz = zone_id
            .parse()
            .map_err(|_| ChartError::UnresolvableTimeZone {
                latitude: place.latitude,
                longitude: place.longitude,
                detail: format!("unknown zone identifier '{}'", zone_id),
            })?;

        let utc = match zone.from_local_datetime(&naive) {
            LocalResult::Single(instant) => instant.with_timezone(&Utc),
            // A repeated clock hour resolves to its first occurrence.
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                return Err(ChartError::InvalidLocalTime {
                    detail: format!("{} does not exist in zone {}", naive, zone_id),
                })
            }
        };

        Ok(ResolvedInstant {
            latitude: place.latitude,
            longitude: place.longitude,
            formatted_name: place.formatted_name,
            iana_time_zone: zone_id,
            utc,
        })
    }

    /// Degraded resolution for reconstructed legacy inputs: the place is
    /// still geocoded for coordinates and a display name, but the wall
    /// clock is taken as already UTC because the original zone is gone.
    pub fn resolve_as_utc(&self, inputs: &ChartInputs) -> ChartResult<ResolvedInstant> {
        let place = self.geocoder.resolve_place(&inputs.location)?;
        let naive = local_naive(inputs)?;
        Ok(ResolvedInstant {
            latitude: place.latitude,
            longitude: place.longitude,
            formatted_name: place.formatted_name,
            iana_time_zone: "Etc/UTC".to_string(),
            utc: Utc.from_utc_datetime(&naive),
        })
    }
}

/// Parses "HH:MM" or "HH:MM:SS".
fn parse_wall_clock(time: &str) -> ChartResult<(u32, u32, u32)> {
    let invalid = || ChartError::InvalidLocalTime {
        detail: format!("'{}' is not a valid HH:MM[:SS] time", time),
    };
    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(invalid());
    }
    let hour: u32 = parts[0].parse().map_err(|_| invalid())?;
    let minute: u32 = parts[1].parse().map_err(|_| invalid())?;
    let second: u32 = if parts.len() == 3 {
        parts[2].parse().map_err(|_| invalid())?
    } else {
        0
    };
    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid());
    }
    Ok((hour, minute, second))
}

fn local_naive(inputs: &ChartInputs) -> ChartResult<NaiveDateTime> {
    let (hour, minute, second) = parse_wall_clock(&inputs.time)?;
    let date = NaiveDate::from_ymd_opt(inputs.year, inputs.month, inputs.day).ok_or_else(|| {
        ChartError::InvalidLocalTime {
            detail: format!(
                "{:04}-{:02}-{:02} is not a calendar date",
                inputs.year, inputs.month, inputs.day
            ),
        }
    })?;
    date.and_hms_opt(hour, minute, second)
        .ok_or_else(|| ChartError::InvalidLocalTime {
            detail: format!("'{}' is out of range", inputs.time),
        })
}

// ---------------------------
// ## Builtin gazetteer
// ---------------------------

struct City {
    key: &'static str,
    latitude: f64,
    longitude: f64,
    formatted_name: &'static str,
    zone: &'static str,
}

const CITIES: &[City] = &[
    City { key: "greenwich", latitude: 51.48, longitude: 0.0, formatted_name: "Greenwich, United Kingdom", zone: "Europe/London" },
    City { key: "london", latitude: 51.5074, longitude: -0.1278, formatted_name: "London, United Kingdom", zone: "Europe/London" },
    City { key: "new york", latitude: 40.7128, longitude: -74.0060, formatted_name: "New York, NY, USA", zone: "America/New_York" },
    City { key: "delhi", latitude: 28.6139, longitude: 77.2090, formatted_name: "Delhi, India", zone: "Asia/Kolkata" },
    City { key: "mumbai", latitude: 19.0760, longitude: 72.8777, formatted_name: "Mumbai, India", zone: "Asia/Kolkata" },
    City { key: "chennai", latitude: 13.0827, longitude: 80.2707, formatted_name: "Chennai, India", zone: "Asia/Kolkata" },
    City { key: "kochi", latitude: 9.9312, longitude: 76.2673, formatted_name: "Kochi, India", zone: "Asia/Kolkata" },
    City { key: "dubai", latitude: 25.276987, longitude: 55.296234, formatted_name: "Dubai, United Arab Emirates", zone: "Asia/Dubai" },
    City { key: "sydney", latitude: -33.8688, longitude: 151.2093, formatted_name: "Sydney, Australia", zone: "Australia/Sydney" },
];

/// Offline resolver over a short list of well-known cities. Good enough
/// for demos and tests; real deployments plug in networked services.
pub struct BuiltinGazetteer;

impl Geocoder for BuiltinGazetteer {
    fn resolve_place(&self, text: &str) -> ChartResult<GeocodedPlace> {
        let needle = text.trim().to_lowercase();
        CITIES
            .iter()
            .find(|city| needle.contains(city.key))
            .map(|city| GeocodedPlace {
                latitude: city.latitude,
                longitude: city.longitude,
                formatted_name: city.formatted_name.to_string(),
            })
            .ok_or_else(|| ChartError::UnresolvableLocation {
                place: text.to_string(),
            })
    }
}

impl TimeZoneLookup for BuiltinGazetteer {
    fn resolve_time_zone(
        &self,
        latitude: f64,
        longitude: f64,
        _instant_estimate: chrono::DateTime<Utc>,
    ) -> ChartResult<String> {
        // Nearest tabulated city wins; the table is never empty.
        CITIES
            .iter()
            .min_by(|a, b| {
                let da = (a.latitude - latitude).powi(2) + (a.longitude - longitude).powi(2);
                let db = (b.latitude - latitude).powi(2) + (b.longitude - longitude).powi(2);
                da.total_cmp(&db)
            })
            .map(|city| city.zone.to_string())
            .ok_or_else(|| ChartError::UnresolvableTimeZone {
                latitude,
                longitude,
                detail: "empty gazetteer".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn resolver() -> GeotemporalResolver {
        GeotemporalResolver::new(Box::new(BuiltinGazetteer), Box::new(BuiltinGazetteer))
    }

    fn inputs(year: i32, month: u32, day: u32, time: &str, location: &str) -> ChartInputs {
        ChartInputs {
            year,
            month,
            day,
            time: time.to_string(),
            location: location.to_string(),
        }
    }

    #[test]
    fn wall_clock_accepts_both_forms() {
        assert_eq!(parse_wall_clock("07:10").unwrap(), (7, 10, 0));
        assert_eq!(parse_wall_clock("23:59:58").unwrap(), (23, 59, 58));
        assert!(parse_wall_clock("24:00").is_err());
        assert!(parse_wall_clock("12").is_err());
        assert!(parse_wall_clock("ab:cd").is_err());
    }

    #[test]
    fn greenwich_noon_in_winter_is_utc_noon() {
        let resolved = resolver()
            .resolve(&inputs(2000, 1, 1, "12:00", "Greenwich, UK"))
            .unwrap();
        assert_eq!(resolved.iana_time_zone, "Europe/London");
        assert_eq!(
            resolved.utc,
            Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(resolved.formatted_name, "Greenwich, United Kingdom");
    }

    #[test]
    fn kolkata_offset_applies() {
        let resolved = resolver()
            .resolve(&inputs(1991, 6, 18, "07:10", "Kochi, Kerala, India"))
            .unwrap();
        // IST is UTC+5:30.
        assert_eq!(
            resolved.utc,
            Utc.with_ymd_and_hms(1991, 6, 18, 1, 40, 0).unwrap()
        );
    }

    #[test]
    fn dst_gap_is_invalid_local_time() {
        // US spring-forward skipped 02:00-03:00 on 2023-03-12.
        let err = resolver()
            .resolve(&inputs(2023, 3, 12, "02:30", "New York"))
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidLocalTime { .. }));
    }

    #[test]
    fn repeated_fall_back_hour_resolves_to_its_first_occurrence() {
        // US clocks fell back on 2023-11-05, so 01:30 happened twice; the
        // earlier (EDT, UTC-4) occurrence wins.
        let resolved = resolver()
            .resolve(&inputs(2023, 11, 5, "01:30", "New York"))
            .unwrap();
        assert_eq!(
            resolved.utc,
            Utc.with_ymd_and_hms(2023, 11, 5, 5, 30, 0).unwrap()
        );
    }

    #[test]
    fn impossible_date_is_invalid_local_time() {
        let err = resolver()
            .resolve(&inputs(1999, 2, 30, "10:00", "London"))
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidLocalTime { .. }));
    }

    #[test]
    fn unknown_place_is_unresolvable() {
        let err = resolver()
            .resolve(&inputs(2000, 1, 1, "12:00", "Middle of Nowhere"))
            .unwrap_err();
        assert!(matches!(err, ChartError::UnresolvableLocation { .. }));
    }

    #[test]
    fn utc_reinterpretation_skips_zone_lookup() {
        let resolved = resolver()
            .resolve_as_utc(&inputs(1991, 6, 18, "01:40:00", "Kochi, India"))
            .unwrap();
        assert_eq!(resolved.iana_time_zone, "Etc/UTC");
        assert_eq!(
            resolved.utc,
            Utc.with_ymd_and_hms(1991, 6, 18, 1, 40, 0).unwrap()
        );
        assert_eq!(resolved.utc.year(), 1991);
    }
}

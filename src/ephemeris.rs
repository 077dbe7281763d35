//! Ephemeris capability and the adapter that turns raw library output into
//! per-body positions and house cusps.
//!
//! The astronomical library itself is consumed through the [`Ephemeris`]
//! trait: the production implementation binds to Swiss Ephemeris (feature
//! `swisseph`), tests use deterministic fakes.

use log::warn;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ChartError, ChartResult};

// ---------------------------
// ## Tracked bodies
// ---------------------------

/// The fixed set of bodies every chart tracks. Discriminants are Swiss
/// Ephemeris body numbers (the ascending node is the true node, 11;
/// Chiron is 15).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum CelestialBody {
    Sun = 0,
    Moon = 1,
    Mercury = 2,
    Venus = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
    NorthNode = 11,
    Chiron = 15,
}

impl CelestialBody {
    pub fn iter() -> impl Iterator<Item = CelestialBody> {
        [
            CelestialBody::Sun,
            CelestialBody::Moon,
            CelestialBody::Mercury,
            CelestialBody::Venus,
            CelestialBody::Mars,
            CelestialBody::Jupiter,
            CelestialBody::Saturn,
            CelestialBody::Uranus,
            CelestialBody::Neptune,
            CelestialBody::Pluto,
            CelestialBody::NorthNode,
            CelestialBody::Chiron,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
            CelestialBody::NorthNode => "NorthNode",
            CelestialBody::Chiron => "Chiron",
        };
        write!(f, "{}", name)
    }
}

// ---------------------------
// ## House systems
// ---------------------------

/// House division method, identified by its single-character code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HouseSystem {
    Placidus,
    Koch,
    Porphyry,
    Regiomontanus,
    Campanus,
    Equal,
    WholeSign,
}

impl HouseSystem {
    pub fn code(&self) -> char {
        match self {
            HouseSystem::Placidus => 'P',
            HouseSystem::Koch => 'K',
            HouseSystem::Porphyry => 'O',
            HouseSystem::Regiomontanus => 'R',
            HouseSystem::Campanus => 'C',
            HouseSystem::Equal => 'A',
            HouseSystem::WholeSign => 'W',
        }
    }

    pub fn from_code(code: char) -> Option<HouseSystem> {
        match code {
            'P' => Some(HouseSystem::Placidus),
            'K' => Some(HouseSystem::Koch),
            'O' => Some(HouseSystem::Porphyry),
            'R' => Some(HouseSystem::Regiomontanus),
            'C' => Some(HouseSystem::Campanus),
            'A' => Some(HouseSystem::Equal),
            'W' => Some(HouseSystem::WholeSign),
            _ => None,
        }
    }
}

// Stored charts carry the bare code character, not the method name.
impl Serialize for HouseSystem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.code())
    }
}

impl<'de> Deserialize<'de> for HouseSystem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = char::deserialize(deserializer)?;
        HouseSystem::from_code(code)
            .ok_or_else(|| D::Error::custom(format!("unknown house system code '{}'", code)))
    }
}

// ---------------------------
// ## Library capability
// ---------------------------

/// Raw ecliptic coordinates for one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub speed: f64,
}

/// Raw house output for one instant and location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHouses {
    pub ascendant: f64,
    pub midheaven: f64,
    pub cusps: [f64; 12],
}

/// Library-level failure for a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationError {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "calculation error {}: {}", self.code, self.message)
    }
}

/// The astronomical library, as a capability. One session is opened per
/// chart computation and released when it goes out of scope, so unrelated
/// requests never share library state.
pub trait Ephemeris {
    /// Continuous day-number time coordinate (astronomical Julian Day,
    /// UT-based, Gregorian calendar) for the given UTC calendar fields.
    fn day_number(&self, year: i32, month: u32, day: u32, fractional_hour: f64) -> f64;

    fn body_position(
        &self,
        day_number: f64,
        body: CelestialBody,
    ) -> Result<RawPosition, CalculationError>;

    fn houses(
        &self,
        day_number: f64,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<RawHouses, CalculationError>;
}

/// Opens one [`Ephemeris`] session per computation. The underlying library
/// is not guaranteed re-entrant, so each computation gets its own handle.
pub trait EphemerisProvider: Send + Sync {
    fn open(&self) -> ChartResult<Box<dyn Ephemeris>>;
}

/// Astronomical Julian Day (UT, Gregorian calendar) from UTC calendar
/// fields. Implementations that do not delegate this conversion to the
/// underlying library can use it directly.
pub fn julian_day(year: i32, month: u32, day: u32, fractional_hour: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor()
        + day as f64
        + b
        - 1524.5
        + fractional_hour / 24.0
}

// ---------------------------
// ## Adapter
// ---------------------------

/// Raw per-body positions plus optional house output for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChart {
    pub positions: BTreeMap<CelestialBody, RawPosition>,
    pub houses: Option<RawHouses>,
}

/// Computes positions for every tracked body, and house cusps when a
/// system is given.
///
/// A single body failing is logged and the body omitted; the rest of the
/// chart is unaffected. A house failure is fatal to the whole call, since
/// cusps were explicitly requested.
pub fn compute_raw_chart(
    ephemeris: &dyn Ephemeris,
    utc: chrono::DateTime<chrono::Utc>,
    latitude: f64,
    longitude: f64,
    house_system: Option<HouseSystem>,
) -> ChartResult<RawChart> {
    use chrono::{Datelike, Timelike};

    let fractional_hour = utc.hour() as f64
        + utc.minute() as f64 / 60.0
        + utc.second() as f64 / 3600.0
        + utc.nanosecond() as f64 / 3_600_000_000_000.0;
    let day_number = ephemeris.day_number(utc.year(), utc.month(), utc.day(), fractional_hour);

    let mut positions = BTreeMap::new();
    for body in CelestialBody::iter() {
        match ephemeris.body_position(day_number, body) {
            Ok(raw) => {
                positions.insert(body, raw);
            }
            Err(err) => {
                warn!("skipping {}: {}", body, err);
            }
        }
    }

    let houses = match house_system {
        Some(system) => Some(
            ephemeris
                .houses(day_number, latitude, longitude, system)
                .map_err(|err| ChartError::HouseCalculationFailed {
                    detail: err.to_string(),
                })?,
        ),
        None => None,
    };

    Ok(RawChart { positions, houses })
}

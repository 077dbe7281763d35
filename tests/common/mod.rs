//! Deterministic fakes for the engine's external capabilities.
//!
//! Real ephemeris and geocoding calls are non-deterministic or networked,
//! so the whole suite runs against fixed tables instead.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use stellium::{
    julian_day, BuiltinGazetteer, CalculationError, CelestialBody, ChartAssembler, ChartError,
    ChartResult, Ephemeris, EphemerisProvider, GeotemporalResolver, HouseSystem, RawHouses,
    RawPosition,
};

/// Fixed ecliptic longitudes, one per tracked body. Chosen so the
/// well-known pairs land on exact aspects: Sun-Moon opposition, Sun-Mars
/// square, Jupiter-Saturn sextile, Venus 32° from the Sun (semisextile
/// only under the extended catalog).
pub const FIXED_LONGITUDES: &[(CelestialBody, f64)] = &[
    (CelestialBody::Sun, 280.5),
    (CelestialBody::Moon, 100.5),
    (CelestialBody::Mercury, 262.0),
    (CelestialBody::Venus, 312.5),
    (CelestialBody::Mars, 10.5),
    (CelestialBody::Jupiter, 160.7),
    (CelestialBody::Saturn, 220.7),
    (CelestialBody::Uranus, 316.9),
    (CelestialBody::Neptune, 303.7),
    (CelestialBody::Pluto, 251.4),
    (CelestialBody::NorthNode, 124.9),
    (CelestialBody::Chiron, 141.0),
];

pub const FAKE_ASCENDANT: f64 = 97.25;

#[derive(Clone, Default)]
pub struct FakeEphemeris {
    pub fail_bodies: Vec<CelestialBody>,
    pub fail_houses: bool,
}

impl Ephemeris for FakeEphemeris {
    fn day_number(&self, year: i32, month: u32, day: u32, fractional_hour: f64) -> f64 {
        julian_day(year, month, day, fractional_hour)
    }

    fn body_position(
        &self,
        _day_number: f64,
        body: CelestialBody,
    ) -> Result<RawPosition, CalculationError> {
        if self.fail_bodies.contains(&body) {
            return Err(CalculationError {
                code: -1,
                message: format!("no data for {}", body),
            });
        }
        let longitude = FIXED_LONGITUDES
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, lon)| *lon)
            .ok_or(CalculationError {
                code: -2,
                message: format!("untracked body {}", body),
            })?;
        let speed = match body {
            CelestialBody::Moon => 13.176,
            CelestialBody::NorthNode => -0.053,
            _ => 1.0,
        };
        Ok(RawPosition {
            longitude,
            latitude: 0.0,
            speed,
        })
    }

    fn houses(
        &self,
        _day_number: f64,
        _latitude: f64,
        _longitude: f64,
        _system: HouseSystem,
    ) -> Result<RawHouses, CalculationError> {
        if self.fail_houses {
            return Err(CalculationError {
                code: -1,
                message: "polar circle".to_string(),
            });
        }
        let mut cusps = [0.0; 12];
        for (i, cusp) in cusps.iter_mut().enumerate() {
            *cusp = (FAKE_ASCENDANT + 30.0 * i as f64).rem_euclid(360.0);
        }
        Ok(RawHouses {
            ascendant: FAKE_ASCENDANT,
            midheaven: (FAKE_ASCENDANT + 270.0).rem_euclid(360.0),
            cusps,
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeEphemerisProvider {
    pub fail_bodies: Vec<CelestialBody>,
    pub fail_houses: bool,
    pub fail_open: bool,
}

impl EphemerisProvider for FakeEphemerisProvider {
    fn open(&self) -> ChartResult<Box<dyn Ephemeris>> {
        if self.fail_open {
            return Err(ChartError::EphemerisUnavailable {
                detail: "ephemeris files missing".to_string(),
            });
        }
        Ok(Box::new(FakeEphemeris {
            fail_bodies: self.fail_bodies.clone(),
            fail_houses: self.fail_houses,
        }))
    }
}

/// Assembler wired to the builtin gazetteer and the given fake provider.
pub fn assembler_with(provider: FakeEphemerisProvider) -> ChartAssembler {
    let resolver =
        GeotemporalResolver::new(Box::new(BuiltinGazetteer), Box::new(BuiltinGazetteer));
    ChartAssembler::new(resolver, Box::new(provider))
}

pub fn assembler() -> ChartAssembler {
    assembler_with(FakeEphemerisProvider::default())
}

//! Zodiac sign and house placement from ecliptic longitudes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The twelve signs in canonical order, starting at 0° ecliptic longitude.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Each sign owns a 30° arc; longitude is normalized to [0, 360) first.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized_longitude = longitude.rem_euclid(360.0);
        let sign_index = (normalized_longitude / 30.0).floor() as usize;
        match sign_index {
            0 => ZodiacSign::Aries,
            1 => ZodiacSign::Taurus,
            2 => ZodiacSign::Gemini,
            3 => ZodiacSign::Cancer,
            4 => ZodiacSign::Leo,
            5 => ZodiacSign::Virgo,
            6 => ZodiacSign::Libra,
            7 => ZodiacSign::Scorpio,
            8 => ZodiacSign::Sagittarius,
            9 => ZodiacSign::Capricorn,
            10 => ZodiacSign::Aquarius,
            11 => ZodiacSign::Pisces,
            _ => ZodiacSign::Aries, // Fallback
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign_str = match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        };
        write!(f, "{}", sign_str)
    }
}

/// Degrees into the sign, always in [0, 30).
pub fn sign_degree(longitude: f64) -> f64 {
    longitude.rem_euclid(360.0) % 30.0
}

/// Places a longitude into one of the 12 houses described by `cusps`.
///
/// House i (1-indexed) owns the half-open arc from `cusps[i-1]` up to but
/// not including `cusps[i % 12]`, going in the direction of increasing
/// longitude with wraparound at 360°. Returns `None` when fewer than 12
/// cusps are available (the body stays unplaced).
pub fn house_of(longitude: f64, cusps: &[f64]) -> Option<u8> {
    if cusps.len() < 12 {
        return None;
    }
    let lon = longitude.rem_euclid(360.0);
    for i in 0..12 {
        let lower = cusps[i].rem_euclid(360.0);
        let upper = cusps[(i + 1) % 12].rem_euclid(360.0);
        let inside = if lower > upper {
            // Arc crosses 0° Aries
            lon >= lower || lon < upper
        } else {
            lon >= lower && lon < upper
        };
        if inside {
            return Some((i + 1) as u8);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sign_is_invariant_under_full_turns() {
        for k in -3i32..=3 {
            let lon = 280.5 + 360.0 * k as f64;
            assert_eq!(ZodiacSign::from_longitude(lon), ZodiacSign::Capricorn);
            assert_relative_eq!(sign_degree(lon), 10.5, max_relative = 1e-9);
        }
    }

    #[test]
    fn zero_longitude_is_first_sign_at_zero_degrees() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_relative_eq!(sign_degree(0.0), 0.0);
    }

    #[test]
    fn sign_boundaries() {
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(359.999), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(-0.001), ZodiacSign::Pisces);
    }

    fn equal_cusps_from(start: f64) -> [f64; 12] {
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = (start + 30.0 * i as f64).rem_euclid(360.0);
        }
        cusps
    }

    #[test]
    fn each_cusp_belongs_to_its_own_house() {
        let cusps = equal_cusps_from(283.5);
        for (i, cusp) in cusps.iter().enumerate() {
            assert_eq!(house_of(*cusp, &cusps), Some((i + 1) as u8));
        }
    }

    #[test]
    fn every_longitude_lands_in_exactly_one_house() {
        let cusps = equal_cusps_from(97.25);
        for tenth in 0..3600 {
            let lon = tenth as f64 / 10.0;
            let house = house_of(lon, &cusps);
            assert!(house.is_some(), "no house for {}", lon);
        }
    }

    #[test]
    fn wraparound_arc_owns_both_ends() {
        // House 1 spans 350°..20°.
        let cusps = equal_cusps_from(350.0);
        assert_eq!(house_of(355.0, &cusps), Some(1));
        assert_eq!(house_of(10.0, &cusps), Some(1));
        assert_eq!(house_of(20.0, &cusps), Some(2));
    }

    #[test]
    fn short_cusp_slice_is_unplaced() {
        assert_eq!(house_of(120.0, &[0.0, 30.0, 60.0]), None);
        assert_eq!(house_of(120.0, &[]), None);
    }
}

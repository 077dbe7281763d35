//! Canonical chart document model.
//!
//! Serialized field names match the persisted JSON schema, so documents
//! written by older builds parse back without translation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aspects::AspectKind;
use crate::ephemeris::{CelestialBody, HouseSystem};
use crate::zodiac::ZodiacSign;

/// The caller's original birth/event inputs, kept verbatim on every
/// document. These are the sole reproducibility key: a chart can always be
/// recomputed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInputs {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Local wall-clock time, "HH:MM" or "HH:MM:SS".
    pub time: String,
    /// Free-text place name, geocoded at computation time.
    pub location: String,
}

/// What the geotemporal boundary derived from [`ChartInputs`]. Embedded in
/// [`ChartMeta`], never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInstant {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_name: String,
    pub iana_time_zone: String,
    pub utc: DateTime<Utc>,
}

/// One tracked body's place in the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPosition {
    /// Ecliptic longitude, normalized to [0, 360).
    pub longitude: f64,
    pub latitude: f64,
    /// Daily motion in longitude; negative while retrograde.
    pub speed: f64,
    pub sign: ZodiacSign,
    /// Degrees into the sign, [0, 30).
    pub sign_degree: f64,
    /// Absent when houses were not computed or the body fell outside a
    /// malformed cusp set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<u8>,
}

/// House cusps for one chart. Absent entirely on aspect-only charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseSet {
    pub system: HouseSystem,
    pub ascendant: f64,
    pub midheaven: f64,
    /// Index 0 is the cusp of house 1.
    pub cusps: [f64; 12],
}

/// A detected angular relationship between two distinct bodies. Each
/// unordered pair appears at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspect {
    pub body_a: CelestialBody,
    pub body_b: CelestialBody,
    pub kind: AspectKind,
    /// Absolute deviation from the kind's exact angle, in degrees.
    pub orb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// The UTC instant all positions were computed for.
    pub date: DateTime<Utc>,
    /// Formatted place name from the geocoder.
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Original inputs. Legacy documents predate this field; the
    /// reconciliation job reconstructs it best-effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<ChartInputs>,
}

/// The canonical chart document. Recomputation replaces the whole
/// positions/houses/aspects payload; it is never patched partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDocument {
    pub meta: ChartMeta,
    pub positions: BTreeMap<CelestialBody, BodyPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub houses: Option<HouseSet>,
    pub aspects: Vec<Aspect>,
}

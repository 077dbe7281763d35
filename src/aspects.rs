//! Aspect detection over a set of body longitudes.

use serde::{Deserialize, Serialize};

use crate::chart::Aspect;
use crate::ephemeris::CelestialBody;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    Quincunx,
    Quintile,
    Semisextile,
    Semisquare,
}

/// (kind, exact angle, maximum orb). Catalog order is a committed
/// contract: the first entry within orb wins and no later entry is
/// tested for that pair.
type CatalogEntry = (AspectKind, f64, f64);

const MAJOR: &[CatalogEntry] = &[
    (AspectKind::Conjunction, 0.0, 8.0),
    (AspectKind::Opposition, 180.0, 8.0),
    (AspectKind::Trine, 120.0, 8.0),
    (AspectKind::Square, 90.0, 8.0),
    (AspectKind::Sextile, 60.0, 6.0),
    (AspectKind::Quincunx, 150.0, 3.0),
];

const EXTENDED: &[CatalogEntry] = &[
    (AspectKind::Conjunction, 0.0, 8.0),
    (AspectKind::Opposition, 180.0, 8.0),
    (AspectKind::Trine, 120.0, 8.0),
    (AspectKind::Square, 90.0, 8.0),
    (AspectKind::Sextile, 60.0, 6.0),
    (AspectKind::Quincunx, 150.0, 3.0),
    (AspectKind::Quintile, 72.0, 2.0),
    (AspectKind::Semisextile, 30.0, 2.0),
    (AspectKind::Semisquare, 45.0, 2.0),
];

/// An ordered aspect catalog. Which one a call site uses depends on how
/// fine-grained its commentary needs to be; natal charts usually stick to
/// the major kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectCatalog {
    entries: &'static [CatalogEntry],
}

impl AspectCatalog {
    /// The six classical kinds.
    pub fn major() -> Self {
        AspectCatalog { entries: MAJOR }
    }

    /// Major kinds plus quintile, semisextile and semisquare.
    pub fn extended() -> Self {
        AspectCatalog { entries: EXTENDED }
    }

    /// First catalog entry whose exact angle is within orb of the
    /// separation, with the deviation as the matched orb.
    fn classify(&self, separation: f64) -> Option<(AspectKind, f64)> {
        for (kind, angle, max_orb) in self.entries {
            let orb = (separation - angle).abs();
            if orb <= *max_orb {
                return Some((*kind, orb));
            }
        }
        None
    }
}

/// Absolute angular separation between two longitudes, folded to [0, 180].
///
/// The absolute difference is taken before reducing so the result is
/// bitwise identical whichever way the pair is ordered.
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let sep = (a - b).abs().rem_euclid(360.0);
    if sep > 180.0 {
        360.0 - sep
    } else {
        sep
    }
}

/// Detects aspects over every unordered pair of the given bodies.
///
/// Output order follows the pair enumeration of the input slice, so a
/// caller passing bodies in tracked order gets a deterministic list. Pairs
/// with no matching kind produce nothing; no pair appears twice.
pub fn detect(catalog: &AspectCatalog, positions: &[(CelestialBody, f64)]) -> Vec<Aspect> {
    let mut aspects = Vec::new();
    for (i, (body_a, lon_a)) in positions.iter().enumerate() {
        for (body_b, lon_b) in &positions[i + 1..] {
            let separation = angular_separation(*lon_a, *lon_b);
            if let Some((kind, orb)) = catalog.classify(separation) {
                aspects.push(Aspect {
                    body_a: *body_a,
                    body_b: *body_b,
                    kind,
                    orb,
                });
            }
        }
    }
    aspects
}

//! Chart assembly: resolver, ephemeris adapter, classifier and aspect
//! detector orchestrated into one canonical document.

use std::collections::BTreeMap;

use crate::aspects::{self, AspectCatalog};
use crate::chart::{
    BodyPosition, ChartDocument, ChartInputs, ChartMeta, HouseSet, ResolvedInstant,
};
use crate::ephemeris::{compute_raw_chart, CelestialBody, EphemerisProvider, HouseSystem};
use crate::error::ChartResult;
use crate::geotemporal::GeotemporalResolver;
use crate::zodiac::{house_of, sign_degree, ZodiacSign};

/// Per-call computation knobs.
#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub include_houses: bool,
    pub house_system: HouseSystem,
    pub catalog: AspectCatalog,
}

impl ChartOptions {
    /// A full birth chart: Placidus houses, the classical aspect kinds.
    pub fn natal() -> Self {
        ChartOptions {
            include_houses: true,
            house_system: HouseSystem::Placidus,
            catalog: AspectCatalog::major(),
        }
    }

    /// Auxiliary transit/progressed snapshots used only for aspect
    /// commentary: no houses (placement is meaningless without a location
    /// context for that moment), extended catalog for finer commentary.
    pub fn aspects_only() -> Self {
        ChartOptions {
            include_houses: false,
            house_system: HouseSystem::Placidus,
            catalog: AspectCatalog::extended(),
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions::natal()
    }
}

/// The engine's single entry point for turning inputs into a document.
pub struct ChartAssembler {
    resolver: GeotemporalResolver,
    ephemeris: Box<dyn EphemerisProvider>,
}

impl ChartAssembler {
    pub fn new(resolver: GeotemporalResolver, ephemeris: Box<dyn EphemerisProvider>) -> Self {
        ChartAssembler { resolver, ephemeris }
    }

    /// Computes a chart for the given inputs. `meta.inputs` on the result
    /// is the caller's struct verbatim, so the document can always be
    /// recomputed later.
    pub fn compute_chart(
        &self,
        inputs: &ChartInputs,
        options: &ChartOptions,
    ) -> ChartResult<ChartDocument> {
        let resolved = self.resolver.resolve(inputs)?;
        self.assemble(inputs, resolved, options)
    }

    /// Best-effort twin of [`compute_chart`](Self::compute_chart) for
    /// inputs reconstructed from legacy records: the wall clock is
    /// interpreted as UTC because the original zone is unrecoverable.
    pub fn compute_reconstructed(
        &self,
        inputs: &ChartInputs,
        options: &ChartOptions,
    ) -> ChartResult<ChartDocument> {
        let resolved = self.resolver.resolve_as_utc(inputs)?;
        self.assemble(inputs, resolved, options)
    }

    fn assemble(
        &self,
        inputs: &ChartInputs,
        resolved: ResolvedInstant,
        options: &ChartOptions,
    ) -> ChartResult<ChartDocument> {
        // One library session per computation; released as soon as the raw
        // numbers are in hand.
        let raw = {
            let session = self.ephemeris.open()?;
            compute_raw_chart(
                session.as_ref(),
                resolved.utc,
                resolved.latitude,
                resolved.longitude,
                options.include_houses.then_some(options.house_system),
            )?
        };

        let cusps = raw.houses.as_ref().map(|h| h.cusps);
        let mut positions: BTreeMap<CelestialBody, BodyPosition> = BTreeMap::new();
        for (body, coords) in &raw.positions {
            let longitude = coords.longitude.rem_euclid(360.0);
            positions.insert(
                *body,
                BodyPosition {
                    longitude,
                    latitude: coords.latitude,
                    speed: coords.speed,
                    sign: ZodiacSign::from_longitude(longitude),
                    sign_degree: sign_degree(longitude),
                    house: cusps.as_ref().and_then(|c| house_of(longitude, c)),
                },
            );
        }

        let ordered: Vec<(CelestialBody, f64)> = positions
            .iter()
            .map(|(body, position)| (*body, position.longitude))
            .collect();
        let detected = aspects::detect(&options.catalog, &ordered);

        let houses = raw.houses.map(|h| HouseSet {
            system: options.house_system,
            ascendant: h.ascendant,
            midheaven: h.midheaven,
            cusps: h.cusps,
        });

        Ok(ChartDocument {
            meta: ChartMeta {
                date: resolved.utc,
                location: resolved.formatted_name,
                latitude: resolved.latitude,
                longitude: resolved.longitude,
                inputs: Some(inputs.clone()),
            },
            positions,
            houses,
            aspects: detected,
        })
    }
}

//! stellium: astrological chart computation and reconciliation engine.
//!
//! Turns a birth/event instant and place into a canonical chart document
//! (planetary positions, house cusps, inter-body aspects) and keeps
//! previously persisted documents consistent as the computation logic
//! evolves.
//!
//! The host application talks to two things:
//! [`ChartAssembler::compute_chart`] for new charts, and
//! [`reconcile_all_charts`] (or [`spawn_reconciliation`]) once at startup
//! to recompute stored ones. Geocoding, time zone lookup, the
//! astronomical library and persistence are all capabilities the host
//! plugs in through the traits in [`geotemporal`], [`ephemeris`] and
//! [`store`].

pub mod aspects;
pub mod assembler;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod geotemporal;
pub mod reconcile;
pub mod store;
#[cfg(feature = "swisseph")]
pub mod swisseph;
pub mod zodiac;

pub use aspects::{angular_separation, AspectCatalog, AspectKind};
pub use assembler::{ChartAssembler, ChartOptions};
pub use chart::{
    Aspect, BodyPosition, ChartDocument, ChartInputs, ChartMeta, HouseSet, ResolvedInstant,
};
pub use ephemeris::{
    julian_day, CalculationError, CelestialBody, Ephemeris, EphemerisProvider, HouseSystem,
    RawHouses, RawPosition,
};
pub use error::{ChartError, ChartResult, StoreError};
pub use geotemporal::{BuiltinGazetteer, GeocodedPlace, Geocoder, GeotemporalResolver, TimeZoneLookup};
pub use reconcile::{
    reconcile_all_charts, recover_inputs, spawn_reconciliation, ReconcileSummary, RecoverError,
    RecoveredInputs,
};
pub use store::{ChartStore, JsonDirStore, MemoryStore, StoredChart};
#[cfg(feature = "swisseph")]
pub use swisseph::{SwissEphemeris, SwissEphemerisProvider};
pub use zodiac::{house_of, sign_degree, ZodiacSign};

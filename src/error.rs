//! Error types for chart computation and persistence.

use thiserror::Error;

/// Result type alias for chart computations.
pub type ChartResult<T> = Result<T, ChartError>;

/// Fatal errors for a single chart computation. Each one aborts the
/// computation it occurred in and is surfaced to the caller; per-body
/// ephemeris failures are not listed here because they only drop the
/// affected body from the result.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The place string could not be geocoded.
    #[error("could not resolve location '{place}'")]
    UnresolvableLocation { place: String },

    /// No usable time zone for the resolved coordinates.
    #[error("could not resolve a time zone for {latitude}, {longitude}: {detail}")]
    UnresolvableTimeZone {
        latitude: f64,
        longitude: f64,
        detail: String,
    },

    /// The date/time inputs do not name a valid instant in the resolved
    /// zone (impossible calendar date, bad wall-clock string, DST gap).
    #[error("invalid local time: {detail}")]
    InvalidLocalTime { detail: String },

    /// House cusps were requested but could not be computed. Unlike a
    /// single body, houses are all-or-nothing once asked for.
    #[error("house calculation failed: {detail}")]
    HouseCalculationFailed { detail: String },

    /// The astronomical library handle could not be acquired.
    #[error("ephemeris unavailable: {detail}")]
    EphemerisUnavailable { detail: String },
}

/// Errors from the chart persistence boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

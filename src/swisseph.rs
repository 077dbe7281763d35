//! Swiss Ephemeris binding: the production [`Ephemeris`] implementation.
//!
//! Requires the `swisseph` feature and a system `libswe`. Set
//! `STELLIUM_EPHE_PATH` to a directory of ephemeris data files; without
//! one the library falls back to its built-in Moshier model.

use std::env;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_double, c_int};
use std::sync::Once;

use crate::ephemeris::{
    CalculationError, CelestialBody, Ephemeris, EphemerisProvider, RawHouses, RawPosition,
};
use crate::error::ChartResult;

mod bindings {
    use super::*;

    #[link(name = "swe")]
    extern "C" {
        pub fn swe_set_ephe_path(path: *const c_char);
        pub fn swe_close();

        pub fn swe_julday(
            year: c_int,
            month: c_int,
            day: c_int,
            hour: c_double,
            gregflag: c_int,
        ) -> c_double;

        pub fn swe_calc_ut(
            tjd_ut: c_double,
            ipl: c_int,
            iflag: c_int,
            xx: *mut c_double,
            serr: *mut c_char,
        ) -> c_int;

        pub fn swe_houses_ex(
            tjd_ut: c_double,
            iflag: c_int,
            geolat: c_double,
            geolon: c_double,
            hsys: c_int,
            cusps: *mut c_double,
            ascmc: *mut c_double,
        ) -> c_int;
    }
}

use bindings::*;

pub const SE_GREG_CAL: c_int = 1;
pub const SEFLG_SWIEPH: c_int = 1 << 0;
pub const SEFLG_SPEED: c_int = 256;

static INIT: Once = Once::new();

/// One open library handle. Closed on drop so unrelated computations
/// never share state.
pub struct SwissEphemeris;

impl SwissEphemeris {
    pub fn open() -> ChartResult<Self> {
        INIT.call_once(|| {
            if let Ok(path) = env::var("STELLIUM_EPHE_PATH") {
                match CString::new(path) {
                    Ok(c_path) => unsafe { swe_set_ephe_path(c_path.as_ptr()) },
                    Err(_) => log::warn!("ignoring STELLIUM_EPHE_PATH with interior NUL"),
                }
            }
        });
        Ok(SwissEphemeris)
    }
}

impl Ephemeris for SwissEphemeris {
    fn day_number(&self, year: i32, month: u32, day: u32, fractional_hour: f64) -> f64 {
        unsafe {
            swe_julday(
                year,
                month as c_int,
                day as c_int,
                fractional_hour,
                SE_GREG_CAL,
            )
        }
    }

    fn body_position(
        &self,
        day_number: f64,
        body: CelestialBody,
    ) -> Result<RawPosition, CalculationError> {
        let mut results: [c_double; 6] = [0.0; 6];
        let mut error: [c_char; 256] = [0; 256];
        let calc_result = unsafe {
            swe_calc_ut(
                day_number,
                body as c_int,
                SEFLG_SWIEPH | SEFLG_SPEED,
                results.as_mut_ptr(),
                error.as_mut_ptr(),
            )
        };
        if calc_result < 0 {
            let message = unsafe { CStr::from_ptr(error.as_ptr()) }
                .to_string_lossy()
                .into_owned();
            return Err(CalculationError {
                code: calc_result,
                message,
            });
        }
        Ok(RawPosition {
            longitude: results[0],
            latitude: results[1],
            speed: results[3],
        })
    }

    fn houses(
        &self,
        day_number: f64,
        latitude: f64,
        longitude: f64,
        system: crate::ephemeris::HouseSystem,
    ) -> Result<RawHouses, CalculationError> {
        let mut cusps: [c_double; 13] = [0.0; 13];
        let mut ascmc: [c_double; 10] = [0.0; 10];
        let calc_result = unsafe {
            swe_houses_ex(
                day_number,
                0,
                latitude,
                longitude,
                system.code() as c_int,
                cusps.as_mut_ptr(),
                ascmc.as_mut_ptr(),
            )
        };
        if calc_result < 0 {
            return Err(CalculationError {
                code: calc_result,
                message: format!("house calculation failed for system {}", system.code()),
            });
        }
        let mut twelve = [0.0; 12];
        twelve.copy_from_slice(&cusps[1..=12]);
        Ok(RawHouses {
            ascendant: ascmc[0],
            midheaven: ascmc[1],
            cusps: twelve,
        })
    }
}

impl Drop for SwissEphemeris {
    fn drop(&mut self) {
        unsafe { swe_close() }
    }
}

/// Opens a fresh [`SwissEphemeris`] per computation.
pub struct SwissEphemerisProvider;

impl EphemerisProvider for SwissEphemerisProvider {
    fn open(&self) -> ChartResult<Box<dyn Ephemeris>> {
        Ok(Box::new(SwissEphemeris::open()?))
    }
}

//! Startup reconciliation: recompute every persisted chart from its
//! original inputs so historical records stay consistent with current
//! computation logic.
//!
//! The job is best-effort by design: a record that cannot be recovered or
//! recomputed is logged and skipped, never aborting the batch. It runs
//! strictly sequentially to bound outbound geocoding load.

use chrono::{DateTime, Datelike, Timelike, Utc};
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::thread;
use thiserror::Error;

use crate::assembler::{ChartAssembler, ChartOptions};
use crate::chart::ChartInputs;
use crate::store::ChartStore;

/// Inputs recovered from a stored record. `Reconstructed` marks the
/// degraded legacy path: only the UTC instant survived, so the rebuilt
/// wall clock describes that instant as if it were already UTC.
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveredInputs {
    Original(ChartInputs),
    Reconstructed(ChartInputs),
}

/// Why a record was skipped.
#[derive(Error, Debug)]
pub enum RecoverError {
    #[error("malformed chart record: {0}")]
    MalformedRecord(String),

    #[error("inputs neither present nor reconstructible")]
    MissingReconstructibleInputs,
}

/// Recovers computation inputs from a stored record.
///
/// Modern records carry `meta.inputs` and are used directly. Legacy
/// records are reconstructed from the stored UTC timestamp and place name;
/// anything less is unrecoverable.
pub fn recover_inputs(raw: &Value) -> Result<RecoveredInputs, RecoverError> {
    let meta = raw
        .get("meta")
        .and_then(Value::as_object)
        .ok_or_else(|| RecoverError::MalformedRecord("missing meta object".to_string()))?;

    // An explicit `"inputs": null` counts as absent, same as the serde
    // model for ChartMeta.
    if let Some(inputs) = meta.get("inputs").filter(|value| !value.is_null()) {
        let inputs: ChartInputs = serde_json::from_value(inputs.clone())
            .map_err(|err| RecoverError::MalformedRecord(format!("bad inputs: {}", err)))?;
        return Ok(RecoveredInputs::Original(inputs));
    }

    let date = meta
        .get("date")
        .and_then(Value::as_str)
        .ok_or(RecoverError::MissingReconstructibleInputs)?;
    let location = meta
        .get("location")
        .and_then(Value::as_str)
        .ok_or(RecoverError::MissingReconstructibleInputs)?;
    let utc: DateTime<Utc> = date
        .parse()
        .map_err(|err| RecoverError::MalformedRecord(format!("bad date '{}': {}", date, err)))?;

    Ok(RecoveredInputs::Reconstructed(ChartInputs {
        year: utc.year(),
        month: utc.month(),
        day: utc.day(),
        time: format!("{:02}:{:02}:{:02}", utc.hour(), utc.minute(), utc.second()),
        location: location.to_string(),
    }))
}

/// What one reconciliation pass did. Observability is log-level only; the
/// startup caller discards this.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Recomputed from original inputs.
    pub recomputed: usize,
    /// Recomputed through the degraded legacy path.
    pub reconstructed: usize,
    /// No recoverable inputs; left untouched.
    pub skipped: usize,
    /// Recovery succeeded but recomputation or the save failed.
    pub failed: usize,
}

/// Recomputes every stored chart, one at a time. Never propagates an
/// error; each record fails or succeeds on its own.
pub fn reconcile_all_charts(
    store: &dyn ChartStore,
    assembler: &ChartAssembler,
    options: &ChartOptions,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    let records = match store.list_all() {
        Ok(records) => records,
        Err(err) => {
            warn!("reconciliation aborted, cannot list charts: {}", err);
            return summary;
        }
    };
    info!("reconciling {} stored charts", records.len());

    for record in records {
        let (document, reconstructed) = match recover_inputs(&record.raw) {
            Ok(RecoveredInputs::Original(inputs)) => {
                (assembler.compute_chart(&inputs, options), false)
            }
            Ok(RecoveredInputs::Reconstructed(inputs)) => {
                (assembler.compute_reconstructed(&inputs, options), true)
            }
            Err(err) => {
                warn!("skipping chart {}: {}", record.id, err);
                summary.skipped += 1;
                continue;
            }
        };

        let document = match document {
            Ok(document) => document,
            Err(err) => {
                warn!("failed to recompute chart {}: {}", record.id, err);
                summary.failed += 1;
                continue;
            }
        };
        if let Err(err) = store.save(&record.id, &document) {
            warn!("failed to save chart {}: {}", record.id, err);
            summary.failed += 1;
            continue;
        }
        if reconstructed {
            summary.reconstructed += 1;
        } else {
            summary.recomputed += 1;
        }
    }

    info!(
        "reconciliation done: {} recomputed, {} reconstructed, {} skipped, {} failed",
        summary.recomputed, summary.reconstructed, summary.skipped, summary.failed
    );
    summary
}

/// Fire-and-forget variant for process startup: runs the pass on a
/// background thread without blocking other work.
pub fn spawn_reconciliation(
    store: Arc<dyn ChartStore>,
    assembler: Arc<ChartAssembler>,
    options: ChartOptions,
) -> thread::JoinHandle<ReconcileSummary> {
    thread::spawn(move || reconcile_all_charts(store.as_ref(), &assembler, &options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn modern_record_yields_original_inputs() {
        let raw = json!({
            "meta": {
                "date": "2000-01-01T12:00:00Z",
                "location": "Greenwich, United Kingdom",
                "latitude": 51.48,
                "longitude": 0.0,
                "inputs": {
                    "year": 2000, "month": 1, "day": 1,
                    "time": "12:00", "location": "Greenwich, UK"
                }
            }
        });
        match recover_inputs(&raw).unwrap() {
            RecoveredInputs::Original(inputs) => {
                assert_eq!(inputs.location, "Greenwich, UK");
                assert_eq!(inputs.time, "12:00");
            }
            other => panic!("expected original inputs, got {:?}", other),
        }
    }

    #[test]
    fn legacy_record_reconstructs_from_date_and_location() {
        let raw = json!({
            "meta": {
                "date": "1995-03-14T08:30:15Z",
                "location": "Delhi, India",
                "latitude": 28.6139,
                "longitude": 77.209
            }
        });
        match recover_inputs(&raw).unwrap() {
            RecoveredInputs::Reconstructed(inputs) => {
                assert_eq!(inputs.year, 1995);
                assert_eq!(inputs.month, 3);
                assert_eq!(inputs.day, 14);
                assert_eq!(inputs.time, "08:30:15");
                assert_eq!(inputs.location, "Delhi, India");
            }
            other => panic!("expected reconstructed inputs, got {:?}", other),
        }
    }

    #[test]
    fn explicit_null_inputs_falls_back_to_reconstruction() {
        let raw = json!({
            "meta": {
                "date": "1995-03-14T08:30:15Z",
                "location": "Delhi, India",
                "inputs": null
            }
        });
        match recover_inputs(&raw).unwrap() {
            RecoveredInputs::Reconstructed(inputs) => {
                assert_eq!(inputs.location, "Delhi, India");
            }
            other => panic!("expected reconstructed inputs, got {:?}", other),
        }
    }

    #[test]
    fn record_without_meta_is_malformed() {
        let err = recover_inputs(&json!({"positions": {}})).unwrap_err();
        assert!(matches!(err, RecoverError::MalformedRecord(_)));
    }

    #[test]
    fn record_without_date_or_location_is_unrecoverable() {
        let err = recover_inputs(&json!({"meta": {"latitude": 1.0}})).unwrap_err();
        assert!(matches!(err, RecoverError::MissingReconstructibleInputs));
    }

    #[test]
    fn unparseable_date_is_malformed() {
        let raw = json!({"meta": {"date": "yesterday-ish", "location": "Delhi, India"}});
        let err = recover_inputs(&raw).unwrap_err();
        assert!(matches!(err, RecoverError::MalformedRecord(_)));
    }

    #[test]
    fn garbled_inputs_object_is_malformed_not_reconstructed() {
        // Present-but-broken inputs must not fall through to the legacy path.
        let raw = json!({
            "meta": {
                "date": "1995-03-14T08:30:15Z",
                "location": "Delhi, India",
                "inputs": {"year": "not a number"}
            }
        });
        let err = recover_inputs(&raw).unwrap_err();
        assert!(matches!(err, RecoverError::MalformedRecord(_)));
    }
}

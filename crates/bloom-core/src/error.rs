//! Error types for the ingestion boundary and configuration loading.
//!
//! None of these reach the render tick: ingestion failures are folded into a
//! signal-absent [`GestureSignal`](crate::GestureSignal) by the context.

use std::path::PathBuf;

/// A detector payload that could not be turned into a [`FrameResult`](crate::FrameResult).
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("landmark payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A hand observation that lacks a landmark the interpreter needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ObservationError {
    #[error("landmark {0} is missing or non-finite")]
    MissingLandmark(usize),
    #[error("tension computed from landmarks is not finite")]
    NonFiniteTension,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("thresholds must satisfy 0 <= contract ({contract}) < reveal ({reveal}) <= 1")]
    ThresholdOrder { contract: f32, reveal: f32 },
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("gallery spin ({gallery} rad/s) must be faster than the heart spin ({heart_max} rad/s)")]
    SpinOrder { gallery: f32, heart_max: f32 },
    #[error("object count must be at least 1")]
    NoObjects,
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

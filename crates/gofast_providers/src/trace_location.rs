use std::path::Path;

use futures::StreamExt;
use gofast_tracker::{
    meters::Meters,
    position::Position,
    sources::{LocationError, LocationSample, LocationSource, PositionStream, WatchOptions},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse trace: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One entry of a recorded trace: either a fix or a period without signal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TraceSample {
    Fix(Position),
    Gap { unavailable: String },
}

impl From<TraceSample> for LocationSample {
    fn from(sample: TraceSample) -> Self {
        match sample {
            TraceSample::Fix(position) => Ok(position),
            TraceSample::Gap { unavailable } => Err(LocationError::Unavailable(unavailable)),
        }
    }
}

/// Replays a recorded trace as if it came from a device.
pub struct TraceLocationSource {
    samples: Vec<TraceSample>,
    denied: bool,
}

impl TraceLocationSource {
    pub fn new(samples: Vec<TraceSample>) -> Self {
        Self {
            samples,
            denied: false,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&content)?))
    }

    /// A source that refuses every watch request.
    pub fn denied() -> Self {
        Self {
            samples: Vec::new(),
            denied: true,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Drops fixes closer than `min_displacement` to the last kept fix. Gaps are kept.
pub fn thin_by_displacement(samples: &[TraceSample], min_displacement: Meters) -> Vec<TraceSample> {
    let mut last: Option<Position> = None;

    samples
        .iter()
        .filter(|sample| match sample {
            TraceSample::Fix(position) => {
                let keep = last.is_none_or(|previous| {
                    previous.distance_to(&position.lat_lon()) >= min_displacement
                });
                if keep {
                    last = Some(*position);
                }
                keep
            }
            TraceSample::Gap { .. } => true,
        })
        .cloned()
        .collect()
}

impl LocationSource for TraceLocationSource {
    fn watch(&self, options: &WatchOptions) -> Result<PositionStream, LocationError> {
        if self.denied {
            return Err(LocationError::PermissionDenied);
        }

        let samples = thin_by_displacement(&self.samples, options.min_displacement);
        let interval = options.min_interval.unsigned_abs();
        debug!(samples = samples.len(), "Replaying trace every {interval:?}");

        Ok(futures::stream::iter(samples.into_iter().enumerate())
            .then(move |(index, sample)| async move {
                if index > 0 {
                    tokio::time::sleep(interval).await;
                }
                LocationSample::from(sample)
            })
            .boxed())
    }
}

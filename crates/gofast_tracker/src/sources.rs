use std::future::Future;

use futures::stream::BoxStream;
use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    lat_lon::LatLon,
    meters::Meters,
    position::Position,
    route_plan::{OptimizeRequest, RoutePlan},
    segment::Segment,
};

/// Sequences the stops of a run. Called once per run start.
pub trait RouteOptimizer {
    fn optimize(
        &self,
        request: &OptimizeRequest,
    ) -> impl Future<Output = anyhow::Result<RoutePlan>> + Send;
}

/// Fetches the driving segment between two consecutive stops.
pub trait DirectionsSource {
    fn fetch_segment(
        &self,
        from: LatLon,
        to: LatLon,
    ) -> impl Future<Output = anyhow::Result<Segment>> + Send;
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

pub type LocationSample = Result<Position, LocationError>;

pub type PositionStream = BoxStream<'static, LocationSample>;

#[derive(Clone, Debug)]
pub struct WatchOptions {
    pub min_interval: SignedDuration,
    pub min_displacement: Meters,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            min_interval: SignedDuration::from_secs(1),
            min_displacement: Meters::new(5.0),
        }
    }
}

/// Continuous stream of position samples. Dropping the stream stops it.
pub trait LocationSource {
    fn watch(&self, options: &WatchOptions) -> Result<PositionStream, LocationError>;
}

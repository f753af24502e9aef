#![allow(dead_code)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::StreamExt;
use gofast_tracker::{
    lat_lon::LatLon,
    maneuver::{Maneuver, ManeuverType},
    route_plan::{OptimizeRequest, OptimizerWeights, OrderInput, RoutePlan},
    segment::{Segment, Step},
    session::{RunRequest, SessionParams, SessionView},
    sources::{
        DirectionsSource, LocationError, LocationSample, LocationSource, PositionStream,
        RouteOptimizer, WatchOptions,
    },
    stop::{OrderId, Stop},
    tracker_config::TrackerConfig,
};
use jiff::SignedDuration;
use tokio::sync::{Semaphore, mpsc, watch};

pub const DEPOT: LatLon = LatLon {
    lat: 10.8453773,
    lon: 106.794445,
};

pub fn step(kind: ManeuverType, name: &str, maneuver: LatLon, end: LatLon) -> Step {
    Step {
        distance: maneuver.haversine_distance(&end),
        duration: SignedDuration::from_secs(10),
        geometry: vec![maneuver, end],
        name: name.to_string(),
        maneuver: Maneuver {
            kind,
            modifier: None,
            location: maneuver,
            instruction: String::new(),
        },
    }
}

pub fn segment(steps: Vec<Step>) -> Segment {
    Segment {
        distance: steps.iter().map(|step| step.distance).sum(),
        duration: SignedDuration::from_secs(60),
        geometry: vec![],
        steps,
    }
}

/// Two steps: depart with its maneuver at (10.0009, 106.0), arrive at (10.001, 106.0).
pub fn approach_segment() -> Segment {
    segment(vec![
        step(
            ManeuverType::Depart,
            "Vo Van Ngan",
            LatLon::new(10.0009, 106.0),
            LatLon::new(10.0009, 106.0),
        ),
        step(
            ManeuverType::Arrive,
            "Vo Van Ngan",
            LatLon::new(10.001, 106.0),
            LatLon::new(10.001, 106.0),
        ),
    ])
}

pub fn three_stop_plan() -> RoutePlan {
    RoutePlan::new(vec![
        Stop::current_location(LatLon::new(10.0, 106.0)),
        Stop::order(OrderId::new("A1"), LatLon::new(10.001, 106.0)),
        Stop::warehouse(DEPOT),
    ])
}

pub fn params(origin: Option<LatLon>) -> SessionParams {
    SessionParams {
        tracker: TrackerConfig::default(),
        watch: WatchOptions::default(),
        run: RunRequest {
            orders: vec![OrderInput {
                id: OrderId::new("A1"),
                position: LatLon::new(10.001, 106.0),
                weight_kg: 1.5,
            }],
            depot: DEPOT,
            origin,
            weights: OptimizerWeights::default(),
        },
    }
}

pub struct FakeOptimizer {
    result: Result<RoutePlan, String>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeOptimizer {
    pub fn returning(plan: RoutePlan) -> Self {
        Self {
            result: Ok(plan),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl RouteOptimizer for FakeOptimizer {
    async fn optimize(&self, _request: &OptimizeRequest) -> anyhow::Result<RoutePlan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(anyhow::Error::msg)
    }
}

/// Answers every fetch with the same segment. When gated, each fetch waits
/// for a permit released by the test.
pub struct FakeDirections {
    result: Result<Segment, String>,
    gate: Option<Arc<Semaphore>>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeDirections {
    pub fn returning(segment: Segment) -> Self {
        Self {
            result: Ok(segment),
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn gated(segment: Segment) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (
            Self {
                result: Ok(segment),
                gate: Some(Arc::clone(&gate)),
                calls: Arc::new(AtomicUsize::new(0)),
            },
            gate,
        )
    }
}

impl DirectionsSource for FakeDirections {
    async fn fetch_segment(&self, _from: LatLon, _to: LatLon) -> anyhow::Result<Segment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }
        self.result.clone().map_err(anyhow::Error::msg)
    }
}

/// Location source fed by the test through a channel.
pub struct ChannelLocation {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<LocationSample>>>,
}

impl ChannelLocation {
    pub fn new() -> (Self, mpsc::UnboundedSender<LocationSample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                receiver: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

impl LocationSource for ChannelLocation {
    fn watch(&self, _options: &WatchOptions) -> Result<PositionStream, LocationError> {
        let receiver = self
            .receiver
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| LocationError::Unavailable("already watched".to_string()))?;

        Ok(futures::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|sample| (sample, receiver))
        })
        .boxed())
    }
}

pub struct DeniedLocation;

impl LocationSource for DeniedLocation {
    fn watch(&self, _options: &WatchOptions) -> Result<PositionStream, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

/// Waits until a fake source has been called `expected` times.
pub async fn wait_for_calls(calls: &AtomicUsize, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while calls.load(Ordering::SeqCst) < expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for source calls");
}

pub async fn wait_for_view<F>(view: &mut watch::Receiver<SessionView>, predicate: F) -> SessionView
where
    F: FnMut(&SessionView) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), view.wait_for(predicate))
        .await
        .expect("timed out waiting for session view")
        .expect("session stopped")
        .clone()
}

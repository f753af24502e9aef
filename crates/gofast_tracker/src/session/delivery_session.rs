use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::{
    fetch_gate::FetchGate,
    lat_lon::LatLon,
    position::{Position, PositionStore},
    progress_tracker::{
        AdvanceAction, ProgressTracker, SegmentRequest, StepUpdate, TrackerSnapshot,
    },
    route_plan::{OptimizeRequest, OptimizerWeights, OrderInput, RoutePlan},
    segment::Segment,
    sources::{
        DirectionsSource, LocationError, LocationSample, LocationSource, PositionStream,
        RouteOptimizer, WatchOptions,
    },
    tracker_config::TrackerConfig,
};

use super::{
    notice::Notice,
    session_handle::{SessionCommand, SessionHandle},
};

/// What the run is made of: the orders to deliver and where it ends.
#[derive(Clone, Debug)]
pub struct RunRequest {
    pub orders: Vec<OrderInput>,
    pub depot: LatLon,
    /// Start of the run. When `None` the first position fix is used.
    pub origin: Option<LatLon>,
    pub weights: OptimizerWeights,
}

#[derive(Clone, Debug)]
pub struct SessionParams {
    pub tracker: TrackerConfig,
    pub watch: WatchOptions,
    pub run: RunRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub plan: FetchGate,
    pub generation: u64,
    pub run: TrackerSnapshot,
}

enum Outcome {
    Plan {
        generation: u64,
        origin: LatLon,
        result: anyhow::Result<RoutePlan>,
    },
    Segment {
        generation: u64,
        request: SegmentRequest,
        result: anyhow::Result<Segment>,
    },
}

/// Drives a delivery run from a single task.
///
/// All tracker mutation happens on that task, in response to position
/// samples, user commands, or the outcome of a fetch it dispatched.
pub struct DeliverySession<D, O> {
    directions: Arc<D>,
    optimizer: Arc<O>,
    params: SessionParams,
    tracker: ProgressTracker,
    plan_gate: FetchGate,
    /// Bumped on restart; outcomes from an older generation are dropped.
    generation: u64,
    positions: PositionStore,
    permission_notified: bool,
    view: watch::Sender<SessionView>,
    notices: mpsc::UnboundedSender<Notice>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
}

async fn next_sample(stream: &mut Option<PositionStream>) -> Option<LocationSample> {
    match stream {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

impl<D, O> DeliverySession<D, O>
where
    D: DirectionsSource + Send + Sync + 'static,
    O: RouteOptimizer + Send + Sync + 'static,
{
    /// Starts the session on the current tokio runtime.
    pub fn spawn<L>(directions: D, optimizer: O, location: &L, params: SessionParams) -> SessionHandle
    where
        L: LocationSource,
    {
        let stream = location.watch(&params.watch);

        let tracker = ProgressTracker::new(params.tracker.clone());
        let (view_tx, view_rx) = watch::channel(SessionView {
            plan: FetchGate::NotStarted,
            generation: 0,
            run: tracker.snapshot(),
        });
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        let positions = PositionStore::new();
        let position_reader = positions.reader();

        let session = DeliverySession {
            directions: Arc::new(directions),
            optimizer: Arc::new(optimizer),
            params,
            tracker,
            plan_gate: FetchGate::NotStarted,
            generation: 0,
            positions,
            permission_notified: false,
            view: view_tx,
            notices: notices_tx,
            commands: commands_rx,
            outcomes_tx,
            outcomes_rx,
        };

        let task = tokio::spawn(session.run(stream));

        SessionHandle::new(commands_tx, view_rx, position_reader, notices_rx, task)
    }

    async fn run(mut self, stream: Result<PositionStream, LocationError>) {
        let mut stream = match stream {
            Ok(stream) => Some(stream),
            Err(error) => {
                self.on_location_error(error);
                None
            }
        };

        if let Some(origin) = self.params.run.origin {
            self.start_plan(origin);
        }
        self.publish();

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(SessionCommand::AdvanceToNextStop) => self.advance(),
                    Some(SessionCommand::Restart) => self.restart(),
                    Some(SessionCommand::Shutdown) | None => break,
                },
                sample = next_sample(&mut stream) => match sample {
                    Some(Ok(position)) => self.on_position(position),
                    Some(Err(LocationError::PermissionDenied)) => {
                        self.on_location_error(LocationError::PermissionDenied);
                        stream = None;
                    }
                    Some(Err(error)) => {
                        debug!("Skipping position sample: {}", error);
                        self.tracker.on_position_update(None);
                    }
                    None => {
                        info!("Location stream ended");
                        self.notify(Notice::LocationStreamEnded);
                        stream = None;
                    }
                },
                Some(outcome) = self.outcomes_rx.recv() => self.apply_outcome(outcome),
            }

            self.publish();
        }

        // Stops platform location updates right away
        drop(stream);
        info!("Delivery session stopped");
    }

    fn on_location_error(&mut self, error: LocationError) {
        match error {
            LocationError::PermissionDenied => {
                if !self.permission_notified {
                    warn!("Location permission denied");
                    self.permission_notified = true;
                    self.notify(Notice::LocationPermissionDenied);
                }
            }
            LocationError::Unavailable(reason) => {
                warn!("Location unavailable: {}", reason);
            }
        }
    }

    fn on_position(&mut self, position: Position) {
        self.positions.publish(position);

        if self.plan_gate == FetchGate::NotStarted {
            self.start_plan(position.lat_lon());
        }

        if let StepUpdate::Advanced { from, to, remaining } =
            self.tracker.on_position_update(self.positions.latest().as_ref())
        {
            info!(from, to, "Next instruction, {} left on it", remaining);
        }
    }

    fn start_plan(&mut self, origin: LatLon) {
        if !self.plan_gate.try_start() {
            return;
        }

        let request = OptimizeRequest {
            orders: self.params.run.orders.clone(),
            origin,
            depot: self.params.run.depot,
            weights: self.params.run.weights,
        };

        if let Err(error) = request.validate() {
            self.outcomes_tx
                .send(Outcome::Plan {
                    generation: self.generation,
                    origin,
                    result: Err(error.into()),
                })
                .ok();
            return;
        }

        info!(orders = request.orders.len(), "Requesting route plan");

        let optimizer = Arc::clone(&self.optimizer);
        let outcomes = self.outcomes_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = optimizer.optimize(&request).await;
            // The session may be gone by now
            outcomes
                .send(Outcome::Plan {
                    generation,
                    origin,
                    result,
                })
                .ok();
        });
    }

    fn fetch_segment(&mut self, request: SegmentRequest) {
        debug!(target_stop = request.target_stop, "Fetching segment");

        let directions = Arc::clone(&self.directions);
        let outcomes = self.outcomes_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = directions.fetch_segment(request.from, request.to).await;
            outcomes
                .send(Outcome::Segment {
                    generation,
                    request,
                    result,
                })
                .ok();
        });
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Plan { generation, .. } | Outcome::Segment { generation, .. }
                if generation != self.generation =>
            {
                debug!(generation, "Dropping outcome of a previous run");
            }
            Outcome::Plan { origin, result, .. } => {
                self.plan_gate.finish();

                let plan = match result {
                    Ok(plan) if plan.is_usable() => plan,
                    Ok(_) => {
                        self.fall_back("the optimizer returned no route".to_string());
                        RoutePlan::fallback(origin, self.params.run.depot)
                    }
                    Err(error) => {
                        self.fall_back(format!("{error:#}"));
                        RoutePlan::fallback(origin, self.params.run.depot)
                    }
                };

                self.tracker.load_plan(plan);
                if let Some(request) = self.tracker.request_current_segment() {
                    self.fetch_segment(request);
                }
            }
            Outcome::Segment {
                request, result, ..
            } => match result {
                Ok(segment) => {
                    if self.tracker.apply_segment(&request, segment) {
                        self.tracker
                            .on_position_update(self.positions.latest().as_ref());
                    }
                }
                Err(error) => {
                    warn!("Segment fetch failed: {:#}", error);
                    if self.tracker.fail_segment(&request) {
                        self.notify(Notice::SegmentFetchFailed {
                            reason: format!("{error:#}"),
                        });
                    }
                }
            },
        }
    }

    fn fall_back(&mut self, reason: String) {
        warn!("Falling back to the direct route: {}", reason);
        self.notify(Notice::PlanFallback { reason });
    }

    fn advance(&mut self) {
        match self.tracker.begin_advance() {
            Ok(AdvanceAction::Fetch(request)) => self.fetch_segment(request),
            Ok(AdvanceAction::Completed) => self.notify(Notice::RunCompleted),
            Err(error) => {
                debug!("Advance rejected: {}", error);
                self.notify(Notice::AdvanceRejected(error));
            }
        }
    }

    fn restart(&mut self) {
        info!("Restarting run");
        self.generation += 1;
        self.plan_gate.reset();
        self.tracker = ProgressTracker::new(self.params.tracker.clone());

        let origin = self
            .params
            .run
            .origin
            .or_else(|| self.positions.latest().map(|position| position.lat_lon()));
        if let Some(origin) = origin {
            self.start_plan(origin);
        }
    }

    fn notify(&self, notice: Notice) {
        // Nobody listening is fine
        self.notices.send(notice).ok();
    }

    fn publish(&self) {
        self.view.send_replace(SessionView {
            plan: self.plan_gate,
            generation: self.generation,
            run: self.tracker.snapshot(),
        });
    }
}

use jiff::SignedDuration;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    instruction::{TurnPanel, render_turn_panel},
    lat_lon::LatLon,
    meters::Meters,
    position::Position,
    route_plan::RoutePlan,
    segment::Segment,
    stop::Stop,
    tracker_config::TrackerConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    NotStarted,
    InProgress,
    Completed,
}

/// A segment fetch the tracker is waiting on.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRequest {
    /// Stop the cursor moves to once the segment arrives.
    pub target_stop: usize,
    pub from: LatLon,
    pub to: LatLon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceAction {
    Fetch(SegmentRequest),
    Completed,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdvanceError {
    #[error("No route plan loaded yet")]
    NotStarted,

    #[error("A segment fetch is already in flight")]
    InFlight,

    #[error("The run is already completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepUpdate {
    NoPosition,
    NoSteps,
    Unchanged { remaining: Meters },
    Advanced { from: usize, to: usize, remaining: Meters },
    FinalStep { remaining: Meters },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedSegment {
    pub from_stop: usize,
    pub to_stop: usize,
    pub segment: Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub phase: RunPhase,
    pub stops: Vec<Stop>,
    pub stop_index: usize,
    pub step_index: usize,
    pub turn_panel: Option<TurnPanel>,
    pub can_advance: bool,
    pub fetch_in_flight: bool,
    pub completed_segments: usize,
    pub total_predicted_time: Option<SignedDuration>,
    pub total_distance: Option<Meters>,
    pub remaining_predicted_time: Option<SignedDuration>,
}

/// Tracks progress through a delivery run.
///
/// The cursor is `(stop_index, step_index)`. `step_index` moves forward with
/// position samples; `stop_index` only moves on an explicit advance, once the
/// next segment has been fetched.
pub struct ProgressTracker {
    config: TrackerConfig,
    plan: Option<RoutePlan>,
    stop_index: usize,
    step_index: usize,
    current: Option<Segment>,
    completed: Vec<CompletedSegment>,
    pending: Option<SegmentRequest>,
    remaining: Option<Meters>,
}

impl ProgressTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            plan: None,
            stop_index: 0,
            step_index: 0,
            current: None,
            completed: Vec::new(),
            pending: None,
            remaining: None,
        }
    }

    pub fn load_plan(&mut self, plan: RoutePlan) {
        info!(stops = plan.stops.len(), "Loaded route plan");
        self.plan = Some(plan);
        self.stop_index = 0;
        self.step_index = 0;
        self.current = None;
        self.completed.clear();
        self.pending = None;
        self.remaining = None;
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn stops(&self) -> &[Stop] {
        self.plan.as_ref().map_or(&[], |plan| plan.stops.as_slice())
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.stop_index, self.step_index)
    }

    pub fn current_segment(&self) -> Option<&Segment> {
        self.current.as_ref()
    }

    pub fn completed_segments(&self) -> &[CompletedSegment] {
        &self.completed
    }

    pub fn is_fetch_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining(&self) -> Option<Meters> {
        self.remaining
    }

    pub fn phase(&self) -> RunPhase {
        let stops = self.stops().len();
        if stops == 0 {
            RunPhase::NotStarted
        } else if self.stop_index >= stops {
            RunPhase::Completed
        } else {
            RunPhase::InProgress
        }
    }

    pub fn can_advance(&self) -> bool {
        self.phase() == RunPhase::InProgress && self.pending.is_none()
    }

    /// Requests the segment leaving the current stop when none is loaded.
    pub fn request_current_segment(&mut self) -> Option<SegmentRequest> {
        if self.phase() != RunPhase::InProgress || self.current.is_some() || self.pending.is_some()
        {
            return None;
        }

        let stops = self.stops();
        let next = stops.get(self.stop_index + 1)?;

        let request = SegmentRequest {
            target_stop: self.stop_index,
            from: stops[self.stop_index].position,
            to: next.position,
        };
        self.pending = Some(request.clone());

        Some(request)
    }

    pub fn on_position_update(&mut self, position: Option<&Position>) -> StepUpdate {
        let Some(position) = position else {
            return StepUpdate::NoPosition;
        };

        let Some(segment) = self.current.as_ref() else {
            return StepUpdate::NoSteps;
        };

        let from = self.step_index;
        let Some(step) = segment.steps.get(from) else {
            return StepUpdate::NoSteps;
        };

        let to_maneuver = position.distance_to(&step.maneuver.location);
        let remaining = position.distance_to(&step.end_point());

        let Some(next) = segment.steps.get(from + 1) else {
            if to_maneuver < self.config.near_threshold {
                debug!(
                    "Within {} of the final maneuver, waiting for the next stop",
                    to_maneuver
                );
            }
            self.remaining = Some(remaining);
            return StepUpdate::FinalStep { remaining };
        };

        let reached_maneuver = to_maneuver < self.config.near_threshold;
        let settling = step.is_turn()
            && remaining < self.config.post_turn_threshold
            && step.continues_straight_into(next);

        if !(reached_maneuver || settling) {
            self.remaining = Some(remaining);
            return StepUpdate::Unchanged { remaining };
        }

        if settling && !reached_maneuver {
            debug!(step = from, "Skipping settling step after turn");
        }

        let remaining = position.distance_to(&next.end_point());
        self.step_index = from + 1;
        self.remaining = Some(remaining);

        debug!(from, to = self.step_index, "Advanced step");
        StepUpdate::Advanced {
            from,
            to: self.step_index,
            remaining,
        }
    }

    pub fn begin_advance(&mut self) -> Result<AdvanceAction, AdvanceError> {
        let stop_count = self.stops().len();
        match self.phase() {
            RunPhase::NotStarted => return Err(AdvanceError::NotStarted),
            RunPhase::Completed => return Err(AdvanceError::Completed),
            RunPhase::InProgress => {}
        }

        if self.pending.is_some() {
            return Err(AdvanceError::InFlight);
        }

        let next = self.stop_index + 1;
        if next + 1 >= stop_count {
            self.archive_current(next);
            self.stop_index = stop_count;
            self.step_index = 0;
            self.remaining = None;
            info!("Run completed");
            return Ok(AdvanceAction::Completed);
        }

        let stops = self.stops();
        let request = SegmentRequest {
            target_stop: next,
            from: stops[next].position,
            to: stops[next + 1].position,
        };
        self.pending = Some(request.clone());

        Ok(AdvanceAction::Fetch(request))
    }

    /// Applies a fetched segment. Returns `false` and changes nothing when
    /// `request` is not the fetch the tracker is waiting on.
    pub fn apply_segment(&mut self, request: &SegmentRequest, segment: Segment) -> bool {
        if self.pending.as_ref() != Some(request) {
            debug!(?request, "Ignoring segment for a stale request");
            return false;
        }

        self.pending = None;
        if request.target_stop != self.stop_index {
            self.archive_current(request.target_stop);
            self.stop_index = request.target_stop;
        }

        if !segment.has_steps() {
            info!(stop = self.stop_index, "Segment has no steps");
        }

        self.current = Some(segment);
        self.step_index = 0;
        self.remaining = None;

        true
    }

    /// Drops the in-flight request, keeping the last good state.
    pub fn fail_segment(&mut self, request: &SegmentRequest) -> bool {
        if self.pending.as_ref() != Some(request) {
            return false;
        }

        self.pending = None;
        true
    }

    fn archive_current(&mut self, to_stop: usize) {
        if let Some(segment) = self.current.take() {
            self.completed.push(CompletedSegment {
                from_stop: self.stop_index,
                to_stop,
                segment,
            });
        }
    }

    pub fn turn_panel(&self) -> Option<TurnPanel> {
        self.current
            .as_ref()
            .and_then(|segment| render_turn_panel(&segment.steps, self.step_index, self.remaining))
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            phase: self.phase(),
            stops: self.stops().to_vec(),
            stop_index: self.stop_index,
            step_index: self.step_index,
            turn_panel: self.turn_panel(),
            can_advance: self.can_advance(),
            fetch_in_flight: self.is_fetch_in_flight(),
            completed_segments: self.completed.len(),
            total_predicted_time: self.plan.as_ref().map(|plan| plan.total_predicted_time),
            total_distance: self.plan.as_ref().and_then(|plan| plan.total_distance),
            remaining_predicted_time: self
                .plan
                .as_ref()
                .and_then(|plan| plan.remaining_time_from(self.stop_index)),
        }
    }
}

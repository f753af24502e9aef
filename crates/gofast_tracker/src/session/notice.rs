use std::fmt::Display;

use crate::progress_tracker::AdvanceError;

/// User-facing message published by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The optimizer failed or returned nothing usable; the run continues on
    /// the two-stop fallback plan.
    PlanFallback { reason: String },
    SegmentFetchFailed { reason: String },
    AdvanceRejected(AdvanceError),
    LocationPermissionDenied,
    LocationStreamEnded,
    RunCompleted,
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::PlanFallback { reason } => write!(
                f,
                "Could not optimize the route ({reason}), heading straight back to the warehouse"
            ),
            Notice::SegmentFetchFailed { reason } => {
                write!(f, "Could not load directions to the next stop: {reason}")
            }
            Notice::AdvanceRejected(error) => write!(f, "Cannot move to the next stop: {error}"),
            Notice::LocationPermissionDenied => write!(
                f,
                "Location access was denied, turn-by-turn guidance is disabled"
            ),
            Notice::LocationStreamEnded => write!(f, "Location updates stopped"),
            Notice::RunCompleted => write!(f, "Delivery run completed"),
        }
    }
}

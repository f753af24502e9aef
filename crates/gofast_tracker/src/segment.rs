use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::{lat_lon::LatLon, maneuver::Maneuver, meters::Meters};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub distance: Meters,
    pub duration: SignedDuration,
    pub geometry: Vec<LatLon>,
    /// Road name, empty when the road is unnamed.
    pub name: String,
    pub maneuver: Maneuver,
}

impl Step {
    /// The end of this step's route geometry. Not always identical to the
    /// maneuver location, so remaining distance is measured against it.
    pub fn end_point(&self) -> LatLon {
        self.geometry
            .last()
            .copied()
            .unwrap_or(self.maneuver.location)
    }

    pub fn is_turn(&self) -> bool {
        self.maneuver.kind.is_turn()
    }

    pub fn is_straight(&self) -> bool {
        self.maneuver.kind.is_straight()
    }

    /// Whether `next` keeps going straight on the road this step ends on.
    pub fn continues_straight_into(&self, next: &Step) -> bool {
        next.is_straight() && next.name == self.name
    }
}

/// Route geometry and turn-by-turn steps between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub distance: Meters,
    pub duration: SignedDuration,
    pub geometry: Vec<LatLon>,
    pub steps: Vec<Step>,
}

impl Segment {
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }
}

use crate::meters::Meters;

/// Distance thresholds driving step advancement.
///
/// Both values were tuned on real runs; GPS noise at low speed can trigger a
/// step change early or miss one, so they are exposed as configuration.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Advance once the position is this close to the active maneuver point.
    pub near_threshold: Meters,
    /// Remaining distance on a turn below which a following same-road
    /// "continue" step is skipped.
    pub post_turn_threshold: Meters,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            near_threshold: Meters::new(15.0),
            post_turn_threshold: Meters::new(10.0),
        }
    }
}

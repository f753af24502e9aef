use serde::Serialize;

use crate::{maneuver::ManeuverModifier, meters::Meters, segment::Step};

const UNNAMED_ROAD: &str = "unnamed road";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStep {
    pub text: String,
    /// Distance shown next to the instruction: remaining distance for the
    /// active step when known, the step's total distance otherwise.
    pub distance: Meters,
    pub active: bool,
}

/// The turn-by-turn list shown for the current segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnPanel {
    pub active_index: usize,
    pub remaining: Option<Meters>,
    pub steps: Vec<RenderedStep>,
}

impl TurnPanel {
    pub fn active(&self) -> Option<&RenderedStep> {
        self.steps.get(self.active_index)
    }
}

pub fn turn_action(modifier: Option<ManeuverModifier>) -> &'static str {
    match modifier {
        Some(ManeuverModifier::Uturn) => "Make a U-turn",
        Some(ManeuverModifier::SharpLeft) => "Turn sharp left",
        Some(ManeuverModifier::Left) => "Turn left",
        Some(ManeuverModifier::SlightLeft) => "Keep slightly left",
        Some(ManeuverModifier::Straight) => "Go straight",
        Some(ManeuverModifier::SlightRight) => "Keep slightly right",
        Some(ManeuverModifier::Right) => "Turn right",
        Some(ManeuverModifier::SharpRight) => "Turn sharp right",
        Some(ManeuverModifier::Unknown) | None => "Turn",
    }
}

fn road_name(step: &Step) -> &str {
    if step.name.trim().is_empty() {
        UNNAMED_ROAD
    } else {
        &step.name
    }
}

fn shown_distance(
    step: &Step,
    index: usize,
    active_index: usize,
    remaining: Option<Meters>,
) -> Meters {
    match remaining {
        Some(remaining) if index == active_index => remaining,
        _ => step.distance,
    }
}

/// Renders the instruction of `steps[index]`.
///
/// Panics if `index` is out of bounds.
pub fn render_step(
    steps: &[Step],
    index: usize,
    active_index: usize,
    remaining: Option<Meters>,
) -> String {
    let step = &steps[index];
    let distance = shown_distance(step, index, active_index, remaining);

    if step.is_turn() {
        let mut text = format!(
            "{} onto {}, then straight {}",
            turn_action(step.maneuver.modifier),
            road_name(step),
            distance
        );

        if let Some(next) = steps
            .get(index + 1)
            .filter(|next| step.continues_straight_into(next))
        {
            text.push_str(&format!(
                ", then straight on {} for {}",
                road_name(next),
                next.distance
            ));
        }

        text
    } else if step.is_straight() {
        format!("Straight {} on {}", distance, road_name(step))
    } else {
        step.maneuver.instruction.clone()
    }
}

/// `None` when the segment has no steps: no turn-by-turn panel is shown.
pub fn render_turn_panel(
    steps: &[Step],
    active_index: usize,
    remaining: Option<Meters>,
) -> Option<TurnPanel> {
    if steps.is_empty() {
        return None;
    }

    let rendered = (0..steps.len())
        .map(|index| RenderedStep {
            text: render_step(steps, index, active_index, remaining),
            distance: shown_distance(&steps[index], index, active_index, remaining),
            active: index == active_index,
        })
        .collect();

    Some(TurnPanel {
        active_index,
        remaining,
        steps: rendered,
    })
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use crate::{
        lat_lon::LatLon,
        maneuver::{Maneuver, ManeuverType},
    };

    use super::*;

    fn step(
        kind: ManeuverType,
        modifier: Option<ManeuverModifier>,
        name: &str,
        distance: f64,
    ) -> Step {
        Step {
            distance: Meters::new(distance),
            duration: SignedDuration::from_secs(10),
            geometry: vec![],
            name: name.to_string(),
            maneuver: Maneuver {
                kind,
                modifier,
                location: LatLon::new(10.0, 106.0),
                instruction: format!("raw {name}"),
            },
        }
    }

    #[test]
    fn test_turn_action_lookup() {
        assert_eq!(turn_action(Some(ManeuverModifier::Left)), "Turn left");
        assert_eq!(turn_action(Some(ManeuverModifier::Uturn)), "Make a U-turn");
        assert_eq!(
            turn_action(Some(ManeuverModifier::SlightRight)),
            "Keep slightly right"
        );
        assert_eq!(turn_action(Some(ManeuverModifier::Unknown)), "Turn");
        assert_eq!(turn_action(None), "Turn");
    }

    #[test]
    fn test_turn_with_same_road_continuation() {
        let steps = vec![
            step(
                ManeuverType::Turn,
                Some(ManeuverModifier::Right),
                "Vo Van Ngan",
                8.0,
            ),
            step(ManeuverType::Continue, None, "Vo Van Ngan", 240.4),
            step(ManeuverType::Arrive, None, "", 0.0),
        ];

        assert_eq!(
            render_step(&steps, 0, 0, Some(Meters::new(5.2))),
            "Turn right onto Vo Van Ngan, then straight 5m, then straight on Vo Van Ngan for 240m"
        );
        // Not active: total distance
        assert_eq!(
            render_step(&steps, 0, 1, Some(Meters::new(5.2))),
            "Turn right onto Vo Van Ngan, then straight 8m, then straight on Vo Van Ngan for 240m"
        );
    }

    #[test]
    fn test_turn_onto_other_road_has_no_continuation() {
        let steps = vec![
            step(ManeuverType::Fork, Some(ManeuverModifier::SlightLeft), "QL1A", 300.0),
            step(ManeuverType::Continue, None, "Xa Lo Ha Noi", 500.0),
        ];

        assert_eq!(
            render_step(&steps, 0, 1, None),
            "Keep slightly left onto QL1A, then straight 300m"
        );
    }

    #[test]
    fn test_straight_steps_use_remaining_when_active() {
        let steps = vec![step(ManeuverType::Depart, None, "", 120.0)];

        assert_eq!(render_step(&steps, 0, 0, None), "Straight 120m on unnamed road");
        assert_eq!(
            render_step(&steps, 0, 0, Some(Meters::new(75.6))),
            "Straight 76m on unnamed road"
        );
    }

    #[test]
    fn test_other_maneuvers_keep_raw_instruction() {
        let steps = vec![step(ManeuverType::Arrive, None, "Le Van Viet", 0.0)];
        assert_eq!(render_step(&steps, 0, 0, None), "raw Le Van Viet");
    }

    #[test]
    fn test_panel_marks_active_step() {
        let steps = vec![
            step(ManeuverType::Depart, None, "A", 100.0),
            step(ManeuverType::Turn, Some(ManeuverModifier::Left), "B", 50.0),
        ];

        let panel = render_turn_panel(&steps, 1, Some(Meters::new(20.0))).unwrap();
        assert_eq!(panel.steps.len(), 2);
        assert!(!panel.steps[0].active);
        assert_eq!(panel.steps[0].distance, Meters::new(100.0));
        assert_eq!(panel.active().unwrap().distance, Meters::new(20.0));
        assert_eq!(
            panel.active().unwrap().text,
            "Turn left onto B, then straight 20m"
        );

        assert!(render_turn_panel(&[], 0, None).is_none());
    }
}

use serde::{Deserialize, Serialize};

use crate::lat_lon::LatLon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverType {
    Turn,
    NewName,
    Depart,
    Arrive,
    Merge,
    OnRamp,
    OffRamp,
    Fork,
    EndOfRoad,
    Continue,
    Roundabout,
    Rotary,
    RoundaboutTurn,
    ExitRoundabout,
    ExitRotary,
    Notification,
    Unknown,
}

impl ManeuverType {
    /// Parses the maneuver vocabulary of the directions service, e.g. `"end of road"`.
    pub fn parse(value: &str) -> Self {
        match value {
            "turn" => ManeuverType::Turn,
            "new name" => ManeuverType::NewName,
            "depart" => ManeuverType::Depart,
            "arrive" => ManeuverType::Arrive,
            "merge" => ManeuverType::Merge,
            "on ramp" => ManeuverType::OnRamp,
            "off ramp" => ManeuverType::OffRamp,
            "fork" => ManeuverType::Fork,
            "end of road" => ManeuverType::EndOfRoad,
            "continue" => ManeuverType::Continue,
            "roundabout" => ManeuverType::Roundabout,
            "rotary" => ManeuverType::Rotary,
            "roundabout turn" => ManeuverType::RoundaboutTurn,
            "exit roundabout" => ManeuverType::ExitRoundabout,
            "exit rotary" => ManeuverType::ExitRotary,
            "notification" => ManeuverType::Notification,
            _ => ManeuverType::Unknown,
        }
    }

    pub fn is_turn(&self) -> bool {
        matches!(
            self,
            ManeuverType::Turn
                | ManeuverType::Fork
                | ManeuverType::Roundabout
                | ManeuverType::Rotary
                | ManeuverType::RoundaboutTurn
                | ManeuverType::ExitRoundabout
                | ManeuverType::ExitRotary
                | ManeuverType::OnRamp
                | ManeuverType::OffRamp
                | ManeuverType::Merge
                | ManeuverType::EndOfRoad
        )
    }

    pub fn is_straight(&self) -> bool {
        matches!(
            self,
            ManeuverType::Continue | ManeuverType::Depart | ManeuverType::NewName
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverModifier {
    Uturn,
    SharpRight,
    Right,
    SlightRight,
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
    Unknown,
}

impl ManeuverModifier {
    pub fn parse(value: &str) -> Self {
        match value {
            "uturn" => ManeuverModifier::Uturn,
            "sharp right" => ManeuverModifier::SharpRight,
            "right" => ManeuverModifier::Right,
            "slight right" => ManeuverModifier::SlightRight,
            "straight" => ManeuverModifier::Straight,
            "slight left" => ManeuverModifier::SlightLeft,
            "left" => ManeuverModifier::Left,
            "sharp left" => ManeuverModifier::SharpLeft,
            _ => ManeuverModifier::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    pub kind: ManeuverType,
    pub modifier: Option<ManeuverModifier>,
    pub location: LatLon,
    pub instruction: String,
}

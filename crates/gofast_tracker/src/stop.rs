use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::lat_lon::LatLon;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    Warehouse,
    Order,
    CurrentLocation,
}

impl Display for StopKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StopKind::Warehouse => "warehouse",
                StopKind::Order => "order",
                StopKind::CurrentLocation => "current_location",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub kind: StopKind,
    pub position: LatLon,
    pub order_ref: Option<OrderId>,
}

impl Stop {
    pub fn warehouse(position: LatLon) -> Self {
        Stop {
            kind: StopKind::Warehouse,
            position,
            order_ref: None,
        }
    }

    pub fn current_location(position: LatLon) -> Self {
        Stop {
            kind: StopKind::CurrentLocation,
            position,
            order_ref: None,
        }
    }

    pub fn order(id: OrderId, position: LatLon) -> Self {
        Stop {
            kind: StopKind::Order,
            position,
            order_ref: Some(id),
        }
    }
}

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    lat_lon::LatLon,
    meters::Meters,
    stop::{OrderId, Stop},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub id: OrderId,
    pub position: LatLon,
    /// Parcel weight in kilograms, strictly positive.
    pub weight_kg: f64,
}

/// Relative priority of travel time versus distance in the optimizer's cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerWeights {
    pub time: f64,
    pub distance: f64,
}

impl Default for OptimizerWeights {
    fn default() -> Self {
        Self {
            time: 0.5,
            distance: 0.5,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidRequest {
    #[error("Order {0} must have a positive weight")]
    NonPositiveWeight(OrderId),

    #[error("Optimizer weights must be within [0, 1]")]
    WeightOutOfRange,

    #[error("Optimizer weights cannot both be zero")]
    ZeroWeights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeRequest {
    pub orders: Vec<OrderInput>,
    pub origin: LatLon,
    pub depot: LatLon,
    pub weights: OptimizerWeights,
}

impl OptimizeRequest {
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        if !in_range(self.weights.time) || !in_range(self.weights.distance) {
            return Err(InvalidRequest::WeightOutOfRange);
        }

        if self.weights.time + self.weights.distance == 0.0 {
            return Err(InvalidRequest::ZeroWeights);
        }

        let not_positive = |weight_kg: f64| weight_kg.is_nan() || weight_kg <= 0.0;
        if let Some(order) = self.orders.iter().find(|order| not_positive(order.weight_kg)) {
            return Err(InvalidRequest::NonPositiveWeight(order.id.clone()));
        }

        Ok(())
    }
}

/// Predicted cost of travelling between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLeg {
    pub from: usize,
    pub to: usize,
    pub duration: SignedDuration,
    pub distance: Meters,
}

/// The ordered stops of a delivery run, as sequenced by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub stops: Vec<Stop>,
    pub total_predicted_time: SignedDuration,
    pub total_distance: Option<Meters>,
    pub legs: Vec<PlanLeg>,
}

impl RoutePlan {
    pub fn new(stops: Vec<Stop>) -> Self {
        RoutePlan {
            stops,
            total_predicted_time: SignedDuration::ZERO,
            total_distance: None,
            legs: Vec::new(),
        }
    }

    /// Minimal plan used when the optimizer is unavailable: straight from the
    /// current location back to the depot.
    pub fn fallback(origin: LatLon, depot: LatLon) -> Self {
        RoutePlan {
            stops: vec![Stop::current_location(origin), Stop::warehouse(depot)],
            total_predicted_time: SignedDuration::ZERO,
            total_distance: Some(Meters::ZERO),
            legs: Vec::new(),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.stops.len() >= 2
    }

    /// Predicted travel time of the legs starting at `stop_index` or later.
    /// `None` when the optimizer did not report per-leg details.
    pub fn remaining_time_from(&self, stop_index: usize) -> Option<SignedDuration> {
        if self.legs.is_empty() {
            return None;
        }

        Some(
            self.legs
                .iter()
                .filter(|leg| leg.from >= stop_index)
                .fold(SignedDuration::ZERO, |acc, leg| acc + leg.duration),
        )
    }
}

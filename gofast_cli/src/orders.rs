use std::path::Path;

use gofast_tracker::{
    lat_lon::LatLon,
    route_plan::{OptimizerWeights, OrderInput},
    stop::OrderId,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OrderEntry {
    id: String,
    latitude: f64,
    longitude: f64,
    /// Kilograms
    weight: f64,
}

/// Orders file: the parcels of a run and, optionally, how the optimizer
/// should weigh time against distance.
#[derive(Debug, Deserialize)]
pub struct OrdersFile {
    orders: Vec<OrderEntry>,
    #[serde(default)]
    weight_time: Option<f64>,
    #[serde(default)]
    weight_distance: Option<f64>,
}

impl OrdersFile {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn orders(&self) -> Vec<OrderInput> {
        self.orders
            .iter()
            .map(|entry| OrderInput {
                id: OrderId::new(entry.id.as_str()),
                position: LatLon::new(entry.latitude, entry.longitude),
                weight_kg: entry.weight,
            })
            .collect()
    }

    pub fn weights(&self) -> OptimizerWeights {
        let defaults = OptimizerWeights::default();
        OptimizerWeights {
            time: self.weight_time.unwrap_or(defaults.time),
            distance: self.weight_distance.unwrap_or(defaults.distance),
        }
    }
}

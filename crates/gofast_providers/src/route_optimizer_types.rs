use gofast_tracker::{
    lat_lon::LatLon,
    meters::Meters,
    route_plan::{OptimizeRequest, PlanLeg, RoutePlan},
    stop::{OrderId, Stop, StopKind},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapbox_types::seconds;

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRouteBody {
    pub orders: Vec<OrderBody>,
    pub warehouse_latitude: f64,
    pub warehouse_longitude: f64,
    pub current_latitude: f64,
    pub current_longitude: f64,
    pub weight_time: f64,
    pub weight_distance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderBody {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Kilograms
    pub weight: f64,
}

impl From<&OptimizeRequest> for OptimizeRouteBody {
    fn from(request: &OptimizeRequest) -> Self {
        OptimizeRouteBody {
            orders: request
                .orders
                .iter()
                .map(|order| OrderBody {
                    id: order.id.to_string(),
                    latitude: order.position.lat,
                    longitude: order.position.lon,
                    weight: order.weight_kg,
                })
                .collect(),
            warehouse_latitude: request.depot.lat,
            warehouse_longitude: request.depot.lon,
            current_latitude: request.origin.lat,
            current_longitude: request.origin.lon,
            weight_time: request.weights.time,
            weight_distance: request.weights.distance,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OptimizedRouteResponse {
    pub optimized_route: Vec<RoutePoint>,
    pub total_predicted_time_seconds: f64,
    #[serde(default)]
    pub total_distance_meters: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub segments_details: Option<Vec<SegmentDetail>>,
}

#[derive(Debug, Deserialize)]
pub struct RoutePoint {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Predicted cost between two consecutive points of `optimized_route`.
#[derive(Debug, Deserialize)]
pub struct SegmentDetail {
    #[serde(default)]
    pub from_point_id: Option<String>,
    #[serde(default)]
    pub to_point_id: Option<String>,
    pub from_type: String,
    pub to_type: String,
    pub duration_seconds: f64,
    pub distance_meters: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum RouteConversionError {
    #[error("Unknown route point type: {0}")]
    UnknownPointType(String),

    #[error("Order point at index {0} has no id")]
    MissingOrderId(usize),
}

fn parse_kind(kind: &str) -> Result<StopKind, RouteConversionError> {
    match kind {
        "warehouse" => Ok(StopKind::Warehouse),
        "order" => Ok(StopKind::Order),
        "current_location" => Ok(StopKind::CurrentLocation),
        other => Err(RouteConversionError::UnknownPointType(other.to_string())),
    }
}

fn to_stop(index: usize, point: RoutePoint) -> Result<Stop, RouteConversionError> {
    let position = LatLon::new(point.latitude, point.longitude);
    Ok(match parse_kind(&point.kind)? {
        StopKind::Warehouse => Stop::warehouse(position),
        StopKind::CurrentLocation => Stop::current_location(position),
        StopKind::Order => Stop::order(
            OrderId::new(point.id.ok_or(RouteConversionError::MissingOrderId(index))?),
            position,
        ),
    })
}

impl TryFrom<OptimizedRouteResponse> for RoutePlan {
    type Error = RouteConversionError;

    fn try_from(response: OptimizedRouteResponse) -> Result<Self, Self::Error> {
        let stops = response
            .optimized_route
            .into_iter()
            .enumerate()
            .map(|(index, point)| to_stop(index, point))
            .collect::<Result<Vec<_>, _>>()?;

        // Unreachable pairs are reported with infinite costs.
        let legs = response
            .segments_details
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter(|(_, detail)| {
                detail.duration_seconds.is_finite() && detail.distance_meters.is_finite()
            })
            .map(|(index, detail)| PlanLeg {
                from: index,
                to: index + 1,
                duration: seconds(detail.duration_seconds),
                distance: Meters::new(detail.distance_meters),
            })
            .collect();

        Ok(RoutePlan {
            stops,
            total_predicted_time: seconds(response.total_predicted_time_seconds),
            total_distance: response
                .total_distance_meters
                .filter(|distance| distance.is_finite())
                .map(Meters::new),
            legs,
        })
    }
}

#[cfg(test)]
mod tests {
    use gofast_tracker::{
        route_plan::{OptimizerWeights, OrderInput},
        stop::StopKind,
    };
    use jiff::SignedDuration;

    use super::*;

    fn fixture() -> OptimizedRouteResponse {
        serde_json::from_str(include_str!("../tests/fixtures/optimized_route.json")).unwrap()
    }

    #[test]
    fn test_request_body() {
        let request = OptimizeRequest {
            orders: vec![OrderInput {
                id: OrderId::new("A1"),
                position: LatLon::new(10.85, 106.77),
                weight_kg: 2.5,
            }],
            origin: LatLon::new(10.80, 106.70),
            depot: LatLon::new(10.8453773, 106.794445),
            weights: OptimizerWeights {
                time: 0.7,
                distance: 0.3,
            },
        };

        let body = serde_json::to_value(OptimizeRouteBody::from(&request)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "orders": [{ "id": "A1", "latitude": 10.85, "longitude": 106.77, "weight": 2.5 }],
                "warehouse_latitude": 10.8453773,
                "warehouse_longitude": 106.794445,
                "current_latitude": 10.80,
                "current_longitude": 106.70,
                "weight_time": 0.7,
                "weight_distance": 0.3,
            })
        );
    }

    #[test]
    fn test_plan_from_fixture() {
        let plan = RoutePlan::try_from(fixture()).unwrap();

        assert_eq!(
            plan.stops.iter().map(|stop| stop.kind).collect::<Vec<_>>(),
            vec![
                StopKind::CurrentLocation,
                StopKind::Order,
                StopKind::Order,
                StopKind::Warehouse
            ]
        );
        assert_eq!(plan.stops[1].order_ref, Some(OrderId::new("ORD-2")));
        assert_eq!(plan.total_predicted_time, SignedDuration::from_secs(1260));
        assert_eq!(plan.total_distance, Some(Meters::new(9850.0)));

        assert_eq!(plan.legs.len(), 3);
        assert_eq!(plan.legs[1].from, 1);
        assert_eq!(plan.legs[1].to, 2);
        assert_eq!(plan.remaining_time_from(1), Some(SignedDuration::from_secs(780)));
    }

    #[test]
    fn test_unknown_point_type() {
        let response: OptimizedRouteResponse = serde_json::from_value(serde_json::json!({
            "optimized_route": [
                { "type": "current_location", "latitude": 10.8, "longitude": 106.7 },
                { "type": "depot", "latitude": 10.84, "longitude": 106.79 }
            ],
            "total_predicted_time_seconds": 0.0
        }))
        .unwrap();

        assert_eq!(
            RoutePlan::try_from(response),
            Err(RouteConversionError::UnknownPointType("depot".to_string()))
        );
    }

    #[test]
    fn test_order_without_id() {
        let response: OptimizedRouteResponse = serde_json::from_value(serde_json::json!({
            "optimized_route": [
                { "type": "current_location", "latitude": 10.8, "longitude": 106.7 },
                { "type": "order", "latitude": 10.81, "longitude": 106.71 }
            ],
            "total_predicted_time_seconds": 0.0
        }))
        .unwrap();

        assert_eq!(
            RoutePlan::try_from(response),
            Err(RouteConversionError::MissingOrderId(1))
        );
    }

    #[test]
    fn test_direct_route_without_details() {
        let response: OptimizedRouteResponse = serde_json::from_value(serde_json::json!({
            "optimized_route": [
                { "type": "current_location", "latitude": 10.8, "longitude": 106.7 },
                { "type": "warehouse", "latitude": 10.84, "longitude": 106.79 }
            ],
            "total_predicted_time_seconds": 0.0,
            "total_distance_meters": 0.0,
            "message": "No orders provided"
        }))
        .unwrap();

        let plan = RoutePlan::try_from(response).unwrap();
        assert!(plan.is_usable());
        assert!(plan.legs.is_empty());
        assert_eq!(plan.remaining_time_from(0), None);
    }
}

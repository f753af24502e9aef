use gofast_tracker::{
    lat_lon::LatLon,
    maneuver::{Maneuver, ManeuverModifier, ManeuverType},
    meters::Meters,
    segment::{Segment, Step},
};
use jiff::SignedDuration;
use serde::Deserialize;

/// https://docs.mapbox.com/api/navigation/directions/#directions-api-response-object
#[derive(Deserialize)]
pub struct DirectionsResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
pub struct DirectionsRoute {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub geometry: LineString,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// GeoJSON LineString, coordinates in `[lon, lat]` order.
#[derive(Deserialize)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
pub struct RouteLeg {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

#[derive(Deserialize)]
pub struct RouteStep {
    pub distance: f64,
    pub duration: f64,
    pub geometry: LineString,
    #[serde(default)]
    pub name: String,
    pub maneuver: StepManeuver,
}

#[derive(Deserialize)]
pub struct StepManeuver {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
    pub location: [f64; 2],
    #[serde(default)]
    pub instruction: String,
}

pub(crate) fn seconds(value: f64) -> SignedDuration {
    SignedDuration::try_from_secs_f64(value).unwrap_or(SignedDuration::ZERO)
}

fn to_lat_lons(line: LineString) -> Vec<LatLon> {
    line.coordinates
        .into_iter()
        .map(LatLon::from_lon_lat)
        .collect()
}

impl From<RouteStep> for Step {
    fn from(step: RouteStep) -> Self {
        Step {
            distance: Meters::new(step.distance),
            duration: seconds(step.duration),
            geometry: to_lat_lons(step.geometry),
            name: step.name,
            maneuver: Maneuver {
                kind: ManeuverType::parse(&step.maneuver.kind),
                modifier: step
                    .maneuver
                    .modifier
                    .as_deref()
                    .map(ManeuverModifier::parse),
                location: LatLon::from_lon_lat(step.maneuver.location),
                instruction: step.maneuver.instruction,
            },
        }
    }
}

impl From<DirectionsRoute> for Segment {
    fn from(route: DirectionsRoute) -> Self {
        Segment {
            distance: Meters::new(route.distance),
            duration: seconds(route.duration),
            geometry: to_lat_lons(route.geometry),
            steps: route
                .legs
                .into_iter()
                .flat_map(|leg| leg.steps)
                .map(Step::from)
                .collect(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::meters::Meters;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate from the `[lon, lat]` pair used by GeoJSON and the
    /// directions service.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lon: pair[0],
        }
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn haversine_distance(&self, to: &LatLon) -> Meters {
        haversine_distance(*self, *to)
    }
}

impl From<LatLon> for geo_types::Point {
    fn from(value: LatLon) -> Self {
        geo_types::Point::new(value.lon, value.lat)
    }
}

impl From<&LatLon> for geo_types::Point {
    fn from(value: &LatLon) -> Self {
        geo_types::Point::new(value.lon, value.lat)
    }
}

impl From<geo_types::Point> for LatLon {
    fn from(point: geo_types::Point) -> Self {
        LatLon {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

pub fn haversine_distance<P>(from: P, to: P) -> Meters
where
    P: Into<geo_types::Point>,
{
    let from: geo_types::Point = from.into();
    let to: geo_types::Point = to.into();

    let lat1_rad = from.y().to_radians();
    let lon1_rad = from.x().to_radians();
    let lat2_rad = to.y().to_radians();
    let lon2_rad = to.x().to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Meters::new(EARTH_RADIUS_METERS * c)
}

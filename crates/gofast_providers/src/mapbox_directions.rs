use std::{fmt::Display, time::Duration};

use gofast_tracker::{lat_lon::LatLon, segment::Segment, sources::DirectionsSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::mapbox_types::DirectionsResponse;

pub const MAPBOX_DIRECTIONS_API_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";
pub const MAPBOX_ACCESS_TOKEN_ENV_VAR: &str = "MAPBOX_ACCESS_TOKEN";

#[derive(Deserialize, Serialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MapboxProfile {
    #[default]
    Driving,
    DrivingTraffic,
    Walking,
    Cycling,
}

impl Display for MapboxProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MapboxProfile::Driving => "driving",
                MapboxProfile::DrivingTraffic => "driving-traffic",
                MapboxProfile::Walking => "walking",
                MapboxProfile::Cycling => "cycling",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum MapboxError {
    #[error("{0} is not set")]
    MissingAccessToken(&'static str),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("No route found: {0}")]
    NoRoute(String),
}

pub struct MapboxDirectionsClientParams {
    pub access_token: String,
    pub profile: MapboxProfile,
    pub base_url: String,
    pub timeout: Duration,
}

impl MapboxDirectionsClientParams {
    pub fn from_env() -> Result<Self, MapboxError> {
        let access_token = std::env::var(MAPBOX_ACCESS_TOKEN_ENV_VAR)
            .map_err(|_| MapboxError::MissingAccessToken(MAPBOX_ACCESS_TOKEN_ENV_VAR))?;

        Ok(Self {
            access_token,
            profile: MapboxProfile::default(),
            base_url: MAPBOX_DIRECTIONS_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        })
    }
}

pub struct MapboxDirectionsClient {
    params: MapboxDirectionsClientParams,
    client: reqwest::Client,
}

pub fn directions_url(base_url: &str, profile: MapboxProfile, from: LatLon, to: LatLon) -> String {
    format!(
        "{}/{}/{},{};{},{}",
        base_url.trim_end_matches('/'),
        profile,
        from.lon,
        from.lat,
        to.lon,
        to.lat
    )
}

/// Turns a directions response into the segment of its best route.
pub fn parse_directions(response: DirectionsResponse) -> Result<Segment, MapboxError> {
    if response.code != "Ok" {
        return Err(MapboxError::NoRoute(
            response.message.unwrap_or(response.code),
        ));
    }

    response
        .routes
        .into_iter()
        .next()
        .map(Segment::from)
        .ok_or_else(|| MapboxError::NoRoute("response contains no routes".to_string()))
}

impl MapboxDirectionsClient {
    pub fn new(params: MapboxDirectionsClientParams) -> Result<Self, MapboxError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;
        Ok(Self { params, client })
    }

    #[instrument(skip(self))]
    pub async fn fetch_route(&self, from: LatLon, to: LatLon) -> Result<Segment, MapboxError> {
        let url = directions_url(&self.params.base_url, self.params.profile, from, to);

        let response = self
            .client
            .get(url)
            .query(&[
                ("alternatives", "false"),
                ("geometries", "geojson"),
                ("steps", "true"),
                ("overview", "full"),
                ("access_token", self.params.access_token.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(MapboxError::Api { status, message });
        }

        let body: DirectionsResponse = response.json().await?;
        let segment = parse_directions(body)?;

        debug!(
            steps = segment.steps.len(),
            "Mapbox: fetched segment of {}", segment.distance
        );

        Ok(segment)
    }
}

impl DirectionsSource for MapboxDirectionsClient {
    async fn fetch_segment(&self, from: LatLon, to: LatLon) -> anyhow::Result<Segment> {
        Ok(self.fetch_route(from, to).await?)
    }
}

use anyhow::Context;
use gofast_tracker::lat_lon::LatLon;

pub const WAREHOUSE_LATITUDE_ENV_VAR: &str = "WAREHOUSE_LATITUDE";
pub const WAREHOUSE_LONGITUDE_ENV_VAR: &str = "WAREHOUSE_LONGITUDE";

const DEFAULT_WAREHOUSE: LatLon = LatLon {
    lat: 10.8453773,
    lon: 106.794445,
};

fn read_coordinate(name: &str, default: f64) -> Result<f64, anyhow::Error> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} is not a number: {value}")),
        Err(_) => Ok(default),
    }
}

/// Where every run ends, from `WAREHOUSE_LATITUDE` / `WAREHOUSE_LONGITUDE`.
pub fn warehouse() -> Result<LatLon, anyhow::Error> {
    Ok(LatLon::new(
        read_coordinate(WAREHOUSE_LATITUDE_ENV_VAR, DEFAULT_WAREHOUSE.lat)?,
        read_coordinate(WAREHOUSE_LONGITUDE_ENV_VAR, DEFAULT_WAREHOUSE.lon)?,
    ))
}

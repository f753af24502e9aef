use gofast_tracker::lat_lon::LatLon;
use jiff::SpanRelativeTo;

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(String::from("Invalid duration"))
}

/// Parses `"lat,lon"`, e.g. `10.8453773,106.794445`.
pub fn parse_lat_lon(input: &str) -> Result<LatLon, String> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| String::from("Expected a coordinate as lat,lon"))?;

    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid latitude: {lat}"))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid longitude: {lon}"))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Latitude out of range: {lat}"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Longitude out of range: {lon}"));
    }

    Ok(LatLon::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1s"), Ok(SignedDuration::from_secs(1)));
        assert_eq!(parse_duration("500ms"), Ok(SignedDuration::from_millis(500)));
        assert_eq!(parse_duration("PT2M"), Ok(SignedDuration::from_secs(120)));
        assert_eq!(parse_duration("3"), Ok(SignedDuration::from_secs(3)));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_parse_lat_lon() {
        assert_eq!(
            parse_lat_lon("10.8453773, 106.794445"),
            Ok(LatLon::new(10.8453773, 106.794445))
        );
        assert!(parse_lat_lon("10.84").is_err());
        assert!(parse_lat_lon("north,106.79").is_err());
        assert!(parse_lat_lon("95.0,106.79").is_err());
    }
}

use clap::Args;
use gofast_providers::mapbox_directions::{
    MapboxDirectionsClient, MapboxDirectionsClientParams, MapboxProfile,
};
use gofast_tracker::{instruction::render_turn_panel, lat_lon::LatLon};
use tracing::info;

use crate::parsers;

#[derive(Args)]
pub struct DirectionsArgs {
    #[arg(long, value_parser = parsers::parse_lat_lon)]
    from: LatLon,

    #[arg(long, value_parser = parsers::parse_lat_lon)]
    to: LatLon,

    /// Use live traffic for durations
    #[arg(long)]
    traffic: bool,
}

pub async fn run(args: DirectionsArgs) -> Result<(), anyhow::Error> {
    let mut params = MapboxDirectionsClientParams::from_env()?;
    if args.traffic {
        params.profile = MapboxProfile::DrivingTraffic;
    }

    let client = MapboxDirectionsClient::new(params)?;
    let segment = client.fetch_route(args.from, args.to).await?;

    info!(
        "Segment: {} in {:#}, {} steps",
        segment.distance,
        segment.duration,
        segment.steps.len()
    );

    match render_turn_panel(&segment.steps, 0, None) {
        Some(panel) => {
            for (index, step) in panel.steps.iter().enumerate() {
                println!("{:>3}. {}", index + 1, step.text);
            }
        }
        None => println!("No turn-by-turn instructions for this segment"),
    }

    Ok(())
}

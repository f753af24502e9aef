use std::path::PathBuf;

use clap::Args;
use gofast_providers::{
    mapbox_directions::{MapboxDirectionsClient, MapboxDirectionsClientParams},
    route_optimizer_client::{RouteOptimizerClient, RouteOptimizerClientParams},
    trace_location::TraceLocationSource,
};
use gofast_tracker::{
    lat_lon::LatLon,
    meters::Meters,
    position::PositionReader,
    progress_tracker::RunPhase,
    session::{DeliverySession, Notice, RunRequest, SessionParams, SessionView},
    sources::WatchOptions,
    tracker_config::TrackerConfig,
};
use tracing::{debug, info};

use crate::{env, orders::OrdersFile, parsers};

#[derive(Args)]
pub struct RunArgs {
    /// JSON file with the orders to deliver
    #[arg(short, long)]
    orders: PathBuf,

    /// Recorded position trace to replay (JSON array of samples)
    #[arg(short, long)]
    trace: PathBuf,

    /// Where the run starts, as lat,lon (default: the first trace fix)
    #[arg(long, value_parser = parsers::parse_lat_lon)]
    origin: Option<LatLon>,

    /// Delay between replayed samples (e.g., "1s", "250ms")
    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "1s")]
    interval: jiff::SignedDuration,

    /// Samples closer than this to the previous one are dropped, in meters
    #[arg(long, default_value_t = 5.0)]
    min_displacement: f64,

    /// Distance to a maneuver point that advances the step, in meters
    #[arg(long, default_value_t = 15.0)]
    near_threshold: f64,

    /// Distance to the end of a turn that settles onto the next step, in meters
    #[arg(long, default_value_t = 10.0)]
    post_turn_threshold: f64,

    /// Move to the next stop on arrival without waiting for input
    #[arg(long)]
    auto_advance: bool,
}

/// Text of the instruction the driver should follow now.
fn active_instruction(view: &SessionView) -> Option<String> {
    view.run
        .turn_panel
        .as_ref()
        .and_then(|panel| panel.active())
        .map(|step| step.text.clone())
}

/// Whether the driver is within `near` of the stop the current segment leads to.
fn has_arrived(view: &SessionView, positions: &PositionReader, near: Meters) -> bool {
    if !view.run.can_advance {
        return false;
    }

    view.run
        .stops
        .get(view.run.stop_index + 1)
        .zip(positions.latest())
        .is_some_and(|(stop, position)| position.distance_to(&stop.position) < near)
}

pub async fn run(args: RunArgs) -> Result<(), anyhow::Error> {
    let orders_file = OrdersFile::from_file(&args.orders)?;
    let trace = TraceLocationSource::from_file(&args.trace)?;
    info!("Replaying {} samples from {:?}", trace.len(), args.trace);

    let tracker = TrackerConfig {
        near_threshold: Meters::new(args.near_threshold),
        post_turn_threshold: Meters::new(args.post_turn_threshold),
    };
    let near = tracker.near_threshold;

    let params = SessionParams {
        tracker,
        watch: WatchOptions {
            min_interval: args.interval,
            min_displacement: Meters::new(args.min_displacement),
        },
        run: RunRequest {
            orders: orders_file.orders(),
            depot: env::warehouse()?,
            origin: args.origin,
            weights: orders_file.weights(),
        },
    };

    let directions = MapboxDirectionsClient::new(MapboxDirectionsClientParams::from_env()?)?;
    let optimizer = RouteOptimizerClient::new(RouteOptimizerClientParams::from_env())?;

    let mut session = DeliverySession::spawn(directions, optimizer, &trace, params);
    let mut view = session.view();
    let positions = session.positions();

    let mut last_instruction: Option<String> = None;
    // Stop index for which an advance was already requested
    let mut advanced_from: Option<usize> = None;

    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }

                let current = view.borrow_and_update().clone();
                debug!(
                    stop = current.run.stop_index,
                    step = current.run.step_index,
                    "Session updated"
                );

                let instruction = active_instruction(&current);
                if instruction.is_some() && instruction != last_instruction {
                    if let Some(text) = &instruction {
                        println!("[stop {}] {}", current.run.stop_index, text);
                    }
                    last_instruction = instruction;
                }

                if current.run.phase == RunPhase::Completed {
                    break;
                }

                if args.auto_advance
                    && advanced_from != Some(current.run.stop_index)
                    && has_arrived(&current, &positions, near)
                {
                    advanced_from = Some(current.run.stop_index);
                    session.advance_to_next_stop()?;
                }
            }
            notice = session.next_notice() => {
                let Some(notice) = notice else {
                    break;
                };

                println!("! {notice}");
                if matches!(notice, Notice::RunCompleted | Notice::LocationStreamEnded) {
                    break;
                }
            }
        }
    }

    let summary = session.snapshot();
    info!(
        "Run {:?}: {} segments driven, stopped at stop {} of {}",
        summary.run.phase,
        summary.run.completed_segments,
        summary.run.stop_index,
        summary.run.stops.len()
    );

    session.shutdown().await?;

    Ok(())
}

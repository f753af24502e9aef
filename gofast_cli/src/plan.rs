use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;
use gofast_providers::route_optimizer_client::{RouteOptimizerClient, RouteOptimizerClientParams};
use gofast_tracker::{
    lat_lon::LatLon,
    route_plan::{OptimizeRequest, RoutePlan},
};
use tracing::info;

use crate::{env, orders::OrdersFile, parsers};

#[derive(Args)]
pub struct PlanArgs {
    /// JSON file with the orders to deliver
    #[arg(short, long)]
    orders: PathBuf,

    /// Where the run starts, as lat,lon (default: the warehouse)
    #[arg(long, value_parser = parsers::parse_lat_lon)]
    origin: Option<LatLon>,
}

pub fn plan_table(plan: &RoutePlan) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "#", "Type", "Order", "Latitude", "Longitude", "Leg time", "Leg distance",
    ]);

    for (index, stop) in plan.stops.iter().enumerate() {
        let leg = plan.legs.iter().find(|leg| leg.to == index);
        table.add_row(vec![
            index.to_string(),
            stop.kind.to_string(),
            stop.order_ref
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            format!("{:.6}", stop.position.lat),
            format!("{:.6}", stop.position.lon),
            leg.map(|leg| format!("{:#}", leg.duration))
                .unwrap_or_default(),
            leg.map(|leg| leg.distance.to_string()).unwrap_or_default(),
        ]);
    }

    table
}

pub async fn run(args: PlanArgs) -> Result<(), anyhow::Error> {
    let orders_file = OrdersFile::from_file(&args.orders)?;
    let depot = env::warehouse()?;

    let request = OptimizeRequest {
        orders: orders_file.orders(),
        origin: args.origin.unwrap_or(depot),
        depot,
        weights: orders_file.weights(),
    };

    let client = RouteOptimizerClient::new(RouteOptimizerClientParams::from_env())?;
    let plan = client.optimize_route(&request).await?;

    println!("{}", plan_table(&plan));
    info!(
        "Predicted time: {:#}, distance: {}",
        plan.total_predicted_time,
        plan.total_distance
            .map(|distance| distance.to_string())
            .unwrap_or_else(|| String::from("unknown"))
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use gofast_tracker::{
        meters::Meters,
        route_plan::PlanLeg,
        stop::{OrderId, Stop},
    };
    use jiff::SignedDuration;

    use super::*;

    #[test]
    fn test_plan_table() {
        let mut plan = RoutePlan::new(vec![
            Stop::current_location(LatLon::new(10.8, 106.7)),
            Stop::order(OrderId::new("ORD-1"), LatLon::new(10.85, 106.77)),
            Stop::warehouse(LatLon::new(10.8453773, 106.794445)),
        ]);
        plan.legs = vec![PlanLeg {
            from: 0,
            to: 1,
            duration: SignedDuration::from_secs(480),
            distance: Meters::new(4620.0),
        }];

        let rendered = plan_table(&plan).to_string();

        assert!(rendered.contains("current_location"));
        assert!(rendered.contains("ORD-1"));
        assert!(rendered.contains("4620m"));
        assert!(rendered.contains("warehouse"));
    }
}

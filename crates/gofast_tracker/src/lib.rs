pub mod fetch_gate;
pub mod instruction;
pub mod lat_lon;
pub mod maneuver;
pub mod meters;
pub mod position;
pub mod progress_tracker;
pub mod route_plan;
pub mod segment;
pub mod session;
pub mod sources;
pub mod stop;
pub mod tracker_config;

pub mod mapbox_directions;
pub mod mapbox_types;
pub mod route_optimizer_client;
pub mod route_optimizer_types;
pub mod trace_location;

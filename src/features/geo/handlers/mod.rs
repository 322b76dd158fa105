mod geo_handler;

pub use geo_handler::*;

pub mod health_collector;
pub mod health_sources;
pub mod health_standard;

// Library for tests to access modules

pub mod aggregation;
pub mod config;
pub mod correlation;
pub mod dashboard;
pub mod duration;
pub mod error;
pub mod loader;
pub mod models;
pub mod routes;
pub mod version;

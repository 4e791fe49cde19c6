pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod driver;
pub mod error;
pub mod forms;
pub mod model;
pub mod timer;

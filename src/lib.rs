pub mod api;
pub mod audit;
pub mod config;
pub mod core;
pub mod explain;
pub mod reports;
pub mod ussd;

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Pure matching engine and report structures
pub mod matching;
pub mod model;
pub mod report;

// Use cases and the controller adapter behind them
pub mod app;
pub mod infra;

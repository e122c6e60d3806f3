// The binary in main.rs drives the terminal; everything else lives here so
// integration tests can reach it.

pub mod app;
pub mod config;
pub mod event;
pub mod puzzle;
pub mod session;
pub mod store;
pub mod trainer;
pub mod ui;

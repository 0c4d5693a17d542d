//! CLI library components for the ticdat driver.

pub mod commands;
pub mod logging;
pub mod summary;

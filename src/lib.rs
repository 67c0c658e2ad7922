//! Firebase Test Lab build step
//!
//! Authenticates the Cloud SDK with a service-account key taken from the
//! environment, assembles the Test Lab arguments for a robo or
//! instrumentation run, and publishes the results location for later steps.

pub mod args;
pub mod common;
pub mod config;
pub mod export;
pub mod naming;
pub mod runner;
pub mod step;

pub use common::{Error, Result};
pub use config::Config;

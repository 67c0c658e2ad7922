//! Common utilities shared by every stage of the step

pub mod error;
pub mod logging;

pub use error::{Error, Result};

//! # Timeblock - Slovenian network tariff time-block sensor
//!
//! Determines which tariff time block (1-5) applies at a moment of local
//! wall-clock time and publishes it, together with the context that led to
//! it, as a periodically refreshed sensor reading.
//!
//! ## Architecture
//!
//! - `holiday`: public holiday calendar (fixed dates and Easter-relative dates)
//! - `block`: season, workday and band logic mapping a timestamp to a block
//! - `sensor`: clock abstraction and the refresh loop publishing readings
//! - `web`: HTTP API over the published state
//! - `config`: YAML configuration with validation
//! - `logging`: structured logging and tracing
//! - `error`: error types
//!
//! The `holiday` and `block` modules are pure and have no dependency on the
//! host-facing modules.

pub mod block;
pub mod config;
pub mod error;
pub mod holiday;
pub mod logging;
pub mod sensor;
#[cfg(feature = "web")]
pub mod web;

#[cfg(all(test, feature = "web"))]
mod web_tests;

// Re-export commonly used types
pub use block::{TimeBlockReading, classify, classify_checked};
pub use config::Config;
pub use error::{Result, TimeBlockError};
pub use holiday::is_holiday;
pub use sensor::{Clock, SystemClock, TimeBlockSensor};

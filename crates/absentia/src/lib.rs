//! `absentia` - A terminal dashboard for school-district chronic-absenteeism rates
//!
//! This library loads a static district dataset once at startup, filters it
//! by name as the user types, and renders one selected district's multi-year
//! rate history as a line chart and a table.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod history;
pub mod logging;
pub mod search;
pub mod ui;

pub use config::Config;
pub use dataset::{Dataset, DistrictRecord, YearPeriod, YEAR_PERIODS};
pub use error::{Error, Result};
pub use history::RateHistory;
pub use logging::init_logging;

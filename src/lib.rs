//! Backend for the weather-station monitoring dashboard.
//!
//! Stations push timestamped temperature, humidity and rainfall readings;
//! the dashboard reads them back raw, per minute, or bucketed by hour with
//! the derived Delta T spraying indicator.
//!
//! Module layout follows the Explicit Module Boundary Pattern (EMBP):
//! - [`config`] loads the immutable runtime configuration
//! - [`schema`] and [`store`] own everything SQL
//! - [`delta_t`], [`aggregate`] and [`window`] are pure computation
//! - [`routes`] is the single gateway exposing the HTTP surface

pub mod aggregate;
pub mod config;
pub mod delta_t;
pub mod error;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;
pub mod window;

pub use config::Config;
pub use error::InputError;
pub use models::{AggregatedPoint, AggregationReport, MinuteRow, Reading};

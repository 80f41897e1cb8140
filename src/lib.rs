//! Literary prize records: a batch cleaner that normalizes raw records into a
//! flat table, and a filter/aggregate engine that turns that table plus a
//! filter state into the views a dashboard draws.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;

pub use data::aggregate::{compute_views, Views};
pub use data::filter::{Choice, FilterState};
pub use data::model::{Category, PrizeEntry, PrizeTable, RoleSimple};
pub use error::{Error, Result};

//! Load, filter and summarize folders of scraped bus route CSV files.
//!
//! The `data` module is UI-free; the `redbus-dashboard` binary renders it
//! with egui.

pub mod config;
pub mod data;

pub use data::filter::{FilterSelection, Membership, PriceRange};
pub use data::loader::LoadError;
pub use data::model::{BusTable, Cell};
pub use data::summary::Summary;
pub use data::view::{compute_view, DashboardView, ViewOptions};

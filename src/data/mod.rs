//! Data layer: core types, loading, caching, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!   data dir/*.csv
//!        │
//!        ▼
//!   ┌──────────┐      ┌────────────┐
//!   │  loader   │ ◄─── │   cache    │  (dir → table, TTL, refresh)
//!   └──────────┘      └────────────┘
//!        │ BusTable
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSelection → filtered BusTable
//!   └──────────┘
//!        │
//!        ├──────────────┬──────────────┐
//!        ▼              ▼              ▼
//!   ┌─────────┐   ┌──────────┐   ┌──────────┐
//!   │ summary  │   │  series   │   │  export   │
//!   └─────────┘   └──────────┘   └──────────┘
//! ```
//!
//! `view::compute_view` runs filter → summary → series in one call.

pub mod cache;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod series;
pub mod summary;
pub mod view;

/// Data layer: record types, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  raw .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  normalize rows → prizes_clean.csv
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ PrizeTable │  loaded once, read-only
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  filter   │ ──▶ │ aggregate │  filtered subset → Views
///   └──────────┘     └───────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;

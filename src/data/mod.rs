/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (all-or-nothing)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  start_year ≤ year ≤ end_year → FilteredDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  total series, state totals, scatter, stacked
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

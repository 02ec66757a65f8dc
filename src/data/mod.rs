/// Data layer: record model, retrieval, filtering and sorting.
///
/// Architecture:
/// ```text
///  HTTP API / .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────────────┐
///   │ fetch / loader   │  provider → Vec<Record> (background thread)
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ view             │  raw records + FilterSpec + SortSpec
///   └──────────────────┘
///        │ recompute
///        ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │ → │  sort     │ → derived view
///   └──────────┘   └──────────┘
/// ```

pub mod fetch;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sort;
pub mod view;

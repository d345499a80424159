/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .tsv / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (one inferred type per column)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Table   │  Vec<Column>, typed columnar storage
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply threshold predicate → derived Table
///   └──────────┘
/// ```
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

/// Data layer: core types, loading, filtering, correlation and export.
///
/// Architecture:
/// ```text
///   .csv bytes (UTF-8 or CP949)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  selected columns → NumericSubset (all-missing rows dropped)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ correlation  │  Pearson / Spearman matrix, threshold mask, strong pairs
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  NumericSubset → correlation_data.csv (with BOM)
///   └──────────┘
/// ```

pub mod correlation;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

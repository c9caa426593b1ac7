/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .ods / CSV exports
///        │
///        ▼
///   ┌──────────┐
///   │  sheet    │  read sheets → RawSheet (headers + untyped cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  rename, tag Exif, parse ranges → LensCatalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  LensQuery → matching indices
///   └──────────┘
/// ```
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sheet;

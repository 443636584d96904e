//! Cross-module tests for the projection pipeline
//!
//! Tests are organized by topic:
//! - `end_to_end` - Loader through aggregator on small fixed inputs
//! - `properties` - Reproducibility and ordering guarantees
//! - `loaders` - CSV directory and file parsing against real files

mod end_to_end;
mod loaders;
mod properties;

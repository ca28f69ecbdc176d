//! Table loaders feeding SQLite table creation.
//!
//! A [`TableLoader`] turns a JSON or YAML source into [`TableData`]: a
//! validated table name, headers, and rows ready for the record convertor.
//! All loaders of a run share one [`TableCounter`] that tracks how many
//! tables were materialized, globally and per format.
//!
//! Batch runs are described by a YAML [`LoadPlan`].
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use simplesqlite_loader::{Format, LoaderSource, TableCounter, TableLoader, loader_for};
//!
//! let counter = Arc::new(TableCounter::new());
//! let source = LoaderSource::Text("tags:\n  - [id, tag]\n  - [1, rust]\n".into());
//! let loader = loader_for(Format::Yaml, source, Arc::clone(&counter));
//!
//! let tables = loader.load().unwrap();
//! assert_eq!(tables[0].table_name, "tags");
//! assert_eq!(counter.global_count(), 1);
//! ```

mod config;
mod counter;
mod error;
mod json;
mod loader;
mod yaml;

pub use config::{LoadPlan, SourceConfig};
pub use counter::{CounterSnapshot, TableCounter};
pub use error::{LoaderError, Result};
pub use json::JsonTableLoader;
pub use loader::{
    DEFAULT_TABLE_NAME_TEMPLATE, Format, LoaderSource, TableData, TableLoader, loader_for,
    loader_with_template,
};
pub use yaml::YamlTableLoader;

//! Load plan configuration.
//!
//! A load plan names a database, an overwrite policy and a list of source
//! files to materialize into it.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! database: data.sqlite
//! if_exists: replace
//! sources:
//!   - path: users.json
//!     table_name: users
//!     index_attrs: [id]
//!   - path: tables.yml
//!     format: yaml
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use simplesqlite_core::IfExists;

use crate::error::{LoaderError, Result};
use crate::loader::{DEFAULT_TABLE_NAME_TEMPLATE, Format};

/// One file to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// File to read; relative paths resolve against the plan's directory.
    pub path: PathBuf,
    /// Explicit format; inferred from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    /// Table name template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Attributes to index on every table from this source.
    #[serde(default)]
    pub index_attrs: Vec<String>,
}

impl SourceConfig {
    /// Creates a source entry with inferred format and default naming.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            table_name: None,
            index_attrs: Vec::new(),
        }
    }

    /// The explicit format, or the one implied by the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidSource`] if neither is available.
    pub fn resolved_format(&self) -> Result<Format> {
        self.format
            .or_else(|| Format::from_path(&self.path))
            .ok_or_else(|| {
                LoaderError::InvalidSource(format!(
                    "cannot infer format of {}; set `format`",
                    self.path.display()
                ))
            })
    }

    /// The table name template, or the default one.
    pub fn table_name_template(&self) -> &str {
        self.table_name
            .as_deref()
            .unwrap_or(DEFAULT_TABLE_NAME_TEMPLATE)
    }
}

/// A complete load run.
///
/// # Examples
///
/// ```no_run
/// use simplesqlite_loader::LoadPlan;
///
/// let plan = LoadPlan::load("load.yml").unwrap();
/// for source in &plan.sources {
///     println!("{} -> {}", source.path.display(), plan.database.display());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPlan {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Target database file.
    pub database: PathBuf,
    /// Policy for tables that already exist.
    pub if_exists: IfExists,
    /// Files to load, in order.
    pub sources: Vec<SourceConfig>,
}

impl LoadPlan {
    /// Loads a plan from a YAML file and resolves its relative paths against
    /// the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::LoaderError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut plan: LoadPlan = serde_yaml::from_reader(reader)?;
        if let Some(base) = path.parent() {
            plan.resolve_paths(base);
        }
        Ok(plan)
    }

    /// Saves the plan as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::LoaderError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Rewrites relative database and source paths to live under `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.database.is_relative() {
            self.database = base.join(&self.database);
        }
        for source in &mut self.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }
}

impl FromStr for LoadPlan {
    type Err = LoaderError;

    /// Parses a plan from YAML text; paths are left as written.
    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

//! YAML table loader.
//!
//! YAML documents are read into the same generic document model as JSON,
//! so the accepted table shapes are identical.

use std::path::PathBuf;
use std::sync::Arc;

use crate::counter::TableCounter;
use crate::error::Result;
use crate::loader::{DocumentSource, LoaderSource, TableData, TableLoader};

/// Loads tables from a YAML document.
#[derive(Debug, Clone)]
pub struct YamlTableLoader {
    inner: DocumentSource,
}

impl YamlTableLoader {
    /// Creates a loader with the default table name template.
    pub fn new(source: LoaderSource, counter: Arc<TableCounter>) -> Self {
        Self {
            inner: DocumentSource::new(source, counter),
        }
    }

    /// Creates a loader reading a YAML file.
    pub fn from_file(path: impl Into<PathBuf>, counter: Arc<TableCounter>) -> Self {
        Self::new(LoaderSource::File(path.into()), counter)
    }

    /// Creates a loader over in-memory YAML text.
    pub fn from_text(text: impl Into<String>, counter: Arc<TableCounter>) -> Self {
        Self::new(LoaderSource::Text(text.into()), counter)
    }

    /// Sets the table name template.
    pub fn with_table_name(mut self, template: impl Into<String>) -> Self {
        self.inner.table_name = template.into();
        self
    }

    /// The configured source.
    pub fn source(&self) -> &LoaderSource {
        &self.inner.source
    }
}

impl TableLoader for YamlTableLoader {
    fn format_name(&self) -> &'static str {
        "yaml"
    }

    fn validate(&self) -> Result<()> {
        self.inner.validate()
    }

    fn load(&self) -> Result<Vec<TableData>> {
        self.validate()?;
        let text = self.inner.source.read()?;
        let document: serde_json::Value = serde_yaml::from_str(&text)?;
        self.inner.extract(self.format_name(), &document)
    }
}

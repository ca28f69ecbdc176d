//! JSON table loader.

use std::path::PathBuf;
use std::sync::Arc;

use crate::counter::TableCounter;
use crate::error::Result;
use crate::loader::{DocumentSource, LoaderSource, TableData, TableLoader};

/// Loads tables from a JSON document.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use simplesqlite_loader::{JsonTableLoader, TableCounter, TableLoader};
///
/// let counter = Arc::new(TableCounter::new());
/// let loader = JsonTableLoader::from_text(
///     r#"[{"id": 1, "name": "alice"}, {"id": 2, "name": "bob"}]"#,
///     Arc::clone(&counter),
/// )
/// .with_table_name("users");
///
/// let tables = loader.load().unwrap();
/// assert_eq!(tables[0].table_name, "users");
/// assert_eq!(tables[0].headers, vec!["id", "name"]);
/// assert_eq!(counter.format_count("json"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct JsonTableLoader {
    inner: DocumentSource,
}

impl JsonTableLoader {
    /// Creates a loader with the default table name template.
    pub fn new(source: LoaderSource, counter: Arc<TableCounter>) -> Self {
        Self {
            inner: DocumentSource::new(source, counter),
        }
    }

    /// Creates a loader reading a JSON file.
    pub fn from_file(path: impl Into<PathBuf>, counter: Arc<TableCounter>) -> Self {
        Self::new(LoaderSource::File(path.into()), counter)
    }

    /// Creates a loader over in-memory JSON text.
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

impl TableLoader for JsonTableLoader {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn validate(&self) -> Result<()> {
        self.inner.validate()
    }

    fn load(&self) -> Result<Vec<TableData>> {
        self.validate()?;
        let text = self.inner.source.read()?;
        let document: serde_json::Value = serde_json::from_str(&text)?;
        self.inner.extract(self.format_name(), &document)
    }
}

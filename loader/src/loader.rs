//! Loader contract, sources and the shared table extraction logic.
//!
//! Every format (see [`Format`]) parses its source into a generic document
//! and hands it to the same extraction step, so JSON and YAML accept exactly
//! the same shapes:
//!
//! - an array of objects: one table, headers are the sorted union of keys;
//! - an array of arrays: one table, the first array is the header row;
//! - an object whose values are arrays of either kind: one table per key.
//!
//! # Table names
//!
//! Names come from a template with these placeholders:
//!
//! | Placeholder     | Replaced by                                        |
//! |-----------------|----------------------------------------------------|
//! | `{filename}`    | file stem of a file source, empty for text sources |
//! | `{key}`         | table key of a multi-table document, else empty    |
//! | `{format_name}` | the loader's format name (`json`, `yaml`)          |
//! | `{default}`     | `{key}` if present, else `{filename}` for files, else `{format_name}` followed by the global table count |
//!
//! The resolved name is validated as a table name.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use simplesqlite_core::{Row, Value, to_records, validate_table_name};
use tracing::{debug, info};

use crate::counter::TableCounter;
use crate::error::{LoaderError, Result};
use crate::json::JsonTableLoader;
use crate::yaml::YamlTableLoader;

/// Template used when no table name is configured.
pub const DEFAULT_TABLE_NAME_TEMPLATE: &str = "{default}";

/// A source of table data in some format.
pub trait TableLoader {
    /// Short lowercase format name, also used as the counter key.
    fn format_name(&self) -> &'static str;

    /// Checks the source and table name template without parsing anything.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::EmptyTableName`] if the template is blank.
    /// - [`LoaderError::InvalidSource`] if the source is blank or the file
    ///   does not exist.
    fn validate(&self) -> Result<()>;

    /// Parses the source into tables.
    ///
    /// Each returned table has been counted on the loader's
    /// [`TableCounter`].
    fn load(&self) -> Result<Vec<TableData>>;
}

/// One table worth of loaded data.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    /// Resolved, validated table name.
    pub table_name: String,
    /// Column names in table order.
    pub headers: Vec<String>,
    /// Rows, either positional or keyed by header.
    pub rows: Vec<Row>,
}

impl TableData {
    /// Creates table data from its parts.
    pub fn new(table_name: impl Into<String>, headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            table_name: table_name.into(),
            headers,
            rows,
        }
    }

    /// Aligns every row to the headers.
    ///
    /// # Errors
    ///
    /// Propagates [`DataError`](simplesqlite_core::DataError) from record
    /// normalization.
    pub fn to_data_matrix(&self) -> simplesqlite_core::Result<Vec<Vec<Value>>> {
        to_records(Some(self.headers.as_slice()), Some(self.rows.as_slice()))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where a loader reads its document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderSource {
    /// A file on disk.
    File(PathBuf),
    /// In-memory document text.
    Text(String),
}

impl LoaderSource {
    /// Checks that the source can be read.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidSource`] for blank text, a blank path,
    /// or a path that is not an existing file.
    pub fn validate(&self) -> Result<()> {
        match self {
            LoaderSource::Text(text) if text.trim().is_empty() => {
                Err(LoaderError::InvalidSource("data source is empty".into()))
            }
            LoaderSource::Text(_) => Ok(()),
            LoaderSource::File(path) if path.as_os_str().is_empty() => {
                Err(LoaderError::InvalidSource("data source is empty".into()))
            }
            LoaderSource::File(path) if !path.is_file() => Err(LoaderError::InvalidSource(
                format!("file not found: {}", path.display()),
            )),
            LoaderSource::File(_) => Ok(()),
        }
    }

    /// Reads the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::IoError`] if the file cannot be read.
    pub fn read(&self) -> Result<String> {
        match self {
            LoaderSource::File(path) => Ok(std::fs::read_to_string(path)?),
            LoaderSource::Text(text) => Ok(text.clone()),
        }
    }

    /// File stem of a file source.
    pub fn file_stem(&self) -> Option<&str> {
        match self {
            LoaderSource::File(path) => path.file_stem().and_then(|s| s.to_str()),
            LoaderSource::Text(_) => None,
        }
    }
}

impl fmt::Display for LoaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderSource::File(path) => write!(f, "{}", path.display()),
            LoaderSource::Text(text) => write!(f, "<text: {} bytes>", text.len()),
        }
    }
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON documents.
    Json,
    /// YAML documents.
    Yaml,
}

impl Format {
    /// Picks a format from a file extension (`.json`, `.yaml`, `.yml`).
    ///
    /// # Examples
    ///
    /// ```
    /// use simplesqlite_loader::Format;
    ///
    /// assert_eq!(Format::from_path("data/users.JSON"), Some(Format::Json));
    /// assert_eq!(Format::from_path("plan.yml"), Some(Format::Yaml));
    /// assert_eq!(Format::from_path("table.csv"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Format name as reported by the matching loader.
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("unknown format '{other}' (expected json or yaml)")),
        }
    }
}

/// Creates a loader for `format` using the default table name template.
pub fn loader_for(
    format: Format,
    source: LoaderSource,
    counter: Arc<TableCounter>,
) -> Box<dyn TableLoader + Send + Sync> {
    loader_with_template(format, source, DEFAULT_TABLE_NAME_TEMPLATE, counter)
}

/// Creates a loader for `format` with an explicit table name template.
pub fn loader_with_template(
    format: Format,
    source: LoaderSource,
    template: &str,
    counter: Arc<TableCounter>,
) -> Box<dyn TableLoader + Send + Sync> {
    match format {
        Format::Json => Box::new(JsonTableLoader::new(source, counter).with_table_name(template)),
        Format::Yaml => Box::new(YamlTableLoader::new(source, counter).with_table_name(template)),
    }
}

/// State shared by every document loader: what to read, how to name the
/// resulting tables, and where to count them.
#[derive(Debug, Clone)]
pub(crate) struct DocumentSource {
    pub(crate) source: LoaderSource,
    pub(crate) table_name: String,
    pub(crate) counter: Arc<TableCounter>,
}

impl DocumentSource {
    pub(crate) fn new(source: LoaderSource, counter: Arc<TableCounter>) -> Self {
        Self {
            source,
            table_name: DEFAULT_TABLE_NAME_TEMPLATE.to_string(),
            counter,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(LoaderError::EmptyTableName);
        }
        self.source.validate()
    }

    /// Turns a parsed document into counted, named tables.
    pub(crate) fn extract(&self, format_name: &'static str, document: &JsonValue) -> Result<Vec<TableData>> {
        let parsed = match document {
            JsonValue::Array(items) => vec![(None, parse_rows(items, "document")?)],
            JsonValue::Object(tables) if tables.is_empty() => {
                return Err(LoaderError::InvalidData("document contains no tables".into()));
            }
            JsonValue::Object(tables) => {
                let mut parsed = Vec::with_capacity(tables.len());
                for (key, value) in tables {
                    let items = value.as_array().ok_or_else(|| {
                        LoaderError::InvalidData(format!("table '{key}' must be an array of rows"))
                    })?;
                    parsed.push((Some(key.as_str()), parse_rows(items, key)?));
                }
                parsed
            }
            other => {
                return Err(LoaderError::InvalidData(format!(
                    "expected an array of rows or an object of tables, got {}",
                    json_kind(other)
                )));
            }
        };

        // Names are resolved and validated before anything is counted, so a
        // rejected table leaves the counter untouched.
        let tables = self.counter.increment_batch(format_name, parsed.len(), |first_id| {
            parsed
                .into_iter()
                .enumerate()
                .map(|(offset, (key, (headers, rows)))| {
                    let table_name = self.resolve_name(format_name, key, first_id + offset);
                    validate_table_name(&table_name).map_err(simplesqlite_core::DataError::from)?;
                    debug!(
                        table = %table_name,
                        columns = headers.len(),
                        rows = rows.len(),
                        "extracted table"
                    );
                    Ok(TableData::new(table_name, headers, rows))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        info!(
            source = %self.source,
            format = format_name,
            tables = tables.len(),
            "loaded tables"
        );
        Ok(tables)
    }

    fn resolve_name(&self, format_name: &str, key: Option<&str>, global_id: usize) -> String {
        let filename = self.source.file_stem().unwrap_or("");
        let default = match (key, self.source.file_stem()) {
            (Some(key), _) => key.to_string(),
            (None, Some(stem)) => stem.to_string(),
            (None, None) => format!("{format_name}{global_id}"),
        };
        self.table_name
            .replace("{default}", &default)
            .replace("{filename}", filename)
            .replace("{key}", key.unwrap_or(""))
            .replace("{format_name}", format_name)
            .trim()
            .to_string()
    }
}

fn parse_rows(items: &[JsonValue], label: &str) -> Result<(Vec<String>, Vec<Row>)> {
    let Some(first) = items.first() else {
        return Err(LoaderError::InvalidData(format!("{label} has no rows")));
    };

    match first {
        JsonValue::Object(_) => {
            let mut headers = BTreeSet::new();
            let mut rows = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let JsonValue::Object(object) = item else {
                    return Err(LoaderError::InvalidData(format!(
                        "{label}: row {index} is {}, expected an object",
                        json_kind(item)
                    )));
                };
                headers.extend(object.keys().cloned());
                rows.push(Row::from_json(item)?);
            }
            Ok((headers.into_iter().collect(), rows))
        }
        JsonValue::Array(header_row) => {
            if header_row.is_empty() {
                return Err(LoaderError::InvalidData(format!("{label}: header row is empty")));
            }
            let headers = header_row
                .iter()
                .map(|cell| match cell {
                    JsonValue::String(name) => Ok(name.clone()),
                    other => Err(LoaderError::InvalidData(format!(
                        "{label}: header cells must be strings, got {}",
                        json_kind(other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;

            let mut rows = Vec::with_capacity(items.len() - 1);
            for (index, item) in items.iter().enumerate().skip(1) {
                if !item.is_array() {
                    return Err(LoaderError::InvalidData(format!(
                        "{label}: row {index} is {}, expected an array",
                        json_kind(item)
                    )));
                }
                rows.push(Row::from_json(item)?);
            }
            Ok((headers, rows))
        }
        other => Err(LoaderError::InvalidData(format!(
            "{label}: rows must be objects or arrays, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

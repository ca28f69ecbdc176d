//! SQL DDL generation for inferred tables.
//!
//! Generates the `CREATE TABLE`, `CREATE INDEX` and `DROP TABLE` statements
//! the schema builder executes. Table, column and index names go through
//! [`quote_identifier`], so names that are valid but not plain identifiers
//! (spaces, non-ASCII, leading digits) still produce well-formed SQL.
//!
//! # Generated statements
//!
//! For a table `sample` with columns `a INTEGER`, `b TEXT` and an index on
//! `a`:
//!
//! ```sql
//! CREATE TABLE sample (a INTEGER, b TEXT)
//! CREATE INDEX sample_a_index ON sample(a)
//! ```
//!
//! Columns inferred as [`ColumnType::Null`](simplesqlite_core::ColumnType)
//! are declared without a type.

use simplesqlite_core::{ColumnSchema, TableSchema, quote_identifier};

/// Renders one column definition.
pub fn column_definition(column: &ColumnSchema) -> String {
    let mut definition = quote_identifier(&column.name);
    if let Some(sql_type) = column.column_type.sql_type() {
        definition.push(' ');
        definition.push_str(sql_type);
    }
    if column.not_null {
        definition.push_str(" NOT NULL");
    }
    definition
}

/// Generates a single `CREATE TABLE` statement with one definition per
/// column, in column order.
///
/// A single primary-key column is declared inline; a composite key becomes
/// a table constraint.
///
/// # Examples
///
/// ```
/// use simplesqlite_core::{ColumnSchema, ColumnType, TableSchema};
/// use simplesqlite_sqlite::create_table_sql;
///
/// let schema = TableSchema::new(
///     "my table",
///     vec![
///         ColumnSchema::new("id", ColumnType::Integer),
///         ColumnSchema::new("note", ColumnType::Null),
///     ],
/// );
/// assert_eq!(
///     create_table_sql(&schema, true),
///     "CREATE TABLE IF NOT EXISTS \"my table\" (id INTEGER, note)"
/// );
/// ```
pub fn create_table_sql(schema: &TableSchema, if_not_exists: bool) -> String {
    let primary_keys: Vec<&ColumnSchema> =
        schema.columns.iter().filter(|c| c.primary_key).collect();

    let mut definitions: Vec<String> = schema
        .columns
        .iter()
        .map(|column| {
            let mut definition = column_definition(column);
            if primary_keys.len() == 1 && column.primary_key {
                definition.push_str(" PRIMARY KEY");
            }
            definition
        })
        .collect();

    if primary_keys.len() > 1 {
        let keys = primary_keys
            .iter()
            .map(|c| quote_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
        definitions.push(format!("PRIMARY KEY ({keys})"));
    }

    format!(
        "CREATE TABLE {}{} ({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        quote_identifier(&schema.table_name),
        definitions.join(", ")
    )
}

/// Name of the single-column index on `table.attr`.
pub fn index_name(table: &str, attr: &str) -> String {
    format!("{table}_{attr}_index")
}

/// Generates the `CREATE INDEX` statement for one attribute.
///
/// Index names share one namespace per database, so two table/attribute
/// pairs can map to the same name. Without `if_not_exists` such a collision
/// is reported by the engine instead of skipping the index.
///
/// # Examples
///
/// ```
/// use simplesqlite_sqlite::create_index_sql;
///
/// assert_eq!(
///     create_index_sql("sample", "attr_a", false),
///     "CREATE INDEX sample_attr_a_index ON sample(attr_a)"
/// );
/// assert_eq!(
///     create_index_sql("sample", "attr_a", true),
///     "CREATE INDEX IF NOT EXISTS sample_attr_a_index ON sample(attr_a)"
/// );
/// ```
pub fn create_index_sql(table: &str, attr: &str, if_not_exists: bool) -> String {
    format!(
        "CREATE INDEX {}{} ON {}({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        quote_identifier(&index_name(table, attr)),
        quote_identifier(table),
        quote_identifier(attr)
    )
}

/// Generates SQL to drop a table if it exists.
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_identifier(table))
}

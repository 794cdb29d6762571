//! Schema model for ERD generation.
//!
//! This module provides:
//! - Data models for tables, fields, and keys as declared in an XMLDB file
//! - Field type classification with per-dialect display names
//! - XMLDB (`install.xml`) deserialization into the model

mod xmldb;

pub use xmldb::*;

/// XMLDB field type classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Integer types: `int`
    Integer,
    /// Fixed-point numbers: `number`
    Number,
    /// Floating point: `float`
    Float,
    /// Short strings: `char`
    Char,
    /// Blobs: `binary`
    Binary,
    /// Date/time: `datetime`
    Datetime,
    /// Long text: `text`
    Text,
    /// Any other type code
    Other(String),
}

impl FieldType {
    /// Parse an XMLDB type code into a FieldType
    pub fn from_xmldb_type(type_str: &str) -> Self {
        match type_str.trim().to_lowercase().as_str() {
            "int" | "integer" => FieldType::Integer,
            "number" => FieldType::Number,
            "float" => FieldType::Float,
            "char" => FieldType::Char,
            "binary" => FieldType::Binary,
            "datetime" => FieldType::Datetime,
            "text" => FieldType::Text,
            _ => FieldType::Other(type_str.to_string()),
        }
    }

    /// Type name used in Graphviz DOT labels
    pub fn dot_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "int",
            FieldType::Number => "number",
            FieldType::Float => "float",
            FieldType::Char => "varchar",
            FieldType::Binary => "blob",
            // Datetime shares the text label here (unlike Mermaid). Kept until
            // the intended DOT label for datetime fields is confirmed.
            FieldType::Datetime | FieldType::Text | FieldType::Other(_) => "text",
        }
    }

    /// Type name used in Mermaid erDiagram attributes
    pub fn mermaid_name(&self) -> &'static str {
        match self {
            FieldType::Integer | FieldType::Number => "INTEGER",
            FieldType::Float => "FLOAT",
            FieldType::Char => "VARCHAR",
            FieldType::Binary => "BLOB",
            FieldType::Datetime => "DATETIME",
            FieldType::Text | FieldType::Other(_) => "TEXT",
        }
    }
}

/// A field (column) definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    /// Human description, `None` when absent or empty
    pub comment: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A key definition.
///
/// `fields` and `ref_fields` are parallel: `fields[i]` references
/// `ref_fields[i]` in `ref_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub name: String,
    pub fields: Vec<String>,
    pub ref_table: Option<String>,
    pub ref_fields: Vec<String>,
}

impl Key {
    /// Key over local fields with no reference (primary/unique)
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ref_table: None,
            ref_fields: Vec::new(),
        }
    }

    /// Key referencing fields of another (or the same) table
    pub fn foreign(
        name: impl Into<String>,
        fields: &[&str],
        ref_table: impl Into<String>,
        ref_fields: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ref_table: Some(ref_table.into()),
            ref_fields: ref_fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn is_primary(&self) -> bool {
        self.name == PRIMARY_KEY_NAME
    }
}

/// Name reserved for a table's primary key
pub const PRIMARY_KEY_NAME: &str = "primary";

/// A table definition with fields and keys in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub comment: Option<String>,
    pub fields: Vec<Field>,
    pub keys: Vec<Key>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            fields: Vec::new(),
            keys: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }
}

/// A complete schema, tables kept in the order they were declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// XMLDB `PATH` attribute, e.g. `mod/book/db`
    pub path: Option<String>,
    pub comment: Option<String>,
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Get a table by exact name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }
}

//! XMLDB (`db/install.xml`) deserialization.
//!
//! Only the parts needed for diagrams are read: tables, their fields and
//! their keys. Indexes, lengths, defaults and other attributes are ignored.

use super::{Field, FieldType, Key, Schema, Table};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct XmlDocument {
    #[serde(rename = "@PATH", default)]
    path: Option<String>,
    #[serde(rename = "@COMMENT", default)]
    comment: Option<String>,
    #[serde(rename = "TABLES", default)]
    tables: XmlTables,
}

#[derive(Debug, Default, Deserialize)]
struct XmlTables {
    #[serde(rename = "TABLE", default)]
    table: Vec<XmlTable>,
}

#[derive(Debug, Deserialize)]
struct XmlTable {
    #[serde(rename = "@NAME")]
    name: String,
    #[serde(rename = "@COMMENT", default)]
    comment: Option<String>,
    #[serde(rename = "FIELDS", default)]
    fields: XmlFields,
    #[serde(rename = "KEYS", default)]
    keys: XmlKeys,
}

#[derive(Debug, Default, Deserialize)]
struct XmlFields {
    #[serde(rename = "FIELD", default)]
    field: Vec<XmlField>,
}

#[derive(Debug, Deserialize)]
struct XmlField {
    #[serde(rename = "@NAME")]
    name: String,
    #[serde(rename = "@TYPE", default)]
    field_type: String,
    #[serde(rename = "@COMMENT", default)]
    comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlKeys {
    #[serde(rename = "KEY", default)]
    key: Vec<XmlKey>,
}

#[derive(Debug, Deserialize)]
struct XmlKey {
    #[serde(rename = "@NAME")]
    name: String,
    #[serde(rename = "@FIELDS", default)]
    fields: String,
    #[serde(rename = "@REFTABLE", default)]
    ref_table: Option<String>,
    #[serde(rename = "@REFFIELDS", default)]
    ref_fields: String,
}

/// Parse XMLDB content into a Schema
pub fn parse_xmldb(content: &str) -> Result<Schema> {
    let doc: XmlDocument =
        quick_xml::de::from_str(content).context("failed to parse XMLDB document")?;

    let tables = doc
        .tables
        .table
        .into_iter()
        .map(|t| Table {
            name: t.name,
            comment: non_empty(t.comment),
            fields: t
                .fields
                .field
                .into_iter()
                .map(|f| Field {
                    name: f.name,
                    field_type: FieldType::from_xmldb_type(&f.field_type),
                    comment: non_empty(f.comment),
                })
                .collect(),
            keys: t
                .keys
                .key
                .into_iter()
                .map(|k| Key {
                    name: k.name,
                    fields: split_list(&k.fields),
                    ref_table: non_empty(k.ref_table),
                    ref_fields: split_list(&k.ref_fields),
                })
                .collect(),
        })
        .collect();

    Ok(Schema {
        path: non_empty(doc.path),
        comment: non_empty(doc.comment),
        tables,
    })
}

/// Load and parse an XMLDB file
pub fn load_xmldb(path: &Path) -> Result<Schema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let schema =
        parse_xmldb(&content).with_context(|| format!("invalid XMLDB file {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        tables = schema.len(),
        "loaded XMLDB schema"
    );
    Ok(schema)
}

/// Split an XMLDB field list (`"a, b,c"`) into trimmed names
fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

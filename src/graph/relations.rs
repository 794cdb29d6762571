//! Relationship extraction from table keys.
//!
//! Every key not named `primary` is treated as a foreign-key-like
//! relationship. Only the first field pair of a composite key is shown.

use crate::schema::{Key, Table};

/// A displayable relationship from one table field to a referenced field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship<'a> {
    /// Table holding the key
    pub table: &'a str,
    /// First local field of the key
    pub field: &'a str,
    /// Referenced table (may be outside the rendered set)
    pub ref_table: &'a str,
    /// First referenced field
    pub ref_field: &'a str,
}

impl Relationship<'_> {
    pub fn is_self_reference(&self) -> bool {
        self.table == self.ref_table
    }
}

/// Keys of a table that are not the primary key, in declaration order
pub fn foreign_keys(table: &Table) -> Vec<&Key> {
    table.keys.iter().filter(|k| !k.is_primary()).collect()
}

/// Relationships of a table that can be drawn
pub fn relationships(table: &Table) -> Vec<Relationship<'_>> {
    foreign_keys(table)
        .into_iter()
        .filter_map(|key| {
            let ref_field = key.ref_fields.first()?.as_str();
            let Some(ref_table) = key.ref_table.as_deref() else {
                tracing::warn!(
                    table = %table.name,
                    key = %key.name,
                    "key has referenced fields but no referenced table, skipping"
                );
                return None;
            };
            Some(Relationship {
                table: &table.name,
                field: key.fields.first().map(String::as_str).unwrap_or(""),
                ref_table,
                ref_field,
            })
        })
        .collect()
}

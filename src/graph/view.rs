//! Graph view with table filtering for ERD generation.

use crate::graph::relations::relationships;
use crate::schema::{Schema, Table};
use ahash::AHashSet;
use glob::Pattern;

/// The set of tables being rendered, borrowed from a schema.
///
/// Tables keep their declaration order. Anything referenced but not in
/// the view is an external table.
#[derive(Debug, Clone)]
pub struct GraphView<'a> {
    pub tables: Vec<&'a Table>,
}

impl<'a> GraphView<'a> {
    /// Create a full view of every table in the schema
    pub fn from_schema(schema: &'a Schema) -> Self {
        Self {
            tables: schema.tables.iter().collect(),
        }
    }

    /// Filter to include only tables matching the given patterns
    pub fn filter_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }
        self.tables
            .retain(|t| patterns.iter().any(|p| p.matches(&t.name)));
    }

    /// Exclude tables matching the given patterns
    pub fn exclude_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }
        self.tables
            .retain(|t| !patterns.iter().any(|p| p.matches(&t.name)));
    }

    /// Names of the tables in this view
    pub fn component_names(&self) -> AHashSet<&'a str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Referenced tables outside this view, in order of first reference
    pub fn external_tables(&self) -> Vec<&'a str> {
        let components = self.component_names();
        let mut seen = AHashSet::new();
        let mut external = Vec::new();

        for &table in &self.tables {
            for rel in relationships(table) {
                if !components.contains(rel.ref_table) && seen.insert(rel.ref_table) {
                    external.push(rel.ref_table);
                }
            }
        }
        external
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn field_count(&self) -> usize {
        self.tables.iter().map(|t| t.fields.len()).sum()
    }

    /// Number of drawable relationships
    pub fn relationship_count(&self) -> usize {
        self.tables.iter().map(|t| relationships(t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

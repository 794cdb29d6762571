//! Mermaid erDiagram format output.

use crate::graph::format::RenderOptions;
use crate::graph::relations::relationships;
use crate::graph::view::GraphView;

/// Generate Mermaid erDiagram from a graph view.
///
/// Each table's relationship lines precede its entity block. Every
/// relationship is drawn one-to-many from the referenced table.
pub fn to_mermaid(view: &GraphView, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("erDiagram\n");

    for &table in &view.tables {
        let safe_name = escape_mermaid_id(&table.name);

        for rel in relationships(table) {
            output.push_str(&format!(
                "{} ||--o{{ {} : \"{} -> {}\"\n",
                escape_mermaid_id(rel.ref_table),
                safe_name,
                escape_mermaid_label(rel.field),
                escape_mermaid_label(rel.ref_field)
            ));
        }

        output.push_str(&format!("{} {{\n", safe_name));

        if options.show_field_names {
            for field in &table.fields {
                let field_type = field.field_type.mermaid_name();
                let field_name = escape_mermaid_id(&field.name);

                match field.comment.as_deref().filter(|c| !c.is_empty()) {
                    Some(comment) => output.push_str(&format!(
                        "    {} {} \"{}\"\n",
                        field_type,
                        field_name,
                        escape_mermaid_label(comment)
                    )),
                    None => output.push_str(&format!("    {} {}\n", field_type, field_name)),
                }
            }
        }

        output.push_str("}\n");
    }

    output
}

/// Escape a string for use as a Mermaid entity ID
fn escape_mermaid_id(s: &str) -> String {
    // Mermaid IDs should be alphanumeric with underscores
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Quoted labels and comments cannot contain double quotes or newlines
fn escape_mermaid_label(s: &str) -> String {
    s.replace('"', "'").replace(['\r', '\n'], " ")
}

//! Graphviz DOT format output for ERD diagrams.

use crate::graph::format::{Layout, RenderOptions};
use crate::graph::relations::{relationships, Relationship};
use crate::graph::view::GraphView;
use crate::schema::Table;
use ahash::AHashSet;

const NODE_STYLE: &str = "        shape=none,
        margin=0,
        style=filled,
        color=\"#333333\",
        fillcolor=white,
";

/// Generate DOT format output with one HTML-labelled node per table.
///
/// Tables referenced but not part of the view are drawn as plain boxes in a
/// separate "External tables" cluster.
pub fn to_dot(view: &GraphView, options: &RenderOptions) -> String {
    let mut output = String::new();

    // Header
    output.push_str("digraph g {\n\n");
    output.push_str("    fontname=\"Helvetica,Arial,sans-serif\"\n");
    output.push_str("    nodesep=1\n");
    output.push_str("    node [\n        shape=record,\n        fontsize=9,\n        fontname=\"Helvetica\",\n    ];\n");
    output.push_str("    edge [\n        fontname=\"Helvetica,Arial,sans-serif\",\n    ]\n");

    let rankdir = match options.layout {
        Layout::LR => "LR",
        Layout::TB => "TB",
    };
    output.push_str(&format!(
        "    graph [\n        rankdir={},\n        overlap=false,\n        splines=true,\n    ];\n\n",
        rankdir
    ));
    output.push_str("    comment=\"Now all of the component tables\"\n");

    let components = view.component_names();
    let mut external_seen = AHashSet::new();
    let mut external: Vec<&str> = Vec::new();

    for &table in &view.tables {
        output.push_str(&generate_table_node(table, options.show_field_names));

        for rel in relationships(table) {
            if components.contains(rel.ref_table) {
                output.push_str(&component_edge(&rel, options.show_field_names));
            } else {
                if external_seen.insert(rel.ref_table) {
                    tracing::debug!(table = rel.ref_table, "external table referenced");
                    external.push(rel.ref_table);
                }
                output.push_str(&external_edge(&rel, options.show_field_names));
            }
        }
    }

    output.push_str("\n    subgraph cluster_component {\n");
    output.push_str("        label=\"Component tables\";\n");
    output.push_str("        style=filled;\n");
    output.push_str("        color=\"#eeeeee\";\n");
    for table in &view.tables {
        output.push_str(&format!("        {};\n", quote_dot_id(&table.name)));
    }
    output.push_str("    }\n");

    if !external.is_empty() {
        output.push_str("\n    comment=\"Now all of the external tables\"\n\n");

        for name in &external {
            output.push_str(&generate_external_node(name));
        }

        output.push_str("    subgraph cluster_external {\n");
        output.push_str("        label=\"External tables\";\n");
        output.push_str("        style=filled;\n");
        output.push_str("        color=\"#ffdd00\";\n");
        for name in &external {
            output.push_str(&format!("        {};\n", quote_dot_id(name)));
        }
        output.push_str("    }\n");
    }

    output.push_str("}\n");
    output
}

/// Node for a component table, with one row per field when enabled
fn generate_table_node(table: &Table, show_field_names: bool) -> String {
    let mut node = String::new();

    node.push_str(&format!("\n    {} [\n", escape_dot_id(&table.name)));
    node.push_str(NODE_STYLE);
    node.push_str("        label=<\n");
    node.push_str(
        "        <table border=\"0\" cellborder=\"1\" cellspacing=\"0\" cellpadding=\"2\">\n",
    );
    node.push_str(&format!(
        "            <tr><td bgcolor=\"lightblue\" colspan=\"2\">{}</td></tr>\n",
        escape_html(&table.name)
    ));

    if show_field_names {
        for field in &table.fields {
            let in_port = format!("port=\"in{}\"", escape_html(&field.name));
            let out_port = format!("port=\"out{}\"", escape_html(&field.name));
            node.push_str(&format!(
                "            <tr><td {:<30} align=\"left\">{:<10}</td><td {:<31} align=\"left\">{:<26}</td></tr>\n",
                in_port,
                field.field_type.dot_name(),
                out_port,
                escape_html(&field.name)
            ));
        }
    }

    node.push_str("        </table>>\n");
    node.push_str("    ];\n\n");
    node
}

/// Plain box for a table outside the view; its fields are unknown
fn generate_external_node(name: &str) -> String {
    let mut node = String::new();

    node.push_str(&format!("    {} [\n", escape_dot_id(name)));
    node.push_str(NODE_STYLE);
    node.push('\n');
    node.push_str("        label=<\n");
    node.push_str(
        "        <table border=\"0\" cellborder=\"1\" cellspacing=\"0\" cellpadding=\"3\">\n",
    );
    node.push_str(&format!(
        "            <tr><td port=\"{}\" bgcolor=\"orange\" colspan=\"2\">{}</td></tr>\n",
        escape_html(name),
        escape_html(name)
    ));
    node.push_str("        </table>>\n");
    node.push_str("    ];\n\n");
    node
}

fn component_edge(rel: &Relationship, show_field_names: bool) -> String {
    let from = escape_dot_id(rel.table);
    let to = escape_dot_id(rel.ref_table);

    if !show_field_names {
        return format!("    {} -> {};\n", from, to);
    }

    let to_port = escape_dot_id(&format!("in{}", rel.ref_field));
    if rel.is_self_reference() {
        // Both ends on the west side so the loop doesn't cross the table
        let from_port = escape_dot_id(&format!("in{}", rel.field));
        format!(
            "    {}:{}:w -> {}:{}:w [minlen=1];\n",
            from, from_port, to, to_port
        )
    } else {
        let from_port = escape_dot_id(&format!("out{}", rel.field));
        format!("    {}:{} -> {}:{};\n", from, from_port, to, to_port)
    }
}

fn external_edge(rel: &Relationship, show_field_names: bool) -> String {
    let from = escape_dot_id(rel.table);
    let to = escape_dot_id(rel.ref_table);

    if show_field_names {
        let from_port = escape_dot_id(&format!("out{}", rel.field));
        format!("    {}:{} -> {};\n", from, from_port, to)
    } else {
        format!("    {} -> {};\n", from, to)
    }
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a string for use as a DOT node ID
fn escape_dot_id(s: &str) -> String {
    if !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_alphanumeric() || c == '_')
    {
        s.to_string()
    } else {
        quote_dot_id(s)
    }
}

fn quote_dot_id(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, Key, Schema};

    fn create_test_schema() -> Schema {
        let mut schema = Schema::new();
        schema.add_table(
            Table::new("book")
                .with_field(Field::new("id", FieldType::Integer))
                .with_field(Field::new("name", FieldType::Char))
                .with_key(Key::new("primary", &["id"]))
                .with_key(Key::foreign("course", &["course"], "course", &["id"])),
        );
        schema.add_table(
            Table::new("book_chapters")
                .with_field(Field::new("id", FieldType::Integer))
                .with_field(Field::new("bookid", FieldType::Integer))
                .with_field(Field::new("parent", FieldType::Integer))
                .with_field(Field::new("timecreated", FieldType::Datetime))
                .with_key(Key::new("primary", &["id"]))
                .with_key(Key::foreign("bookid", &["bookid"], "book", &["id"]))
                .with_key(Key::foreign("parent", &["parent"], "book_chapters", &["id"])),
        );
        schema
    }

    fn render(schema: &Schema, show_field_names: bool) -> String {
        let view = GraphView::from_schema(schema);
        to_dot(
            &view,
            &RenderOptions::default().with_field_names(show_field_names),
        )
    }

    #[test]
    fn test_dot_header() {
        let output = render(&create_test_schema(), true);

        assert!(output.starts_with("digraph g {\n"));
        assert!(output.contains("rankdir=LR,"));
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_dot_layout_tb() {
        let schema = create_test_schema();
        let view = GraphView::from_schema(&schema);
        let output = to_dot(&view, &RenderOptions::default().with_layout(Layout::TB));
        assert!(output.contains("rankdir=TB,"));
    }

    #[test]
    fn test_dot_field_rows() {
        let output = render(&create_test_schema(), true);

        assert!(output.contains("<td bgcolor=\"lightblue\" colspan=\"2\">book</td>"));
        assert!(output.contains(
            "<tr><td port=\"inname\"                  align=\"left\">varchar   </td>"
        ));
        assert!(output.contains("<td port=\"outname\"                  align=\"left\">name"));
    }

    #[test]
    fn test_dot_datetime_field_is_labelled_text() {
        let output = render(&create_test_schema(), true);
        assert!(output.contains("align=\"left\">text      </td><td port=\"outtimecreated\""));
    }

    #[test]
    fn test_dot_component_edges() {
        let output = render(&create_test_schema(), true);

        assert!(output.contains("    book_chapters:outbookid -> book:inid;\n"));
        assert!(output.contains("    book_chapters:inparent:w -> book_chapters:inid:w [minlen=1];\n"));
    }

    #[test]
    fn test_dot_external_tables() {
        let output = render(&create_test_schema(), true);

        assert!(output.contains("    book:outcourse -> course;\n"));
        assert!(output.contains("subgraph cluster_external"));
        assert!(output.contains("<td port=\"course\" bgcolor=\"orange\" colspan=\"2\">course</td>"));

        let cluster = &output[output.find("subgraph cluster_external").unwrap()..];
        assert!(cluster.contains("        \"course\";\n"));
        assert!(!cluster.contains("\"book\""));
    }

    #[test]
    fn test_dot_component_cluster() {
        let output = render(&create_test_schema(), true);
        let start = output.find("subgraph cluster_component").unwrap();
        let end = output[start..].find("    }\n").unwrap() + start;
        let cluster = &output[start..end];

        assert!(cluster.contains("        \"book\";\n        \"book_chapters\";\n"));
        assert!(!cluster.contains("course"));
    }

    #[test]
    fn test_dot_without_field_names() {
        let output = render(&create_test_schema(), false);

        assert!(!output.contains("port=\"in"));
        assert!(!output.contains("port=\"out"));
        assert!(output.contains("    book_chapters -> book;\n"));
        assert!(output.contains("    book_chapters -> book_chapters;\n"));
        assert!(output.contains("    book -> course;\n"));
    }

    #[test]
    fn test_dot_no_external_cluster_when_self_contained() {
        let mut schema = Schema::new();
        schema.add_table(Table::new("a").with_key(Key::new("primary", &["id"])));
        let output = render(&schema, true);

        assert!(!output.contains("cluster_external"));
        assert!(!output.contains("Now all of the external tables"));
    }

    #[test]
    fn test_dot_external_deduplicated() {
        let mut schema = Schema::new();
        schema.add_table(
            Table::new("a")
                .with_key(Key::foreign("u1", &["userid"], "user", &["id"]))
                .with_key(Key::foreign("u2", &["usermodified"], "user", &["id"])),
        );
        let output = render(&schema, false);

        assert_eq!(output.matches("bgcolor=\"orange\"").count(), 1);
        assert_eq!(output.matches("    a -> user;\n").count(), 2);
    }

    #[test]
    fn test_escape_dot_id() {
        assert_eq!(escape_dot_id("users"), "users");
        assert_eq!(escape_dot_id("my table"), "\"my table\"");
        assert_eq!(escape_dot_id("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_escape_dot_id_leading_digit() {
        assert_eq!(escape_dot_id("1log"), "\"1log\"");
        assert_eq!(escape_dot_id("log1"), "log1");
    }

    #[test]
    fn test_dot_table_starting_with_digit_is_quoted() {
        let mut schema = Schema::new();
        schema.add_table(
            Table::new("1log").with_key(Key::foreign("user", &["userid"], "2fa", &["id"])),
        );
        let output = render(&schema, true);

        assert!(output.contains("\n    \"1log\" [\n"));
        assert!(!output.contains("\n    1log [\n"));
        assert!(output.contains("    \"1log\":outuserid -> \"2fa\";\n"));
    }
}

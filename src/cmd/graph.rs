//! Graph command implementation for ERD generation.

use crate::graph::format::is_image_extension;
use crate::graph::{render, GraphView, GraphYamlConfig, Layout, OutputFormat, RenderOptions};
use crate::schema::load_xmldb;
use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Arguments of the graph command as given on the command line
pub struct GraphArgs {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub field_names: bool,
    pub no_field_names: bool,
    pub layout: Option<String>,
    pub tables: Option<String>,
    pub exclude: Option<String>,
    pub config: Option<PathBuf>,
    pub render: bool,
    pub dot_path: Option<PathBuf>,
}

/// Run the graph command
pub fn run(args: GraphArgs) -> Result<()> {
    let config = match args.config {
        Some(ref path) => GraphYamlConfig::load(path)?,
        None => GraphYamlConfig::default(),
    };

    let format = resolve_format(args.format.as_deref(), &config, args.output.as_deref())?;

    let layout = match args.layout {
        Some(ref l) => l.parse::<Layout>().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.layout()?.unwrap_or(Layout::LR),
    };

    let show_field_names = if args.field_names {
        true
    } else if args.no_field_names {
        false
    } else {
        config.field_names.unwrap_or(false)
    };

    let options = RenderOptions::default()
        .with_field_names(show_field_names)
        .with_layout(layout);

    let tables_filter = args
        .tables
        .as_deref()
        .map(split_patterns)
        .unwrap_or_else(|| config.tables.clone());
    let exclude_filter = args
        .exclude
        .as_deref()
        .map(split_patterns)
        .unwrap_or_else(|| config.exclude.clone());

    let dot_path = args
        .dot_path
        .or_else(|| config.dot_path.clone())
        .unwrap_or_else(|| PathBuf::from("dot"));

    let schema_path = resolve_schema_path(&args.path)?;
    eprintln!(
        "Generating ERD: {} [format: {}]",
        schema_path.display(),
        format
    );

    let schema = load_xmldb(&schema_path)?;
    if schema.is_empty() {
        eprintln!("No tables found in the file.");
        return Ok(());
    }

    let mut view = GraphView::from_schema(&schema);
    view.filter_tables(&compile_patterns(&tables_filter)?);
    view.exclude_tables(&compile_patterns(&exclude_filter)?);

    let output_content = render(&view, format, &options);

    let should_render = args.render
        || args
            .output
            .as_ref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(is_image_extension)
            .unwrap_or(false);

    if should_render {
        if format != OutputFormat::Dot {
            bail!("only DOT output can be rendered to an image (got {})", format);
        }
        let Some(ref out_path) = args.output else {
            bail!("--render requires --output with an image extension (png, svg, pdf, ...)");
        };
        render_with_graphviz(&output_content, out_path, &dot_path)?;
    } else if let Some(ref out_path) = args.output {
        let mut file = File::create(out_path)
            .with_context(|| format!("failed to create {}", out_path.display()))?;
        file.write_all(output_content.as_bytes())?;
        eprintln!("ERD written to: {}", out_path.display());
    } else {
        print!("{}", output_content);
    }

    eprintln!(
        "\nERD: {} tables, {} fields, {} relationships, {} external",
        view.table_count(),
        view.field_count(),
        view.relationship_count(),
        view.external_tables().len()
    );

    Ok(())
}

/// Pick the output format: flag, then config, then output extension, then DOT
fn resolve_format(
    flag: Option<&str>,
    config: &GraphYamlConfig,
    output: Option<&Path>,
) -> Result<OutputFormat> {
    if let Some(f) = flag {
        return f.parse().map_err(|e: String| anyhow::anyhow!(e));
    }
    if let Some(f) = config.output_format()? {
        return Ok(f);
    }
    Ok(output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(OutputFormat::from_extension)
        .unwrap_or_default())
}

/// A plugin directory resolves to its `db/install.xml`
fn resolve_schema_path(path: &Path) -> Result<PathBuf> {
    let resolved = if path.is_dir() {
        path.join("db").join("install.xml")
    } else {
        path.to_path_buf()
    };

    if !resolved.is_file() {
        bail!("install.xml not found: {}", resolved.display());
    }
    Ok(resolved)
}

fn split_patterns(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid table pattern: {}", p)))
        .collect()
}

/// Render DOT to an image using Graphviz
fn render_with_graphviz(dot_source: &str, output_path: &Path, dot_path: &Path) -> Result<()> {
    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");

    let format_arg = format!("-T{}", ext.to_lowercase());
    tracing::debug!(dot = %dot_path.display(), format = %format_arg, "running graphviz");

    let mut child = Command::new(dot_path)
        .arg(&format_arg)
        .arg("-o")
        .arg(output_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "Graphviz '{}' command not found. Install Graphviz or use --format dot instead.",
                    dot_path.display()
                )
            } else {
                anyhow::anyhow!("Failed to run {}: {}", dot_path.display(), e)
            }
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(dot_source.as_bytes())?;
    }

    let result = child.wait_with_output()?;
    let stderr = String::from_utf8_lossy(&result.stderr);

    if !result.status.success() || !stderr.trim().is_empty() {
        bail!(
            "failed to execute {} {}: {}\n{}",
            dot_path.display(),
            format_arg,
            stderr.trim(),
            numbered_listing(dot_source)
        );
    }

    eprintln!("Rendered to: {}", output_path.display());
    Ok(())
}

/// DOT source with line numbers, for locating Graphviz errors
fn numbered_listing(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:3} {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

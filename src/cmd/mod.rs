mod graph;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "erdiagram")]
#[command(version)]
#[command(about = "Render XMLDB schema files as ER diagrams", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an ER diagram from an XMLDB schema
    Graph {
        /// XMLDB file, or a plugin directory containing db/install.xml
        path: PathBuf,

        /// Output file (default: stdout). Image extensions (.png, .svg, .pdf) render via Graphviz
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: dot, mermaid (default: detected from output extension, else dot)
        #[arg(short, long)]
        format: Option<String>,

        /// Show field types and names inside each table
        #[arg(long)]
        field_names: bool,

        /// Hide field rows, overriding the config file
        #[arg(long, conflicts_with = "field_names")]
        no_field_names: bool,

        /// Layout direction for DOT output: lr, tb
        #[arg(long)]
        layout: Option<String>,

        /// Only include tables matching these patterns (comma-separated, glob supported)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude tables matching these patterns (comma-separated, glob supported)
        #[arg(short, long)]
        exclude: Option<String>,

        /// YAML config file with default options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render DOT output to an image with Graphviz (format from output extension)
        #[arg(long)]
        render: bool,

        /// Path to the Graphviz dot binary
        #[arg(long)]
        dot_path: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Graph {
            path,
            output,
            format,
            field_names,
            no_field_names,
            layout,
            tables,
            exclude,
            config,
            render,
            dot_path,
        } => graph::run(graph::GraphArgs {
            path,
            output,
            format,
            field_names,
            no_field_names,
            layout,
            tables,
            exclude,
            config,
            render,
            dot_path,
        }),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "erdiagram", &mut io::stdout());
            Ok(())
        }
    }
}

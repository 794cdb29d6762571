//! ERD (Entity-Relationship Diagram) generation module.
//!
//! This module provides:
//! - Relationship extraction from table keys
//! - A filterable view deciding which tables are components and which are external
//! - Output formats: DOT (Graphviz), Mermaid

pub mod config;
pub mod format;
pub mod relations;
pub mod view;

pub use config::GraphYamlConfig;
pub use format::{render, to_dot, to_mermaid, Layout, OutputFormat, RenderOptions};
#[allow(unused_imports)]
pub use relations::{foreign_keys, relationships, Relationship};
pub use view::GraphView;

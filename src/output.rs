//! Result rendering: aligned tables for people, JSON or YAML for scripts.

use crate::cli_style::{node_table, Icons, Theme};
use crate::commands::nodes::{DeleteResult, Outcome};
use crate::error::{NodectlError, Result};
use crate::node::{ColumnCatalog, Projection, ProjectionContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Structured output format selected with `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact JSON on a single line
    JsonLine,
    Yaml,
}

/// Structured error body
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub error: String,
}

/// Renders command outcomes and errors in the mode chosen for this invocation
#[derive(Debug, Clone)]
pub struct Renderer {
    format: Option<OutputFormat>,
    color: bool,
}

impl Renderer {
    /// `format == None` selects table mode
    pub fn new(format: Option<OutputFormat>, color: bool) -> Self {
        Self { format, color }
    }

    /// Write a successful outcome.
    ///
    /// In table mode the whole table is built before the first byte is
    /// written, so a node that cannot be rendered leaves `out` untouched.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        outcome: &Outcome,
        catalog: &ColumnCatalog,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match self.format {
            Some(format) => self.render_structured(out, outcome, format),
            None => self.render_table(out, outcome, catalog, now),
        }
    }

    fn render_structured<W: Write>(
        &self,
        out: &mut W,
        outcome: &Outcome,
        format: OutputFormat,
    ) -> Result<()> {
        match outcome {
            Outcome::Node { node, .. } => write_structured(out, node, format),
            Outcome::Nodes { nodes, .. } => write_structured(out, nodes, format),
            Outcome::Deleted | Outcome::NotDeleted => {
                let result = DeleteResult {
                    result: outcome.message().unwrap_or_default(),
                };
                write_structured(out, &result, format)
            }
        }
    }

    fn render_table<W: Write>(
        &self,
        out: &mut W,
        outcome: &Outcome,
        catalog: &ColumnCatalog,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if let Outcome::Nodes {
            nodes,
            columns,
            namespace,
        } = outcome
        {
            let ctx = ProjectionContext {
                namespace_filter: namespace.as_deref(),
                now,
            };
            let data = Projection::from_columns(catalog, columns.clone()).project(nodes, &ctx)?;
            let table = node_table(&data, self.color);
            writeln!(out, "{}", table)?;
            return Ok(());
        }

        let message = outcome.message().unwrap_or_default();
        if self.color {
            writeln!(out, "{}", Theme::success(message))?;
        } else {
            writeln!(out, "{}", message)?;
        }
        Ok(())
    }

    /// Report a failed command
    pub fn render_error<W: Write>(&self, out: &mut W, error: &NodectlError) -> Result<()> {
        let message = sanitize_error(&error.to_string());

        match self.format {
            Some(format) => write_structured(out, &ErrorOutput { error: message }, format),
            None => {
                if self.color {
                    writeln!(
                        out,
                        "{} {}",
                        Theme::error(format!("{} Error:", Icons::ERROR)),
                        message
                    )?;
                    if let Some(hint) = hint_for(error) {
                        writeln!(
                            out,
                            "  {} {}",
                            Theme::muted(Icons::ARROW_RIGHT),
                            Theme::muted(hint)
                        )?;
                    }
                } else {
                    writeln!(out, "Error: {}", message)?;
                }
                Ok(())
            }
        }
    }
}

/// Short suggestion printed under table-mode errors
fn hint_for(error: &NodectlError) -> Option<&'static str> {
    match error {
        NodectlError::Config(msg) if msg.contains("column") => {
            Some("run `nodectl nodes list --help` for the available columns")
        }
        NodectlError::Remote {
            source: nodectl_interface::ServiceError::Transport(_),
            ..
        } => Some("check --address and that the server is reachable"),
        _ => None,
    }
}

fn write_structured<W: Write, T: Serialize + ?Sized>(
    out: &mut W,
    value: &T,
    format: OutputFormat,
) -> Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::JsonLine => serde_json::to_string(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };

    writeln!(out, "{}", text.trim_end())?;
    Ok(())
}

/// Sanitize error messages by collapsing whitespace
pub fn sanitize_error(msg: &str) -> String {
    msg.split_whitespace().collect::<Vec<&str>>().join(" ")
}

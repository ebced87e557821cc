//! CLI Tooling
//!
//! Drives a [`Picker`] over a JSON dataset from the command line: print the
//! tree, run a search, replay key presses, or check nodes by id.

use crate::config::{ConfigLoader, PickerConfig};
use crate::navigator::{Key, KeyOutcome};
use crate::picker::Picker;
use crate::tooling::format::{format_checked_table, format_rows_text, format_section_heading};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

/// Picktree CLI - browse, search and select in a lazy category tree
#[derive(Parser)]
#[command(name = "picktree")]
#[command(about = "Searchable tri-state multi-select tree picker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON dataset of the form { "<parent id>": [node, ...] }
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tree view
    Tree {
        /// Load and expand every node
        #[arg(long, default_value = "false")]
        expand_all: bool,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Search node labels and print the match paths
    Search {
        query: String,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Replay key presses against the picker, e.g. `down,right,space`
    Keys {
        #[arg(value_delimiter = ',')]
        keys: Vec<String>,
        /// Enter this query before replaying keys
        #[arg(long)]
        query: Option<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Check nodes by id and print the checked leaves
    Check {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// CLI execution context
pub struct CliContext {
    config: PickerConfig,
    picker: Picker,
    runtime: Runtime,
    color: bool,
}

impl CliContext {
    /// Load configuration for `cli`, applying the `--dataset` override
    pub fn load_config(cli: &Cli) -> anyhow::Result<PickerConfig> {
        let mut config = ConfigLoader::load(cli.config.as_deref())
            .context("Failed to load configuration")?;
        if let Some(dataset) = &cli.dataset {
            config.source.dataset = Some(dataset.clone());
        }
        if cli.verbose {
            config.logging.level = "debug".to_string();
        }
        if cli.no_color {
            config.logging.color = false;
        }
        Ok(config)
    }

    pub fn new(config: PickerConfig) -> anyhow::Result<Self> {
        let picker = Picker::from_config(&config)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        let color = config.logging.color;
        Ok(Self {
            config,
            picker,
            runtime,
            color,
        })
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// Run `command` and return its rendered output
    pub fn execute(&self, command: &Commands) -> anyhow::Result<String> {
        self.runtime.block_on(self.run(command))
    }

    async fn run(&self, command: &Commands) -> anyhow::Result<String> {
        self.picker.load_roots().await?;
        match command {
            Commands::Tree { expand_all, format } => {
                if *expand_all {
                    self.picker.expand_all().await?;
                }
                Ok(self.render_rows("Tree", *format)?)
            }
            Commands::Search { query, format } => {
                self.picker.set_query(query).await?;
                let count = self
                    .picker
                    .search_results()
                    .map(|r| r.len())
                    .unwrap_or(0);
                info!(query = %query, matches = count, "Search complete");
                Ok(self.render_rows(&format!("Search \"{}\" ({} matches)", query, count), *format)?)
            }
            Commands::Keys {
                keys,
                query,
                format,
            } => {
                if let Some(query) = query {
                    self.picker.set_query(query).await?;
                }
                let mut outcomes = Vec::with_capacity(keys.len());
                for raw in keys {
                    let key: Key = raw.parse().unwrap_or_else(|never| match never {});
                    let outcome = self.picker.handle_key(&key).await?;
                    outcomes.push((key, outcome));
                }
                match format {
                    OutputFormat::Json => {
                        let keys: Vec<_> = outcomes
                            .iter()
                            .map(|(key, outcome)| {
                                json!({
                                    "key": key.to_string(),
                                    "handled": *outcome == KeyOutcome::Handled,
                                })
                            })
                            .collect();
                        Ok(serde_json::to_string_pretty(&json!({
                            "keys": keys,
                            "focus": self.picker.focus(),
                            "rows": self.picker.rows(),
                            "checked": self.picker.checked_ids(),
                        }))?)
                    }
                    OutputFormat::Text => {
                        let mut out = String::new();
                        for (key, outcome) in &outcomes {
                            let verdict = match outcome {
                                KeyOutcome::Handled => "handled",
                                KeyOutcome::PassThrough => "passed through",
                            };
                            out.push_str(&format!("{}: {}\n", key, verdict));
                        }
                        out.push('\n');
                        out.push_str(&self.render_rows("View", OutputFormat::Text)?);
                        Ok(out)
                    }
                }
            }
            Commands::Check { ids, format } => {
                for id in ids {
                    self.picker.reveal(id).await?;
                    self.picker.toggle(id, true).await?;
                }
                let checked = self.picker.checked_ids();
                match format {
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                        "checked": checked,
                    }))?),
                    OutputFormat::Text => {
                        let nodes: Vec<_> = checked
                            .iter()
                            .filter_map(|id| self.picker.node(id))
                            .collect();
                        Ok(format!(
                            "{}\n{}",
                            format_section_heading("Checked", self.color),
                            format_checked_table(&nodes)
                        ))
                    }
                }
            }
        }
    }

    fn render_rows(&self, title: &str, format: OutputFormat) -> anyhow::Result<String> {
        let rows = self.picker.rows();
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "query": self.picker.query(),
                "focus": self.picker.focus(),
                "rows": rows,
            }))?),
            OutputFormat::Text => Ok(format!(
                "{}\n{}",
                format_section_heading(title, self.color),
                format_rows_text(&rows, self.color)
            )),
        }
    }
}

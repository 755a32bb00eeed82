use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::{AnalysisDepth, Industry, ModelId};

#[derive(Parser, Debug)]
#[command(name = "prd-forge", version, about = "Generate replication PRDs for websites through a text-completion API")]
pub struct Args {
    /// TOML config file layered over the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub history_db: Option<PathBuf>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Save every prompt and response under <state_dir>/tx/<id>/
    #[arg(long, global = true, default_value_t = false)]
    pub save_prompts: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Also write the report as Markdown; without a path, to analysis-<millis>.md
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    pub out: Option<Option<PathBuf>>,

    /// Also write the full result (report plus per-call outcomes) as JSON;
    /// without a path, to analysis-<millis>.json
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    pub json: Option<Option<PathBuf>>,

    /// Do not print the report body to stdout
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one website
    Analyze {
        url: String,
        #[arg(long, value_enum)]
        model: Option<ModelId>,
        #[arg(long, value_enum)]
        industry: Option<Industry>,
        #[arg(long, value_enum)]
        depth: Option<AnalysisDepth>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// One comparative report across several competitor websites
    Compare {
        #[arg(required = true, num_args = 1..)]
        urls: Vec<String>,
        #[arg(long, value_enum)]
        model: Option<ModelId>,
        #[arg(long, value_enum)]
        industry: Option<Industry>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analyze one website with several models concurrently
    CompareModels {
        url: String,
        #[arg(long, value_enum, value_delimiter = ',', required = true)]
        models: Vec<ModelId>,
        #[arg(long, value_enum)]
        industry: Option<Industry>,
        #[arg(long, value_enum)]
        depth: Option<AnalysisDepth>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate code scaffolding from a stored report (history id or Markdown file)
    Scaffold {
        #[arg(long)]
        from: String,
        #[arg(long, default_value = "react")]
        framework: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Browse past analyses
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
    /// List supported models
    Models,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    List,
    Show {
        id: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    Clear,
}

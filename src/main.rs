use anyhow::{Context, Result};
use clap::Parser;
use fs_err as fs;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use prd_forge::cli::{self, Command, HistoryCommand, OutputArgs};
use prd_forge::config::{ApiKey, Config};
use prd_forge::errors::{self, PrdError};
use prd_forge::history::{self, sqlite::SqliteKv, HistoryStore, KvHistory};
use prd_forge::orchestrator::{AnalysisRequest, Orchestrator, Report};
use prd_forge::{export, log, provider, ux};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = cli::Args::parse();
    log::init(args.debug);

    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(db) = &args.history_db {
        cfg.history_db = Some(db.display().to_string());
    }
    if let Some(t) = args.timeout_secs {
        cfg.timeout_secs = t;
    }

    let history = open_history(&cfg);

    let outcome = match args.command {
        Command::Models => {
            ux::print_models();
            Ok(())
        }
        Command::History { action } => run_history(action, history.as_ref()),
        command => {
            let key = ApiKey::from_env()?;
            let client = provider::make_client(&cfg, key)?;
            let mut orchestrator = Orchestrator::new(client, history)
                .with_scaffold(cfg.scaffold_model, cfg.scaffold_budget);
            if args.save_prompts {
                let artifacts = log::Artifacts::new(Path::new(&cfg.state_dir), Uuid::new_v4());
                tracing::info!(dir = %artifacts.dir().display(), "saving prompts and responses");
                orchestrator = orchestrator.with_artifacts(artifacts);
            }
            run_workflow(command, &orchestrator, &cfg).await
        }
    };

    if let Err(e) = &outcome {
        if let Some(msg) = errors::validation_message(e) {
            ux::print_error(msg);
            std::process::exit(errors::VALIDATION_EXIT_CODE);
        }
    }
    outcome
}

/// SQLite history, or an in-memory one when the database cannot be opened.
fn open_history(cfg: &Config) -> Arc<dyn HistoryStore> {
    let path = cfg.history_path();
    match SqliteKv::open(&path) {
        Ok(kv) => Arc::new(KvHistory::new(kv)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "history database unavailable; using memory");
            Arc::new(history::in_memory())
        }
    }
}

fn run_history(action: HistoryCommand, history: &dyn HistoryStore) -> Result<()> {
    match action {
        HistoryCommand::List => ux::print_history(&history.list()),
        HistoryCommand::Show { id, output } => {
            let record = history
                .get(&id)
                .ok_or_else(|| PrdError::Validation(format!("no analysis with id {id}")))?;
            if !output.quiet {
                println!("{}", record.report);
            }
            if let Some(p) = &output.out {
                let written = export::export_markdown(&record.report, p.as_deref())?;
                eprintln!("markdown written to {}", written.display());
            }
            if let Some(p) = &output.json {
                let written = export::export_json(&record, p.as_deref())?;
                eprintln!("json written to {}", written.display());
            }
        }
        HistoryCommand::Clear => {
            history.clear();
            println!("history cleared");
        }
    }
    Ok(())
}

async fn run_workflow(command: Command, orchestrator: &Orchestrator, cfg: &Config) -> Result<()> {
    let (report, output) = match command {
        Command::Analyze { url, model, industry, depth, output } => {
            let req = AnalysisRequest::new(
                &url,
                model.unwrap_or(cfg.default_model),
                industry.unwrap_or(cfg.default_industry),
                depth.unwrap_or(cfg.default_depth),
            )?;
            let pb = ux::spinner(&format!("Analyzing {} with {}", req.target_url, req.model));
            let report = orchestrator.analyze(&req).await;
            pb.finish_and_clear();
            (report?, output)
        }
        Command::Compare { urls, model, industry, output } => {
            let pb = ux::spinner("Analyzing competitors");
            let report = orchestrator
                .compare_competitors(
                    urls.as_slice(),
                    model.unwrap_or(cfg.default_model),
                    industry.unwrap_or(cfg.default_industry),
                )
                .await;
            pb.finish_and_clear();
            (report?, output)
        }
        Command::CompareModels { url, models, industry, depth, output } => {
            let pb = ux::spinner(&format!("Comparing {} models", models.len()));
            let report = orchestrator
                .compare_models(
                    &url,
                    &models,
                    industry.unwrap_or(cfg.default_industry),
                    depth.unwrap_or(cfg.default_depth),
                )
                .await;
            pb.finish_and_clear();
            (report?, output)
        }
        Command::Scaffold { from, framework, output } => {
            let (label, source) = load_source(&from, orchestrator.history().as_ref())?;
            let pb = ux::spinner(&format!("Generating {framework} scaffolding"));
            let report = orchestrator.extend_with_scaffold(&label, &source, &framework).await;
            pb.finish_and_clear();
            (report?, output)
        }
        Command::History { .. } | Command::Models => unreachable!("handled before the client is built"),
    };

    ux::print_report(&report, output.quiet);
    write_outputs(&report, &output)
}

/// A history id, or else a Markdown file on disk.
fn load_source(from: &str, history: &dyn HistoryStore) -> Result<(String, String)> {
    if let Some(record) = history.get(from) {
        return Ok((record.label, record.report));
    }
    let path = Path::new(from);
    if path.is_file() {
        let text = fs::read_to_string(path).with_context(|| format!("reading report {from}"))?;
        return Ok((path.display().to_string(), text));
    }
    Err(PrdError::Validation(format!("{from} is neither a history id nor a readable file")).into())
}

fn write_outputs(report: &Report, output: &OutputArgs) -> Result<()> {
    if let Some(p) = &output.out {
        let written = export::export_markdown(&report.text, p.as_deref())?;
        eprintln!("markdown written to {}", written.display());
    }
    if let Some(p) = &output.json {
        let written = export::export_json(report, p.as_deref())?;
        eprintln!("json written to {}", written.display());
    }
    Ok(())
}

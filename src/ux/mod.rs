use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::catalog::{Industry, ModelId};
use crate::history::AnalysisRecord;
use crate::orchestrator::Report;

/// Stderr spinner shown while a workflow waits on the completion endpoint.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn print_models() {
    println!("\n{}", "=== MODELS ===".bold());
    for m in ModelId::ALL {
        let p = m.profile();
        let default = if m == ModelId::default() { "  (default)".dimmed().to_string() } else { String::new() };
        println!(
            "{:<18} {:<18} quality: {:<10} speed: {:<10} cost: {}{}",
            m.as_str().cyan().bold(),
            p.display_name,
            p.quality,
            p.speed,
            p.cost,
            default
        );
    }
    println!("\n{}", "=== INDUSTRIES ===".bold());
    for i in Industry::ALL {
        println!("  {}", i.label());
    }
    println!();
}

pub fn print_history(records: &[AnalysisRecord]) {
    if records.is_empty() {
        println!("(no analyses recorded yet)");
        return;
    }
    println!("\n{} ({})", "=== ANALYSIS HISTORY ===".bold(), records.len());
    for r in records {
        let when = r.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S");
        println!("{}  {}  {}", r.id.yellow(), when.to_string().dimmed(), truncate_label(&r.label, 80));
    }
    println!();
}

fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let cut: String = label.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

pub fn print_report(report: &Report, quiet: bool) {
    if !quiet {
        println!("{}", report.text);
    }
    let status = if report.succeeded { "[DONE]".green().bold() } else { "[FAILED]".red().bold() };
    eprintln!("{} {}", status, report.label);
    match &report.record_id {
        Some(id) => eprintln!("{} {}", "saved to history:".dimmed(), id),
        None if report.succeeded => eprintln!("{}", "history not updated (storage unavailable)".yellow()),
        None => {}
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(truncate_label("abc", 5), "abc");
        assert_eq!(truncate_label("abcdefgh", 5), "abcd…");
    }
}

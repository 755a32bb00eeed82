//! Analysis workflows: single URL, competitor set, model comparison and the
//! code-scaffolding pass. Each call is a stateless request/response; the only
//! side effect is appending successful reports to the injected history.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{AnalysisDepth, Industry, ModelId};
use crate::errors::{PrdError, PrdResult};
use crate::history::HistoryStore;
use crate::log::Artifacts;
use crate::prompt;
use crate::provider::{complete, CompletionResult, DynClient, Outcome};

pub const SCAFFOLD_HEADING: &str = "# 🏗️ Generated Code Scaffolding";

pub const RECOMMENDATION_NOTE: &str = "💡 **Recommendation:** Several models produced a report. Compare the sections above for depth and accuracy; Pro-tier models usually give the most thorough architecture detail, while Flash-tier models return faster summaries at lower cost.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub target_url: String,
    pub model: ModelId,
    pub industry: Industry,
    pub depth: AnalysisDepth,
}

impl AnalysisRequest {
    pub fn new(target_url: &str, model: ModelId, industry: Industry, depth: AnalysisDepth) -> PrdResult<Self> {
        let target_url = require_url(target_url)?;
        Ok(Self { target_url, model, industry, depth })
    }
}

/// What a workflow hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub label: String,
    pub text: String,
    pub succeeded: bool,
    pub results: Vec<CompletionResult>,
    pub record_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn require_url(raw: &str) -> PrdResult<String> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(PrdError::Validation("Please enter a valid URL.".into()));
    }
    Ok(url.to_string())
}

/// Trim entries, drop blanks and repeated URLs, keep first-seen order.
pub fn normalize_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for u in urls {
        let u = u.as_ref().trim();
        if !u.is_empty() && !out.iter().any(|seen| seen == u) {
            out.push(u.to_string());
        }
    }
    out
}

/// Original report, separator, then the generated scaffolding.
pub fn append_scaffold(report: &str, scaffold: &str) -> String {
    format!("{report}\n\n---\n\n{SCAFFOLD_HEADING}\n\n{scaffold}")
}

pub struct Orchestrator {
    client: DynClient,
    history: Arc<dyn HistoryStore>,
    scaffold_model: ModelId,
    scaffold_budget: usize,
    artifacts: Option<Artifacts>,
}

impl Orchestrator {
    pub fn new(client: DynClient, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            client,
            history,
            scaffold_model: ModelId::Gemini25Pro,
            scaffold_budget: 8_000,
            artifacts: None,
        }
    }

    pub fn with_scaffold(mut self, model: ModelId, budget: usize) -> Self {
        self.scaffold_model = model;
        self.scaffold_budget = budget;
        self
    }

    pub fn with_artifacts(mut self, artifacts: Artifacts) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    async fn call(&self, stage: &str, prompt: &str, model: ModelId) -> CompletionResult {
        let result = complete(self.client.as_ref(), prompt, model).await;
        if let Some(a) = &self.artifacts {
            a.save_stage(stage, prompt, &result);
        }
        result
    }

    fn finish(&self, label: String, text: String, succeeded: bool, results: Vec<CompletionResult>) -> Report {
        let record_id = if succeeded {
            self.history.append(&label, &text).map(|r| r.id)
        } else {
            tracing::info!(%label, "analysis failed; not recorded in history");
            None
        };
        Report { label, text, succeeded, results, record_id, created_at: Utc::now() }
    }

    /// Master template, one call, text returned unmodified.
    pub async fn analyze(&self, req: &AnalysisRequest) -> PrdResult<Report> {
        let url = require_url(&req.target_url)?;
        tracing::info!(%url, model = %req.model, depth = %req.depth, industry = ?req.industry, "single analysis");
        let prompt = prompt::single_analysis_prompt(&url, req.depth, req.industry);
        let result = self.call("analyze", &prompt, req.model).await;
        let succeeded = result.succeeded();
        let text = result.text().to_string();
        Ok(self.finish(url, text, succeeded, vec![result]))
    }

    /// All targets in one combined prompt and exactly one call.
    pub async fn compare_competitors<S: AsRef<str>>(
        &self,
        urls: &[S],
        model: ModelId,
        industry: Industry,
    ) -> PrdResult<Report> {
        let urls = normalize_urls(urls);
        if urls.is_empty() {
            return Err(PrdError::Validation("Please enter at least one URL.".into()));
        }
        tracing::info!(targets = urls.len(), %model, "competitor comparison");
        let prompt = prompt::competitor_prompt(&urls, industry);
        let result = self.call("compare", &prompt, model).await;
        let label = format!("Comparison: {}", urls.join(", "));
        let succeeded = result.succeeded();
        let text = result.text().to_string();
        Ok(self.finish(label, text, succeeded, vec![result]))
    }

    /// One concurrent call per model, joined in input order.
    pub async fn compare_models(
        &self,
        target_url: &str,
        models: &[ModelId],
        industry: Industry,
        depth: AnalysisDepth,
    ) -> PrdResult<Report> {
        let url = require_url(target_url)?;
        let mut unique: Vec<ModelId> = Vec::new();
        for m in models {
            if !unique.contains(m) {
                unique.push(*m);
            }
        }
        if unique.is_empty() {
            return Err(PrdError::Validation("Please select at least one model.".into()));
        }
        tracing::info!(%url, models = unique.len(), "model comparison");

        let prompt = prompt::single_analysis_prompt(&url, depth, industry);
        let results: Vec<CompletionResult> = join_all(
            unique
                .iter()
                .map(|m| self.call(m.as_str(), &prompt, *m)),
        )
        .await;

        let text = format_model_comparison(&url, &results);
        let succeeded = results.iter().any(CompletionResult::succeeded);
        Ok(self.finish(format!("Model Comparison: {url}"), text, succeeded, results))
    }

    /// Scaffolding for a report, always on the configured high-quality model.
    pub async fn scaffold_code(&self, report: &str, framework: &str) -> PrdResult<CompletionResult> {
        if report.trim().is_empty() {
            return Err(PrdError::Validation("There is no report to generate code from.".into()));
        }
        let framework = framework.trim();
        if framework.is_empty() {
            return Err(PrdError::Validation("Please name a target framework.".into()));
        }
        tracing::info!(framework, model = %self.scaffold_model, "code scaffolding");
        let prompt = prompt::scaffold_prompt(report, framework, self.scaffold_budget);
        Ok(self.call("scaffold", &prompt, self.scaffold_model).await)
    }

    /// Scaffold a stored report and record the combined document.
    pub async fn extend_with_scaffold(&self, source_label: &str, report: &str, framework: &str) -> PrdResult<Report> {
        let result = self.scaffold_code(report, framework).await?;
        let label = format!("Scaffold ({}): {}", framework.trim(), source_label);
        match &result.outcome {
            Outcome::Succeeded(code) => {
                let text = append_scaffold(report, code);
                Ok(self.finish(label, text, true, vec![result]))
            }
            Outcome::Failed(msg) => {
                let text = msg.clone();
                Ok(self.finish(label, text, false, vec![result]))
            }
        }
    }
}

/// Sections follow `results` order, then the tally.
pub fn format_model_comparison(url: &str, results: &[CompletionResult]) -> String {
    let mut out = String::new();
    out.push_str("# 🔬 Model Comparison Report\n\n");
    out.push_str(&format!("**Target URL:** {url}\n\n"));
    out.push_str(&format!("**Models Compared:** {}\n\n---\n\n", results.len()));

    for r in results {
        let p = r.model.profile();
        match &r.outcome {
            Outcome::Succeeded(text) => {
                out.push_str(&format!("## 🤖 {} (`{}`)\n\n", p.display_name, r.model));
                out.push_str(&format!(
                    "*Speed: {} • Quality: {} • Cost: {}*\n\n",
                    p.speed, p.quality, p.cost
                ));
                out.push_str(text);
            }
            Outcome::Failed(msg) => {
                out.push_str(&format!("## ❌ {} (`{}`) — Analysis Failed\n\n", p.display_name, r.model));
                out.push_str(&format!("> {msg}"));
            }
        }
        out.push_str("\n\n---\n\n");
    }

    let ok = results.iter().filter(|r| r.succeeded()).count();
    let failed = results.len() - ok;
    out.push_str("## 📊 Comparison Summary\n\n");
    out.push_str(&format!("- Total Models: {}\n", results.len()));
    out.push_str(&format!("- Successful: {ok}\n"));
    out.push_str(&format!("- Failed: {failed}\n"));
    if ok > 1 {
        out.push('\n');
        out.push_str(RECOMMENDATION_NOTE);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::in_memory;
    use crate::provider::testing::ScriptedClient;
    use std::time::{Duration, Instant};

    fn orchestrator(client: Arc<ScriptedClient>) -> (Orchestrator, Arc<dyn HistoryStore>) {
        let history: Arc<dyn HistoryStore> = Arc::new(in_memory());
        (Orchestrator::new(client, history.clone()), history)
    }

    #[tokio::test]
    async fn single_analysis_sends_rendered_master_prompt() {
        let client = Arc::new(ScriptedClient::new());
        let (o, history) = orchestrator(client.clone());
        let req = AnalysisRequest::new(
            "https://example.com",
            ModelId::Gemini25Flash,
            Industry::Generic,
            AnalysisDepth::Quick,
        )
        .unwrap();

        let report = o.analyze(&req).await.unwrap();
        assert_eq!(report.text, "report from gemini-2.5-flash");
        assert!(report.succeeded);

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let sent = &calls[0].1;
        assert!(sent.contains("https://example.com"));
        assert!(!sent.contains("{TARGET_URL}"));
        assert!(!sent.contains("INDUSTRY FOCUS"));

        let stored = history.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].label, "https://example.com");
        assert_eq!(report.record_id.as_deref(), Some(stored[0].id.as_str()));
    }

    #[test]
    fn blank_url_is_rejected_up_front() {
        let err = AnalysisRequest::new("  ", ModelId::default(), Industry::Generic, AnalysisDepth::Standard)
            .unwrap_err();
        assert!(matches!(err, PrdError::Validation(_)));
    }

    #[tokio::test]
    async fn failed_single_analysis_returns_message_and_skips_history() {
        let client = Arc::new(ScriptedClient::new().failing(ModelId::Gemini25Flash));
        let (o, history) = orchestrator(client);
        let req = AnalysisRequest::new("https://x.io", ModelId::Gemini25Flash, Industry::Saas, AnalysisDepth::Deep)
            .unwrap();
        let report = o.analyze(&req).await.unwrap();
        assert!(!report.succeeded);
        assert!(report.text.contains("simulated outage"));
        assert!(history.list().is_empty());
    }

    #[tokio::test]
    async fn competitor_comparison_filters_blanks_and_calls_once() {
        let client = Arc::new(ScriptedClient::new());
        let (o, history) = orchestrator(client.clone());
        let urls = ["https://a.com", "", "https://b.com"];
        let report = o
            .compare_competitors(&urls, ModelId::Gemini25Flash, Industry::Generic)
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.contains("1. https://a.com"));
        assert!(calls[0].1.contains("2. https://b.com"));
        assert!(!calls[0].1.contains("3. https://"));
        assert!(calls[0].1.contains("1. https://a.com\n2. https://b.com"));
        assert_eq!(report.label, "Comparison: https://a.com, https://b.com");
        assert_eq!(history.list()[0].label, report.label);
    }

    #[tokio::test]
    async fn competitor_comparison_needs_a_url() {
        let client = Arc::new(ScriptedClient::new());
        let (o, _) = orchestrator(client.clone());
        let err = o
            .compare_competitors(&["", "  "], ModelId::Gemini25Flash, Industry::Generic)
            .await
            .unwrap_err();
        assert!(matches!(err, PrdError::Validation(_)));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn model_comparison_keeps_input_order_and_isolates_failures() {
        let (m1, m2, m3) = (ModelId::Gemini25Flash, ModelId::Gemini15Pro, ModelId::Gemini20Flash);
        // m1 settles last, m2 fails
        let client = Arc::new(ScriptedClient::new().delay(m1, 60).delay(m3, 5).failing(m2));
        let (o, history) = orchestrator(client.clone());

        let report = o
            .compare_models("https://example.com", &[m1, m2, m3], Industry::Generic, AnalysisDepth::Standard)
            .await
            .unwrap();

        let t = &report.text;
        let p1 = t.find("(`gemini-2.5-flash`)").unwrap();
        let p2 = t.find("(`gemini-1.5-pro`) — Analysis Failed").unwrap();
        let p3 = t.find("(`gemini-2.0-flash`)").unwrap();
        assert!(p1 < p2 && p2 < p3);
        assert!(t.contains("simulated outage for gemini-1.5-pro"));
        assert!(t.contains("Total Models: 3"));
        assert!(t.contains("Successful: 2"));
        assert!(t.contains("Failed: 1"));
        assert!(t.contains(RECOMMENDATION_NOTE));

        let models: Vec<_> = report.results.iter().map(|r| r.model).collect();
        assert_eq!(models, vec![m1, m2, m3]);

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(_, p)| p == &calls[0].1));
        assert_eq!(history.list()[0].label, "Model Comparison: https://example.com");
    }

    #[tokio::test]
    async fn model_calls_overlap_instead_of_running_back_to_back() {
        let models = [ModelId::Gemini25Flash, ModelId::Gemini15Pro, ModelId::Gemini20Flash];
        let client = Arc::new(
            ScriptedClient::new()
                .delay(models[0], 150)
                .delay(models[1], 150)
                .delay(models[2], 150),
        );
        let (o, _) = orchestrator(client.clone());

        let start = Instant::now();
        let report = o
            .compare_models("https://example.com", &models, Industry::Generic, AnalysisDepth::Standard)
            .await
            .unwrap();
        let elapsed = start.elapsed();

        // sequential awaits would need at least 450ms
        assert!(elapsed < Duration::from_millis(350), "took {elapsed:?}");
        assert_eq!(client.calls().len(), 3);
        assert!(report.text.contains("Successful: 3"));
    }

    #[tokio::test]
    async fn single_success_gets_no_recommendation() {
        let client = Arc::new(ScriptedClient::new().failing(ModelId::Gemini15Pro));
        let (o, _) = orchestrator(client);
        let report = o
            .compare_models(
                "https://example.com",
                &[ModelId::Gemini25Flash, ModelId::Gemini15Pro],
                Industry::Generic,
                AnalysisDepth::Standard,
            )
            .await
            .unwrap();
        assert!(report.text.contains("Successful: 1"));
        assert!(!report.text.contains(RECOMMENDATION_NOTE));
    }

    #[tokio::test]
    async fn model_comparison_needs_a_model() {
        let client = Arc::new(ScriptedClient::new());
        let (o, _) = orchestrator(client);
        let err = o
            .compare_models("https://example.com", &[], Industry::Generic, AnalysisDepth::Standard)
            .await
            .unwrap_err();
        assert!(matches!(err, PrdError::Validation(_)));
    }

    #[tokio::test]
    async fn scaffolding_truncates_and_uses_fixed_model() {
        let client = Arc::new(ScriptedClient::new());
        let (o, _) = orchestrator(client.clone());
        let o = o.with_scaffold(ModelId::Gemini25Pro, 100);
        let report = format!("{}END-OF-REPORT", "x".repeat(100));

        let result = o.scaffold_code(&report, "react").await.unwrap();
        assert!(result.succeeded());

        let calls = client.calls();
        assert_eq!(calls[0].0, ModelId::Gemini25Pro);
        assert!(calls[0].1.contains(&"x".repeat(100)));
        assert!(!calls[0].1.contains("END-OF-REPORT"));
    }

    #[tokio::test]
    async fn extend_with_scaffold_appends_under_heading() {
        let client = Arc::new(ScriptedClient::new());
        let (o, history) = orchestrator(client);
        let out = o.extend_with_scaffold("https://a.com", "# PRD", "vue").await.unwrap();
        assert_eq!(
            out.text,
            format!("# PRD\n\n---\n\n{SCAFFOLD_HEADING}\n\nreport from gemini-2.5-pro")
        );
        assert_eq!(history.list()[0].label, "Scaffold (vue): https://a.com");
    }

    #[tokio::test]
    async fn scaffolding_rejects_empty_report() {
        let client = Arc::new(ScriptedClient::new());
        let (o, _) = orchestrator(client.clone());
        assert!(o.scaffold_code("  ", "react").await.is_err());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn normalize_drops_blanks_and_duplicates() {
        let urls = normalize_urls(&[" https://a.com ", "", "https://a.com", "https://b.com"]);
        assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
    }
}

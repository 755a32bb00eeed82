//! Prompt templates and the placeholder renderer.
//!
//! Templates carry `{NAME}` tokens (upper-case, digits, underscores). Rendering
//! is a single left-to-right pass, so a substituted value is never expanded
//! again even if it happens to contain a token.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::catalog::{AnalysisDepth, Industry};

pub const TARGET_URL: &str = "TARGET_URL";
pub const TARGET_URLS: &str = "TARGET_URLS";
pub const ANALYSIS_MODE: &str = "ANALYSIS_MODE";
pub const INDUSTRY_FOCUS: &str = "INDUSTRY_FOCUS";
pub const FRAMEWORK: &str = "FRAMEWORK";
pub const PRD_CONTENT: &str = "PRD_CONTENT";

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Z][A-Z0-9_]*)\}").expect("placeholder pattern is valid"))
}

/// Substitution map for [`render`].
#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    values: HashMap<String, String>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Replace every `{KEY}` found in `vars`; unknown tokens are left verbatim.
pub fn render(template: &str, vars: &PromptVars) -> String {
    let mut missing: Vec<String> = Vec::new();
    let out = placeholder_re().replace_all(template, |caps: &Captures| {
        let key = &caps[1];
        match vars.get(key) {
            Some(v) => v.to_string(),
            None => {
                if !missing.iter().any(|m| m == key) {
                    missing.push(key.to_string());
                }
                caps[0].to_string()
            }
        }
    });
    for key in &missing {
        tracing::warn!(placeholder = %key, "template placeholder left unresolved");
    }
    out.into_owned()
}

/// Distinct placeholder names still present in `text`, in first-seen order.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for caps in placeholder_re().captures_iter(text) {
        let key = caps[1].to_string();
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}

pub fn single_analysis_prompt(target_url: &str, depth: AnalysisDepth, industry: Industry) -> String {
    let vars = PromptVars::new()
        .set(TARGET_URL, target_url)
        .set(ANALYSIS_MODE, depth.instruction())
        .set(INDUSTRY_FOCUS, industry.focus());
    render(MASTER_PROMPT, &vars)
}

pub fn competitor_prompt(urls: &[String], industry: Industry) -> String {
    let list = urls
        .iter()
        .enumerate()
        .map(|(i, u)| format!("{}. {}", i + 1, u))
        .collect::<Vec<_>>()
        .join("\n");
    let vars = PromptVars::new()
        .set(TARGET_URLS, list)
        .set(INDUSTRY_FOCUS, industry.focus());
    render(COMPETITOR_PROMPT, &vars)
}

/// First `budget` characters of `report` (char boundaries, not bytes).
pub fn truncate_chars(report: &str, budget: usize) -> &str {
    match report.char_indices().nth(budget) {
        Some((idx, _)) => &report[..idx],
        None => report,
    }
}

pub fn scaffold_prompt(report: &str, framework: &str, budget: usize) -> String {
    let vars = PromptVars::new()
        .set(FRAMEWORK, framework)
        .set(PRD_CONTENT, truncate_chars(report, budget));
    render(SCAFFOLD_PROMPT, &vars)
}

pub const MASTER_PROMPT: &str = r#"
***🎯 MISSION
You are an elite multi-agent AI system designed to reverse-engineer successful web applications with alien-level thinking. Your task is to analyze a target website/application and produce a COMPLETE, COPY-PASTE READY Product Requirements Document (PRD) that enables rapid replication within weeks using modern development tools.

***📥 INPUTS
TARGET_URL: {TARGET_URL}
ANALYSIS DEPTH: {ANALYSIS_MODE}

{INDUSTRY_FOCUS}

***🤖 MULTI-AGENT ANALYSIS SYSTEM
Embody and orchestrate the following specialized agents. Each agent analyzes the target independently, then the findings are merged into one unified PRD.

Agent 1: Frontend Architect 🎨
Focus: UI/UX, framework, componentization. Detect framework, routing, state management, styling, animation libraries, component patterns, accessibility and analytics. Give confidence scores (0-100%) with rationale.

Agent 2: Backend Inference Engine ⚙️
Focus: API architecture, data models, infrastructure. Infer API style, authentication, database hints, infrastructure clues and third-party integrations. Flag uncertainties and propose tests.

Agent 3: Tech Stack Detective 🔍
Focus: technology identification using Wappalyzer-style heuristics on JS frameworks, CSS frameworks, hosting providers, analytics tools and build tools. Give confidence scores and explanations.

Agent 4: Business Model Analyst 💰
Focus: pricing model, plan tiers, acquisition channels, onboarding flow and retention loops.

Agent 5: Performance & Security Auditor 🛡️
Focus: load time, optimization techniques, caching, security headers and compliance notices.

Agent 6: UX & Interaction Designer 🎭
Focus: user flows, micro-interactions, design system (colors, typography, spacing), responsiveness, copy and tone.

Agent 7: Competitive Advantage Finder 🏆
Focus: killer features, unique design decisions, moats and weaknesses.

Agent 8: Innovation & Future Forward Agent 🛸
Focus: 10+ concrete ideas for AI augmentation, modern stack upgrades, edge computing, offline-first, platform plays and monetization expansions, prioritized by impact/effort.

Agent 9: Development Planner & Tool Mapper 🗺️
Focus: a 4-phase (8-week) development plan with deliverables, acceptance criteria, risks and staffing assumptions, including tool-specific instructions for modern dev tools.

***📤 OUTPUT FORMAT
Generate a SINGLE UNIFIED PRD in Markdown. Use clear headings, bullet lists, code blocks and Mermaid diagrams (```mermaid).

***📋 PRODUCT REQUIREMENTS DOCUMENT
1. Executive Summary (product name, category, target audience, core value proposition, revenue model)
2. Technical Architecture (system overview with Mermaid diagram, frontend, backend, infrastructure)
3. Frontend Specification (pages & routes table, component library, design system)
4. Backend Specification (database schema as Mermaid erDiagram, API endpoints)
5. Development Roadmap (week-by-week)
6. Innovation Opportunities (10+ prioritized ideas)
7. Risk Assessment (risks, likelihood, impact, mitigation)
8. Deployment Playbook (CLI commands for setup & deployment)
9. Success Criteria (MVP and 6-month goals)
10. Confidence & Unknowns (per-section confidence, assumptions, unknowns)

***🔒 LEGAL & ETHICAL GUIDELINES
Respect robots.txt. No direct content plagiarism. No brand/trademark theft. Attribute open-source. Comply with privacy laws. This PRD is for educational/analytical purposes.

***🚀 FINAL OUTPUT CHECKLIST
All sections complete, Mermaid diagrams valid, code blocks ready, ideas concrete. No placeholders unless marked as [UNKNOWN].
"#;

pub const COMPETITOR_PROMPT: &str = r#"
***🎯 MISSION
You are an elite competitive-intelligence team. Analyze ALL of the following websites together and produce ONE unified comparative Product Requirements Document in Markdown.

***📥 TARGETS
{TARGET_URLS}

{INDUSTRY_FOCUS}

***📋 REQUIRED SECTIONS
1. Market Overview (category, positioning of each target, shared audience)
2. Feature Comparison Matrix (table: feature × target, with ✅ / ❌ / partial)
3. Tech Stack Comparison (table with confidence scores per target)
4. Pricing & Business Model Comparison
5. UX & Design Comparison (flows, design systems, standout interactions)
6. Strengths & Weaknesses per Target
7. Market Gaps & Differentiation Opportunities
8. Recommended Product Blueprint (the best-of-breed product to build, with Mermaid architecture diagram)
9. Development Roadmap (8 weeks, week-by-week)
10. Confidence & Unknowns

Use tables, bullet lists and Mermaid diagrams (```mermaid). Mark anything you cannot infer as [UNKNOWN].
"#;

pub const SCAFFOLD_PROMPT: &str = r#"
***🎯 MISSION
You are a senior full-stack engineer. Using the Product Requirements Document below, generate production-ready code scaffolding for the {FRAMEWORK} framework.

***📦 DELIVERABLES
1. Project structure (directory tree)
2. Package/dependency manifest
3. Core configuration files
4. Main application entry point and routing
5. Key components/pages for the MVP features, with types
6. Data models and API client stubs
7. Setup and run instructions

Return Markdown with one fenced code block per file, each preceded by its path as a heading.

***📄 PRD
{PRD_CONTENT}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_map_leaves_no_tokens() {
        let vars = PromptVars::new()
            .set(TARGET_URL, "https://x.io")
            .set(ANALYSIS_MODE, "quick")
            .set(INDUSTRY_FOCUS, "");
        let out = render(MASTER_PROMPT, &vars);
        assert!(unresolved_placeholders(&out).is_empty());
        assert!(out.contains("https://x.io"));
    }

    #[test]
    fn partial_map_keeps_unsupplied_tokens_verbatim() {
        let vars = PromptVars::new().set(TARGET_URL, "https://x.io");
        let out = render(MASTER_PROMPT, &vars);
        assert_eq!(
            unresolved_placeholders(&out),
            vec![ANALYSIS_MODE.to_string(), INDUSTRY_FOCUS.to_string()]
        );
        assert!(out.contains("{ANALYSIS_MODE}"));
    }

    #[test]
    fn rendering_twice_is_a_no_op() {
        let vars = PromptVars::new().set(TARGET_URL, "a").set(ANALYSIS_MODE, "b");
        let once = render("{TARGET_URL} {ANALYSIS_MODE} {OTHER}", &vars);
        assert_eq!(render(&once, &vars), once);
        assert_eq!(once, "a b {OTHER}");
    }

    #[test]
    fn substituted_values_are_not_expanded() {
        let vars = PromptVars::new()
            .set(TARGET_URL, "{FRAMEWORK}")
            .set(FRAMEWORK, "react");
        assert_eq!(render("{TARGET_URL}/{FRAMEWORK}", &vars), "{FRAMEWORK}/react");
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let vars = PromptVars::new().set("A", "1");
        assert_eq!(render("{A}{A} {a}", &vars), "11 {a}");
    }

    #[test]
    fn quick_generic_prompt() {
        let p = single_analysis_prompt("https://example.com", AnalysisDepth::Quick, Industry::Generic);
        assert!(p.contains("https://example.com"));
        assert!(!p.contains("{TARGET_URL}"));
        assert!(!p.contains("INDUSTRY FOCUS"));
        assert!(p.contains(AnalysisDepth::Quick.instruction()));
    }

    #[test]
    fn competitor_prompt_lists_targets_in_order() {
        let urls = vec!["https://a.com".to_string(), "https://b.com".to_string()];
        let p = competitor_prompt(&urls, Industry::Saas);
        let a = p.find("1. https://a.com").unwrap();
        let b = p.find("2. https://b.com").unwrap();
        assert!(a < b);
        assert!(p.contains("INDUSTRY FOCUS: SaaS"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn scaffold_prompt_embeds_truncated_report() {
        let report = format!("{}{}", "a".repeat(20), "TAIL");
        let p = scaffold_prompt(&report, "vue", 20);
        assert!(p.contains(&"a".repeat(20)));
        assert!(!p.contains("TAIL"));
        assert!(p.contains("vue framework"));
    }
}

//! Closed selection tables: models, industries and analysis depth.
//!
//! Every variant maps to static data through an exhaustive `match`, so adding
//! a variant without its table entry fails to compile.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PrdError;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[value(name = "gemini-2.5-flash")]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[value(name = "gemini-2.5-pro")]
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[value(name = "gemini-2.0-flash")]
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    #[value(name = "gemini-1.5-pro")]
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
    #[value(name = "gemini-1.5-flash")]
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelProfile {
    pub display_name: &'static str,
    pub speed: &'static str,
    pub quality: &'static str,
    pub cost: &'static str,
}

impl ModelId {
    pub const ALL: [ModelId; 5] = [
        ModelId::Gemini25Flash,
        ModelId::Gemini25Pro,
        ModelId::Gemini20Flash,
        ModelId::Gemini15Pro,
        ModelId::Gemini15Flash,
    ];

    /// Identifier as the remote endpoint expects it in the request path.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::Gemini25Flash => "gemini-2.5-flash",
            ModelId::Gemini25Pro => "gemini-2.5-pro",
            ModelId::Gemini20Flash => "gemini-2.0-flash",
            ModelId::Gemini15Pro => "gemini-1.5-pro",
            ModelId::Gemini15Flash => "gemini-1.5-flash",
        }
    }

    pub fn profile(self) -> ModelProfile {
        match self {
            ModelId::Gemini25Flash => ModelProfile {
                display_name: "Gemini 2.5 Flash",
                speed: "fast",
                quality: "high",
                cost: "low",
            },
            ModelId::Gemini25Pro => ModelProfile {
                display_name: "Gemini 2.5 Pro",
                speed: "moderate",
                quality: "highest",
                cost: "high",
            },
            ModelId::Gemini20Flash => ModelProfile {
                display_name: "Gemini 2.0 Flash",
                speed: "very fast",
                quality: "good",
                cost: "very low",
            },
            ModelId::Gemini15Pro => ModelProfile {
                display_name: "Gemini 1.5 Pro",
                speed: "moderate",
                quality: "very high",
                cost: "medium",
            },
            ModelId::Gemini15Flash => ModelProfile {
                display_name: "Gemini 1.5 Flash",
                speed: "fast",
                quality: "good",
                cost: "low",
            },
        }
    }
}

impl Default for ModelId {
    fn default() -> Self {
        ModelId::Gemini25Flash
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = PrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PrdError::Validation(format!("unsupported model identifier: {wanted}")))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    #[default]
    Generic,
    Saas,
    Ecommerce,
    Fintech,
    Healthcare,
    Education,
    Social,
    Marketplace,
}

impl Industry {
    pub const ALL: [Industry; 8] = [
        Industry::Generic,
        Industry::Saas,
        Industry::Ecommerce,
        Industry::Fintech,
        Industry::Healthcare,
        Industry::Education,
        Industry::Social,
        Industry::Marketplace,
    ];

    /// Focus fragment spliced into the master template. Empty for `Generic`.
    pub fn focus(self) -> &'static str {
        match self {
            Industry::Generic => "",
            Industry::Saas => SAAS_FOCUS,
            Industry::Ecommerce => ECOMMERCE_FOCUS,
            Industry::Fintech => FINTECH_FOCUS,
            Industry::Healthcare => HEALTHCARE_FOCUS,
            Industry::Education => EDUCATION_FOCUS,
            Industry::Social => SOCIAL_FOCUS,
            Industry::Marketplace => MARKETPLACE_FOCUS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Industry::Generic => "Generic (All Industries)",
            Industry::Saas => "SaaS",
            Industry::Ecommerce => "E-commerce",
            Industry::Fintech => "Fintech",
            Industry::Healthcare => "Healthcare",
            Industry::Education => "Education",
            Industry::Social => "Social",
            Industry::Marketplace => "Marketplace",
        }
    }
}

const SAAS_FOCUS: &str = r#"***🏢 INDUSTRY FOCUS: SaaS
Pay special attention to: subscription tiers and trial mechanics, seat-based vs usage-based pricing, onboarding checklists, in-app activation metrics, multi-tenancy model, team/workspace permissions, integrations marketplace, and churn-reduction features."#;

const ECOMMERCE_FOCUS: &str = r#"***🛒 INDUSTRY FOCUS: E-commerce
Pay special attention to: product catalog structure, search and faceted filtering, cart and checkout flow, payment providers, inventory and fulfilment hints, recommendation widgets, reviews, promotions, and conversion-rate optimisations."#;

const FINTECH_FOCUS: &str = r#"***💳 INDUSTRY FOCUS: Fintech
Pay special attention to: KYC/AML onboarding, account and ledger models, payment rails, fraud controls, regulatory disclosures (PCI-DSS, PSD2, SOC 2), audit trails, security posture, and trust signals."#;

const HEALTHCARE_FOCUS: &str = r#"***🏥 INDUSTRY FOCUS: Healthcare
Pay special attention to: HIPAA/GDPR compliance signals, patient and provider portals, appointment scheduling, telehealth components, consent capture, PHI data handling, accessibility, and EHR integration points."#;

const EDUCATION_FOCUS: &str = r#"***🎓 INDUSTRY FOCUS: Education
Pay special attention to: course and lesson structure, content delivery (video, quizzes, assignments), progress tracking, gamification, instructor tooling, cohort vs self-paced models, certificates, and LMS integrations."#;

const SOCIAL_FOCUS: &str = r#"***💬 INDUSTRY FOCUS: Social
Pay special attention to: feed ranking, follow graph, content creation tools, real-time notifications, messaging, moderation and safety tooling, creator monetization, and viral growth loops."#;

const MARKETPLACE_FOCUS: &str = r#"***🤝 INDUSTRY FOCUS: Marketplace
Pay special attention to: two-sided onboarding (buyers and sellers), listing quality controls, search and matching, escrow and payouts, take-rate model, ratings and trust, dispute resolution, and liquidity strategies."#;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl AnalysisDepth {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisDepth::Quick => "quick",
            AnalysisDepth::Standard => "standard",
            AnalysisDepth::Deep => "deep",
        }
    }

    /// Depth instruction substituted for `{ANALYSIS_MODE}`.
    pub fn instruction(self) -> &'static str {
        match self {
            AnalysisDepth::Quick => "QUICK — keep every section brief; prioritise the executive summary, tech stack and roadmap. Skip exhaustive tables.",
            AnalysisDepth::Standard => "STANDARD — cover every section with balanced detail.",
            AnalysisDepth::Deep => "DEEP — exhaustive analysis; expand every section, include all diagrams, full schemas, and at least 15 innovation ideas.",
        }
    }
}

impl fmt::Display for AnalysisDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

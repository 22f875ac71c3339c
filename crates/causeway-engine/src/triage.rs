//! Single-incident triage.
//!
//! Assesses one incident in isolation: keyword category classification,
//! resolution-time estimate, priority score, escalation check, a category
//! playbook, and automated action suggestions. Unlike the correlation
//! pipeline this needs no batch context, so it is a separate entry point.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use causeway_core::{IncidentRecord, Severity};

/// Fixed confidence attached to every resolution estimate.
pub const RESOLUTION_CONFIDENCE: f64 = 0.75;

const NETWORK_KEYWORDS: &[&str] = &["network", "connectivity", "internet", "vpn", "dns", "firewall"];
const APPLICATION_KEYWORDS: &[&str] = &["application", "software", "app", "service", "api"];
const HARDWARE_KEYWORDS: &[&str] = &["hardware", "server", "disk", "memory", "cpu", "storage"];
const SECURITY_KEYWORDS: &[&str] = &["security", "breach", "unauthorized", "malware", "virus"];

/// Keyword tables in classification order; earlier entries win score ties.
const CATEGORY_TABLES: &[(Category, &[&str])] = &[
    (Category::Network, NETWORK_KEYWORDS),
    (Category::Application, APPLICATION_KEYWORDS),
    (Category::Hardware, HARDWARE_KEYWORDS),
    (Category::Security, SECURITY_KEYWORDS),
];

// =============================================================================
// ASSESSMENT TYPES
// =============================================================================

/// Incident category derived from keyword classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Network,
    Application,
    Hardware,
    Security,
    /// Fallback when no keyword table matches.
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Application => "application",
            Self::Hardware => "hardware",
            Self::Security => "security",
            Self::General => "general",
        }
    }

    /// Resolution-time multiplier for the category.
    fn resolution_multiplier(&self) -> f64 {
        match self {
            Self::Network => 1.5,
            Self::Hardware => 2.0,
            Self::Application => 1.2,
            Self::Security => 1.8,
            Self::General => 1.0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub primary_category: Category,
    /// Per-category keyword hit ratio; categories without hits are omitted.
    pub category_scores: BTreeMap<Category, f64>,
    /// Hit ratio of the winning category, 0.0 when nothing matched.
    pub confidence: f64,
}

/// Estimated time to resolve, with the inputs that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionEstimate {
    pub predicted_hours: f64,
    pub confidence: f64,
    pub factors: ResolutionFactors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionFactors {
    pub severity: Severity,
    pub category: Category,
    pub base_time_hours: f64,
    pub category_multiplier: f64,
}

/// Complete triage assessment for one incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub incident_id: String,
    pub category: Category,
    pub category_scores: BTreeMap<Category, f64>,
    pub classification_confidence: f64,
    pub predicted_resolution: ResolutionEstimate,
    /// Ordered playbook steps for a responder.
    pub recommendations: Vec<String>,
    pub priority_score: u32,
    pub escalation_required: bool,
    pub automated_actions: Vec<String>,
    pub analysis_timestamp: DateTime<Utc>,
}

// =============================================================================
// TRIAGE
// =============================================================================

/// Assesses single incidents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncidentTriage;

impl IncidentTriage {
    pub fn new() -> Self {
        Self
    }

    /// Full assessment of one incident at the given analysis time.
    pub fn assess(&self, incident: &IncidentRecord, now: DateTime<Utc>) -> TriageAssessment {
        let classification = self.classify(incident);
        let category = classification.primary_category;

        let assessment = TriageAssessment {
            incident_id: incident.id.clone(),
            category,
            classification_confidence: classification.confidence,
            category_scores: classification.category_scores,
            predicted_resolution: self.estimate_resolution(incident.severity, category),
            recommendations: self.playbook(category, incident.severity),
            priority_score: self.priority_score(incident.severity, &incident.affected_systems),
            escalation_required: self
                .escalation_required(incident.severity, &incident.affected_systems),
            automated_actions: self.automated_actions(category),
            analysis_timestamp: now,
        };
        debug!(
            incident_id = %assessment.incident_id,
            category = %assessment.category,
            priority = assessment.priority_score,
            "Triage assessment complete"
        );
        assessment
    }

    /// Classify by keyword hits over the lowercased title and description.
    ///
    /// Each category scores hits divided by its table size; the highest score
    /// wins and ties keep the earlier table. Keyword matching is substring
    /// containment, so "networking" counts as a "network" hit.
    pub fn classify(&self, incident: &IncidentRecord) -> Classification {
        let text = incident.correlation_text().to_lowercase();

        let mut category_scores = BTreeMap::new();
        let mut primary_category = Category::General;
        let mut confidence = 0.0;

        for (category, keywords) in CATEGORY_TABLES {
            let hits = keywords
                .iter()
                .filter(|keyword| text.contains(**keyword))
                .count();
            if hits == 0 {
                continue;
            }
            let score = hits as f64 / keywords.len() as f64;
            category_scores.insert(*category, score);
            if score > confidence {
                confidence = score;
                primary_category = *category;
            }
        }

        Classification {
            primary_category,
            category_scores,
            confidence,
        }
    }

    /// Base hours by severity scaled by the category multiplier.
    pub fn estimate_resolution(&self, severity: Severity, category: Category) -> ResolutionEstimate {
        let base_time_hours = match severity {
            Severity::Critical => 2.0,
            Severity::High => 8.0,
            Severity::Medium => 24.0,
            Severity::Low => 72.0,
        };
        let category_multiplier = category.resolution_multiplier();

        ResolutionEstimate {
            predicted_hours: base_time_hours * category_multiplier,
            confidence: RESOLUTION_CONFIDENCE,
            factors: ResolutionFactors {
                severity,
                category,
                base_time_hours,
                category_multiplier,
            },
        }
    }

    /// Severity base score plus system impact, capped at five systems.
    pub fn priority_score(&self, severity: Severity, affected_systems: &[String]) -> u32 {
        let base_score = match severity {
            Severity::Critical => 10,
            Severity::High => 7,
            Severity::Medium => 4,
            Severity::Low => 1,
        };
        base_score + (affected_systems.len() as u32).min(5)
    }

    /// Critical and high incidents always escalate, as does any incident
    /// touching more than ten systems.
    pub fn escalation_required(&self, severity: Severity, affected_systems: &[String]) -> bool {
        severity.is_actionable() || affected_systems.len() > 10
    }

    /// Ordered responder playbook for the category. Critical and high
    /// severities gain an escalation step up front and a stakeholder step at
    /// the end.
    pub fn playbook(&self, category: Category, severity: Severity) -> Vec<String> {
        let base: &[&str] = match category {
            Category::Network => &[
                "Check network connectivity and routing",
                "Verify firewall rules and configurations",
                "Test DNS resolution",
                "Monitor network traffic patterns",
            ],
            Category::Application => &[
                "Check application logs for errors",
                "Verify service dependencies",
                "Monitor resource utilization",
                "Test application endpoints",
            ],
            Category::Hardware => &[
                "Check hardware health status",
                "Monitor system resources",
                "Verify hardware connections",
                "Review system logs",
            ],
            Category::Security => &[
                "Isolate affected systems",
                "Review security logs",
                "Check for unauthorized access",
                "Update security policies",
            ],
            Category::General => &[],
        };

        let mut steps: Vec<String> = base.iter().map(|step| step.to_string()).collect();
        if severity.is_actionable() {
            steps.insert(0, "Escalate to senior technician immediately".to_string());
            steps.push("Prepare communication for stakeholders".to_string());
        }
        steps
    }

    /// Automated remediation suggestions. Security incidents get none, since
    /// containment there needs a human decision.
    pub fn automated_actions(&self, category: Category) -> Vec<String> {
        let actions: &[&str] = match category {
            Category::Network => &[
                "Run network diagnostics",
                "Restart network services",
                "Check interface status",
            ],
            Category::Application => &[
                "Restart application services",
                "Clear application cache",
                "Check database connectivity",
            ],
            Category::Hardware => &[
                "Run hardware diagnostics",
                "Check system health",
                "Monitor resource usage",
            ],
            Category::Security | Category::General => &[],
        };
        actions.iter().map(|action| action.to_string()).collect()
    }
}

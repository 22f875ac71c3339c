//! Root-cause identification.
//!
//! Applies a fixed, ordered rule set to problem groups and to whole incident
//! batches. Rules are independent predicates; several may fire for the same
//! input, and each carries a fixed confidence assigned by the rule itself.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clustering::{GroupId, ProblemGroup};
use crate::patterns::{CommonFactors, TimelineAnalysis, TimelinePatternKind};

// =============================================================================
// RULE CONFIDENCES
// =============================================================================

pub const CONFIDENCE_SYSTEM_SPECIFIC: f64 = 0.8;
pub const CONFIDENCE_SHARED_DEPENDENCY: f64 = 0.7;
pub const CONFIDENCE_NETWORK_INFRASTRUCTURE: f64 = 0.75;
pub const CONFIDENCE_RESOURCE_CONSTRAINT: f64 = 0.7;
pub const CONFIDENCE_TRIGGERING_EVENT: f64 = 0.8;
pub const CONFIDENCE_SYSTEM_FAILURE: f64 = 0.75;
pub const CONFIDENCE_INFRASTRUCTURE_ISSUE: f64 = 0.7;

// =============================================================================
// CANDIDATE TYPES
// =============================================================================

/// Fixed vocabulary of cause classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseKind {
    SystemSpecific,
    SharedDependency,
    NetworkInfrastructure,
    ResourceConstraint,
    TriggeringEvent,
    SystemFailure,
    InfrastructureIssue,
}

impl CauseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemSpecific => "system_specific",
            Self::SharedDependency => "shared_dependency",
            Self::NetworkInfrastructure => "network_infrastructure",
            Self::ResourceConstraint => "resource_constraint",
            Self::TriggeringEvent => "triggering_event",
            Self::SystemFailure => "system_failure",
            Self::InfrastructureIssue => "infrastructure_issue",
        }
    }
}

impl fmt::Display for CauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate cause emitted by a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootCauseCandidate {
    #[serde(rename = "type")]
    pub kind: CauseKind,
    pub description: String,
    /// Fixed per-rule confidence in (0, 1].
    pub confidence: f64,
    pub evidence: String,
}

/// Candidate causes for one problem group, in rule-emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRootCauses {
    pub group_id: GroupId,
    pub potential_causes: Vec<RootCauseCandidate>,
    pub recommended_investigation: Vec<String>,
}

// =============================================================================
// IDENTIFIER
// =============================================================================

/// Applies the cause rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CauseIdentifier;

impl CauseIdentifier {
    pub fn new() -> Self {
        Self
    }

    /// Candidate causes plus investigation steps for each group.
    pub fn analyze_groups(&self, groups: &[ProblemGroup]) -> Vec<GroupRootCauses> {
        groups
            .iter()
            .map(|group| {
                let potential_causes = self.group_causes(group);
                let recommended_investigation = self.investigation_steps(&potential_causes);
                debug!(
                    group_id = %group.group_id,
                    causes = potential_causes.len(),
                    "Identified candidate causes"
                );
                GroupRootCauses {
                    group_id: group.group_id,
                    potential_causes,
                    recommended_investigation,
                }
            })
            .collect()
    }

    /// Group rule set, in emission order.
    ///
    /// The system rules are exclusive alternatives; the symptom rules fire
    /// independently of them and of each other.
    pub fn group_causes(&self, group: &ProblemGroup) -> Vec<RootCauseCandidate> {
        let mut causes = Vec::new();

        if group.affected_systems.len() == 1 {
            let system = &group.affected_systems[0];
            causes.push(RootCauseCandidate {
                kind: CauseKind::SystemSpecific,
                description: format!("Issue specific to {}", system),
                confidence: CONFIDENCE_SYSTEM_SPECIFIC,
                evidence: format!("All incidents affect only {}", system),
            });
        } else {
            let mentions = group.raw_system_mentions();
            let distinct: HashSet<&String> = mentions.iter().collect();
            if distinct.len() < mentions.len() {
                causes.push(RootCauseCandidate {
                    kind: CauseKind::SharedDependency,
                    description: "Issue with shared system dependency".to_string(),
                    confidence: CONFIDENCE_SHARED_DEPENDENCY,
                    evidence: format!(
                        "Multiple systems affected: {}",
                        group.affected_systems.join(", ")
                    ),
                });
            }
        }

        let joined_symptoms = group.common_symptoms.join(" ").to_lowercase();
        if joined_symptoms.contains("network") {
            causes.push(RootCauseCandidate {
                kind: CauseKind::NetworkInfrastructure,
                description: "Network infrastructure issue".to_string(),
                confidence: CONFIDENCE_NETWORK_INFRASTRUCTURE,
                evidence: "Network-related symptoms detected".to_string(),
            });
        }
        if joined_symptoms.contains("performance") {
            causes.push(RootCauseCandidate {
                kind: CauseKind::ResourceConstraint,
                description: "System resource constraints".to_string(),
                confidence: CONFIDENCE_RESOURCE_CONSTRAINT,
                evidence: "Performance-related symptoms detected".to_string(),
            });
        }

        causes
    }

    /// Whole-batch rule set used by root-cause analysis.
    pub fn batch_causes(
        &self,
        factors: &CommonFactors,
        timeline: &TimelineAnalysis,
    ) -> Vec<RootCauseCandidate> {
        let mut causes = Vec::new();

        if timeline.pattern_type == TimelinePatternKind::Burst {
            causes.push(RootCauseCandidate {
                kind: CauseKind::TriggeringEvent,
                description: "Single triggering event causing cascade of incidents".to_string(),
                confidence: CONFIDENCE_TRIGGERING_EVENT,
                evidence: format!(
                    "Incidents clustered within {:.1} hours",
                    timeline.time_span_hours
                ),
            });
        }

        if factors.top_system_count > 1 {
            if let Some(system) = factors.common_systems.first() {
                causes.push(RootCauseCandidate {
                    kind: CauseKind::SystemFailure,
                    description: format!("Failure in common system: {}", system),
                    confidence: CONFIDENCE_SYSTEM_FAILURE,
                    evidence: format!("System {} involved in multiple incidents", system),
                });
            }
        }

        if factors.most_common_severity.is_actionable() {
            causes.push(RootCauseCandidate {
                kind: CauseKind::InfrastructureIssue,
                description: "Critical infrastructure component failure".to_string(),
                confidence: CONFIDENCE_INFRASTRUCTURE_ISSUE,
                evidence: format!("High severity incidents: {}", factors.most_common_severity),
            });
        }

        causes
    }

    /// Investigation steps for a candidate list, deduplicated in first-seen
    /// order. Only some cause kinds map to steps.
    pub fn investigation_steps(&self, causes: &[RootCauseCandidate]) -> Vec<String> {
        let mut steps: Vec<String> = Vec::new();

        for cause in causes {
            let batch: &[&str] = match cause.kind {
                CauseKind::SystemSpecific => &[
                    "Review system logs and performance metrics",
                    "Check system configuration changes",
                    "Verify system resource utilization",
                ],
                CauseKind::NetworkInfrastructure => &[
                    "Analyze network traffic patterns",
                    "Check network device logs",
                    "Verify network configuration",
                ],
                CauseKind::ResourceConstraint => &[
                    "Monitor CPU, memory, and disk usage",
                    "Review capacity planning metrics",
                    "Check for resource bottlenecks",
                ],
                _ => &[],
            };
            steps.extend(batch.iter().map(|step| step.to_string()));
        }

        let mut seen = HashSet::new();
        steps.retain(|step| seen.insert(step.clone()));
        steps
    }
}

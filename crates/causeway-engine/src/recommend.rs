//! Recommendation generation.
//!
//! Turns patterns and ranked causes into actionable recommendations.
//! Emission order is fixed: temporal recommendations first, then system,
//! then corrective, each following the order of its source collection. No
//! cross-recommendation deduplication happens even when two rules describe
//! the same underlying issue.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::{PatternSet, TemporalPatternKind};
use crate::ranking::GroupRankedCauses;

/// Causes at or below this confidence produce no corrective recommendation.
pub const RECOMMENDATION_CONFIDENCE_FLOOR: f64 = 0.7;
/// Corrective recommendations above this confidence are high priority.
pub const HIGH_PRIORITY_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Preventive,
    Infrastructure,
    Corrective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

/// One actionable recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub description: String,
    pub action: String,
}

/// Derives recommendations from patterns and per-group ranked causes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(
        &self,
        patterns: &PatternSet,
        ranked_by_group: &[GroupRankedCauses],
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for pattern in &patterns.temporal_patterns {
            if pattern.pattern_type == TemporalPatternKind::Recurring {
                recommendations.push(Recommendation {
                    kind: RecommendationKind::Preventive,
                    priority: Priority::High,
                    description: format!(
                        "Implement proactive monitoring for group {}",
                        pattern.group_id
                    ),
                    action: format!(
                        "Set up alerts for early detection of recurring pattern (avg interval: {:.1}h)",
                        pattern.average_interval_hours
                    ),
                });
            }
        }

        for pattern in &patterns.system_patterns {
            if pattern.system_count > 1 {
                recommendations.push(Recommendation {
                    kind: RecommendationKind::Infrastructure,
                    priority: Priority::Medium,
                    description: format!(
                        "Review shared dependencies for group {}",
                        pattern.group_id
                    ),
                    action: format!(
                        "Analyze common infrastructure components affecting: {}",
                        pattern.affected_systems.join(", ")
                    ),
                });
            }
        }

        for group in ranked_by_group {
            for cause in &group.ranked_causes {
                if cause.confidence > RECOMMENDATION_CONFIDENCE_FLOOR {
                    recommendations.push(Recommendation {
                        kind: RecommendationKind::Corrective,
                        priority: if cause.confidence > HIGH_PRIORITY_CONFIDENCE {
                            Priority::High
                        } else {
                            Priority::Medium
                        },
                        description: format!(
                            "Address {} for group {}",
                            cause.kind, group.group_id
                        ),
                        action: cause.description.clone(),
                    });
                }
            }
        }

        debug!(count = recommendations.len(), "Generated recommendations");
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::causes::{CauseKind, RootCauseCandidate};
    use crate::clustering::GroupId;
    use crate::patterns::{SystemPattern, TemporalPattern};
    use crate::ranking::rank_causes;

    fn create_test_patterns() -> PatternSet {
        PatternSet::default()
    }

    fn create_test_ranked_group(
        group_id: u32,
        causes: Vec<RootCauseCandidate>,
    ) -> GroupRankedCauses {
        GroupRankedCauses {
            group_id: GroupId(group_id),
            ranked_causes: rank_causes(&causes),
        }
    }

    fn create_test_cause(kind: CauseKind, confidence: f64) -> RootCauseCandidate {
        RootCauseCandidate {
            kind,
            description: "Test cause description".to_string(),
            confidence,
            evidence: "test evidence".to_string(),
        }
    }

    #[test]
    fn test_recurring_pattern_yields_preventive() {
        let mut patterns = create_test_patterns();
        patterns.temporal_patterns.push(TemporalPattern {
            group_id: GroupId(1),
            average_interval_hours: 24.0,
            pattern_type: TemporalPatternKind::Recurring,
        });
        let recommendations = RecommendationEngine::new().generate(&patterns, &[]);
        assert_eq!(recommendations.len(), 1);
        let recommendation = &recommendations[0];
        assert_eq!(recommendation.kind, RecommendationKind::Preventive);
        assert_eq!(recommendation.priority, Priority::High);
        assert_eq!(
            recommendation.description,
            "Implement proactive monitoring for group GRP-1"
        );
        assert_eq!(
            recommendation.action,
            "Set up alerts for early detection of recurring pattern (avg interval: 24.0h)"
        );
    }

    #[test]
    fn test_sporadic_pattern_yields_nothing() {
        let mut patterns = create_test_patterns();
        patterns.temporal_patterns.push(TemporalPattern {
            group_id: GroupId(1),
            average_interval_hours: 400.0,
            pattern_type: TemporalPatternKind::Sporadic,
        });
        assert!(RecommendationEngine::new().generate(&patterns, &[]).is_empty());
    }

    #[test]
    fn test_multi_system_pattern_yields_infrastructure() {
        let mut patterns = create_test_patterns();
        patterns.system_patterns.push(SystemPattern {
            group_id: GroupId(2),
            affected_systems: vec!["db-1".to_string(), "api".to_string()],
            system_count: 2,
        });
        let recommendations = RecommendationEngine::new().generate(&patterns, &[]);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].kind, RecommendationKind::Infrastructure);
        assert_eq!(recommendations[0].priority, Priority::Medium);
        assert_eq!(
            recommendations[0].description,
            "Review shared dependencies for group GRP-2"
        );
        assert_eq!(
            recommendations[0].action,
            "Analyze common infrastructure components affecting: db-1, api"
        );
    }

    #[test]
    fn test_single_system_pattern_yields_nothing() {
        let mut patterns = create_test_patterns();
        patterns.system_patterns.push(SystemPattern {
            group_id: GroupId(1),
            affected_systems: vec!["db-1".to_string()],
            system_count: 1,
        });
        assert!(RecommendationEngine::new().generate(&patterns, &[]).is_empty());
    }

    #[test]
    fn test_corrective_floor_is_exclusive() {
        let groups = vec![create_test_ranked_group(
            1,
            vec![
                create_test_cause(CauseKind::SharedDependency, 0.7),
                create_test_cause(CauseKind::NetworkInfrastructure, 0.75),
            ],
        )];
        let recommendations =
            RecommendationEngine::new().generate(&create_test_patterns(), &groups);
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].kind, RecommendationKind::Corrective);
        assert_eq!(recommendations[0].priority, Priority::Medium);
        assert_eq!(
            recommendations[0].description,
            "Address network_infrastructure for group GRP-1"
        );
        assert_eq!(recommendations[0].action, "Test cause description");
    }

    #[test]
    fn test_corrective_priority_boundary() {
        let groups = vec![create_test_ranked_group(
            1,
            vec![
                create_test_cause(CauseKind::SystemSpecific, 0.8),
                create_test_cause(CauseKind::TriggeringEvent, 0.9),
            ],
        )];
        let recommendations =
            RecommendationEngine::new().generate(&create_test_patterns(), &groups);
        assert_eq!(recommendations.len(), 2);
        // Ranked order puts 0.9 first; 0.8 sits on the exclusive
        // high-priority boundary.
        assert_eq!(recommendations[0].priority, Priority::High);
        assert_eq!(
            recommendations[0].description,
            "Address triggering_event for group GRP-1"
        );
        assert_eq!(recommendations[1].priority, Priority::Medium);
    }

    #[test]
    fn test_emission_order_temporal_system_corrective() {
        let mut patterns = create_test_patterns();
        patterns.temporal_patterns.push(TemporalPattern {
            group_id: GroupId(1),
            average_interval_hours: 12.0,
            pattern_type: TemporalPatternKind::Recurring,
        });
        patterns.system_patterns.push(SystemPattern {
            group_id: GroupId(1),
            affected_systems: vec!["db-1".to_string(), "api".to_string()],
            system_count: 2,
        });
        let groups = vec![create_test_ranked_group(
            1,
            vec![create_test_cause(CauseKind::SystemSpecific, 0.8)],
        )];
        let recommendations = RecommendationEngine::new().generate(&patterns, &groups);
        let kinds: Vec<RecommendationKind> =
            recommendations.iter().map(|rec| rec.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::Preventive,
                RecommendationKind::Infrastructure,
                RecommendationKind::Corrective,
            ]
        );
    }

    #[test]
    fn test_no_deduplication_across_groups() {
        let mut patterns = create_test_patterns();
        for group_id in [1, 2] {
            patterns.temporal_patterns.push(TemporalPattern {
                group_id: GroupId(group_id),
                average_interval_hours: 24.0,
                pattern_type: TemporalPatternKind::Recurring,
            });
        }
        let recommendations = RecommendationEngine::new().generate(&patterns, &[]);
        assert_eq!(recommendations.len(), 2);
        assert_ne!(recommendations[0].description, recommendations[1].description);
    }

    #[test]
    fn test_wire_shape_uses_lowercase_tags() {
        let groups = vec![create_test_ranked_group(
            1,
            vec![create_test_cause(CauseKind::SystemSpecific, 0.8)],
        )];
        let recommendations =
            RecommendationEngine::new().generate(&create_test_patterns(), &groups);
        let value = serde_json::to_value(&recommendations[0]).unwrap();
        assert_eq!(value["type"], "corrective");
        assert_eq!(value["priority"], "medium");
    }
}

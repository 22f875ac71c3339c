//! Root-cause ranking.
//!
//! Orders candidate causes by confidence and derives a coarse likelihood tier
//! plus an aggregate confidence score for the whole ranked list. Confidence
//! values are never modified, only ordered and annotated.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::causes::{CauseKind, GroupRootCauses, RootCauseCandidate};
use crate::clustering::GroupId;

/// Coarse confidence tier.
///
/// Serialized capitalized, unlike the lowercase tags elsewhere on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Likelihood {
    High,
    Medium,
    Low,
}

impl Likelihood {
    /// Tier for a confidence value: High above 0.8, Medium above 0.6,
    /// otherwise Low. Both boundaries are exclusive.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            Self::High
        } else if confidence > 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// A candidate cause annotated with its rank position and likelihood tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCause {
    #[serde(rename = "type")]
    pub kind: CauseKind,
    pub description: String,
    pub confidence: f64,
    pub evidence: String,
    /// 1-based position, highest confidence first.
    pub rank: usize,
    pub likelihood: Likelihood,
}

/// Rank candidates by descending confidence.
///
/// The sort is stable, so candidates with equal confidence keep their
/// rule-emission order.
pub fn rank_causes(causes: &[RootCauseCandidate]) -> Vec<RankedCause> {
    let mut ordered = causes.to_vec();
    ordered.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, cause)| RankedCause {
            rank: index + 1,
            likelihood: Likelihood::from_confidence(cause.confidence),
            kind: cause.kind,
            description: cause.description,
            confidence: cause.confidence,
            evidence: cause.evidence,
        })
        .collect()
}

/// Ranked view of one group's candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRankedCauses {
    pub group_id: GroupId,
    pub ranked_causes: Vec<RankedCause>,
}

/// Rank every group's candidates independently.
pub fn rank_groups(groups: &[GroupRootCauses]) -> Vec<GroupRankedCauses> {
    groups
        .iter()
        .map(|group| GroupRankedCauses {
            group_id: group.group_id,
            ranked_causes: rank_causes(&group.potential_causes),
        })
        .collect()
}

/// Aggregate confidence for a ranked list, weighting earlier ranks more:
/// `sum(confidence / rank) / sum(1 / rank)`. Empty input scores 0.0.
pub fn aggregate_confidence(ranked: &[RankedCause]) -> f64 {
    if ranked.is_empty() {
        return 0.0;
    }
    let total_weight: f64 = (1..=ranked.len()).map(|rank| 1.0 / rank as f64).sum();
    let weighted: f64 = ranked
        .iter()
        .map(|cause| cause.confidence / cause.rank as f64)
        .sum();
    weighted / total_weight
}

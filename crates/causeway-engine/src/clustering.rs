//! Incident clustering.
//!
//! Groups a batch of incidents into problem groups with a greedy single-pass
//! anchor scan. Each unclaimed incident becomes an anchor and claims every
//! later unclaimed incident whose similarity to the anchor meets the
//! threshold. Claims are final: members of a candidate group that ends up
//! below the minimum size are discarded, not retried against later anchors.
//! Membership is anchored, not transitive, and depends on input order.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use causeway_core::{AnalysisSettings, IncidentRecord};

use crate::counting::OrderedCounter;
use crate::similarity;

// =============================================================================
// GROUP TYPES
// =============================================================================

/// 1-based group sequence id, rendered as `GRP-<n>`.
///
/// Stable only within a single analysis run; two runs may reuse the same
/// numbers for unrelated groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GRP-{}", self.0)
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.strip_prefix("GRP-").unwrap_or(&raw);
        digits
            .parse::<u32>()
            .map(GroupId)
            .map_err(|_| de::Error::custom(format!("invalid group id: {}", raw)))
    }
}

/// A cluster of similar incidents treated as one underlying problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemGroup {
    /// Sequence id, 1-based in discovery order.
    pub group_id: GroupId,
    /// Number of member incidents.
    pub incident_count: usize,
    /// Members in discovery order; the anchor incident is first.
    pub incidents: Vec<IncidentRecord>,
    /// Top symptom tokens across members, most frequent first; ties keep
    /// first-seen order.
    pub common_symptoms: Vec<String>,
    /// Union of member system lists in first-seen order.
    pub affected_systems: Vec<String>,
    /// Member count over the total incidents considered in the run.
    pub frequency: f64,
}

impl ProblemGroup {
    /// Raw concatenation of member system lists, duplicates preserved.
    ///
    /// Cause rules need to distinguish "several members name the same
    /// system" from the deduplicated union, so both views exist.
    pub fn raw_system_mentions(&self) -> Vec<String> {
        self.incidents
            .iter()
            .flat_map(|incident| incident.affected_systems.iter().cloned())
            .collect()
    }
}

// =============================================================================
// CLUSTERER
// =============================================================================

/// Greedy single-pass incident clusterer.
#[derive(Debug, Clone)]
pub struct IncidentClusterer {
    settings: AnalysisSettings,
}

impl IncidentClusterer {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    /// Cluster a batch into problem groups.
    ///
    /// Groups come back in discovery order with sequential ids; every group
    /// has at least `min_group_size` members.
    pub fn cluster(&self, incidents: &[IncidentRecord]) -> Vec<ProblemGroup> {
        let total = incidents.len();
        if total == 0 {
            return Vec::new();
        }

        let token_sets: Vec<_> = incidents.iter().map(similarity::incident_tokens).collect();
        let mut claimed = vec![false; total];
        let mut groups = Vec::new();

        for anchor in 0..total {
            if claimed[anchor] {
                continue;
            }
            claimed[anchor] = true;
            let mut members = vec![anchor];

            for candidate in (anchor + 1)..total {
                if claimed[candidate] {
                    continue;
                }
                let score = similarity::jaccard(&token_sets[anchor], &token_sets[candidate]);
                if score >= self.settings.similarity_threshold {
                    claimed[candidate] = true;
                    members.push(candidate);
                }
            }

            if members.len() >= self.settings.min_group_size {
                let group_id = GroupId(groups.len() as u32 + 1);
                groups.push(self.build_group(group_id, &members, incidents, total));
            } else if members.len() > 1 {
                debug!(
                    anchor = %incidents[anchor].id,
                    members = members.len(),
                    "Discarding under-sized candidate group"
                );
            }
        }

        debug!(
            groups = groups.len(),
            incidents = total,
            threshold = self.settings.similarity_threshold,
            "Clustering complete"
        );
        groups
    }

    fn build_group(
        &self,
        group_id: GroupId,
        members: &[usize],
        incidents: &[IncidentRecord],
        total: usize,
    ) -> ProblemGroup {
        let records: Vec<IncidentRecord> = members
            .iter()
            .map(|&index| incidents[index].clone())
            .collect();
        let common_symptoms = top_symptoms(&records, self.settings.max_common_symptoms);
        let affected_systems = system_union(&records);

        ProblemGroup {
            group_id,
            incident_count: records.len(),
            common_symptoms,
            affected_systems,
            frequency: records.len() as f64 / total as f64,
            incidents: records,
        }
    }
}

/// Most frequent symptom tokens across records; ties keep first-seen order.
fn top_symptoms(records: &[IncidentRecord], limit: usize) -> Vec<String> {
    let mut counter = OrderedCounter::new();
    for record in records {
        counter.extend(record.effective_symptoms());
    }
    counter
        .most_common(limit)
        .into_iter()
        .map(|(symptom, _)| symptom)
        .collect()
}

/// First-seen-ordered union of member system lists.
fn system_union(records: &[IncidentRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut union = Vec::new();
    for record in records {
        for system in &record.affected_systems {
            if seen.insert(system.clone()) {
                union.push(system.clone());
            }
        }
    }
    union
}

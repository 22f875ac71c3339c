//! Analysis orchestration.
//!
//! `ProblemAnalyzer` wires the pipeline stages together behind the two
//! public operations: recurring-problem analysis over a timeframe-filtered
//! batch, and root-cause analysis over a whole batch treated as one notional
//! group. Each invocation is independent; nothing computed in one call
//! influences the next beyond the observational counters.

use std::sync::RwLock;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use causeway_core::{AnalysisSettings, Error, IncidentRecord, Result};

use crate::causes::{CauseIdentifier, GroupRootCauses, RootCauseCandidate};
use crate::clustering::{IncidentClusterer, ProblemGroup};
use crate::patterns::{CommonFactors, PatternAnalyzer, PatternSet, TimelineAnalysis};
use crate::ranking::{self, GroupRankedCauses, RankedCause};
use crate::recommend::{Recommendation, RecommendationEngine};

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Result of a recurring-problem analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemAnalysis {
    /// Opaque id for log correlation, not globally unique.
    pub analysis_id: String,
    pub timeframe_days: i64,
    /// Incidents that survived the timeframe filter.
    pub total_incidents: usize,
    pub problem_groups: Vec<ProblemGroup>,
    pub patterns: PatternSet,
    /// Per-group candidates in rule-emission order, with investigation steps.
    pub root_causes: Vec<GroupRootCauses>,
    /// Per-group candidates in confidence order.
    pub ranked_causes: Vec<GroupRankedCauses>,
    pub recommendations: Vec<Recommendation>,
    pub analysis_timestamp: DateTime<Utc>,
    pub metadata: AnalysisMetadata,
}

/// Result of a whole-batch root-cause analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootCauseAnalysis {
    pub root_cause_analysis_id: String,
    pub incident_count: usize,
    pub common_factors: CommonFactors,
    pub timeline_analysis: TimelineAnalysis,
    /// Candidates in rule-emission order.
    pub potential_causes: Vec<RootCauseCandidate>,
    /// Candidates in confidence order.
    pub ranked_causes: Vec<RankedCause>,
    /// Rank-weighted aggregate over the ranked candidates.
    pub confidence_score: f64,
    pub analysis_timestamp: DateTime<Utc>,
    pub metadata: AnalysisMetadata,
}

/// Per-run bookkeeping stamped on every result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub processing_ms: u64,
    /// Hex sha-256 over the serialized input batch.
    pub inputs_hash: String,
    /// Batch size before any filtering.
    pub incidents_submitted: usize,
    /// Submitted incidents lacking a creation time. These pass the timeframe
    /// filter and collapse onto the analysis time in interval math.
    pub incidents_missing_timestamp: usize,
}

/// Observational counters across the analyzer's lifetime.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnalyzerStats {
    pub problem_analyses: u64,
    pub root_cause_analyses: u64,
    pub incidents_processed: u64,
    pub groups_identified: u64,
    pub last_analysis_at: Option<DateTime<Utc>>,
}

// =============================================================================
// ANALYZER
// =============================================================================

/// Pipeline orchestrator.
#[derive(Debug)]
pub struct ProblemAnalyzer {
    settings: AnalysisSettings,
    clusterer: IncidentClusterer,
    patterns: PatternAnalyzer,
    causes: CauseIdentifier,
    recommender: RecommendationEngine,
    stats: RwLock<AnalyzerStats>,
}

impl ProblemAnalyzer {
    /// Create an analyzer, rejecting invalid settings.
    pub fn new(settings: AnalysisSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_validated(settings))
    }

    pub fn with_defaults() -> Self {
        Self::from_validated(AnalysisSettings::default())
    }

    fn from_validated(settings: AnalysisSettings) -> Self {
        Self {
            clusterer: IncidentClusterer::new(settings.clone()),
            patterns: PatternAnalyzer::new(settings.clone()),
            causes: CauseIdentifier::new(),
            recommender: RecommendationEngine::new(),
            stats: RwLock::new(AnalyzerStats::default()),
            settings,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Snapshot of the lifetime counters.
    pub fn stats(&self) -> AnalyzerStats {
        *self.stats.read().unwrap()
    }

    /// Cluster a timeframe-filtered batch into problem groups and derive
    /// patterns, causes, and recommendations.
    ///
    /// `timeframe_days` falls back to the configured default; negative values
    /// are an invalid-argument error. Incidents are kept when their creation
    /// time is strictly after `now - timeframe_days`, with missing creation
    /// times treated as `now` so they always pass.
    pub fn analyze_recurring_problems(
        &self,
        incidents: &[IncidentRecord],
        timeframe_days: Option<i64>,
    ) -> Result<ProblemAnalysis> {
        let timeframe_days = timeframe_days.unwrap_or(self.settings.default_timeframe_days);
        if timeframe_days < 0 {
            return Err(Error::invalid_argument(format!(
                "timeframe_days must be non-negative, got {}",
                timeframe_days
            )));
        }

        let start = Instant::now();
        let now = Utc::now();
        info!(
            incidents = incidents.len(),
            timeframe_days, "Recurring-problem analysis invoked"
        );
        let inputs_hash = hash_inputs(incidents);

        let cutoff = now - Duration::days(timeframe_days);
        let recent: Vec<IncidentRecord> = incidents
            .iter()
            .filter(|incident| incident.created_at_or(now) > cutoff)
            .cloned()
            .collect();
        debug!(
            submitted = incidents.len(),
            recent = recent.len(),
            "Applied timeframe filter"
        );

        let problem_groups = self.clusterer.cluster(&recent);
        let patterns = self.patterns.analyze(&problem_groups, now);
        let root_causes = self.causes.analyze_groups(&problem_groups);
        let ranked_causes = ranking::rank_groups(&root_causes);
        let recommendations = self.recommender.generate(&patterns, &ranked_causes);

        let metadata = AnalysisMetadata {
            processing_ms: start.elapsed().as_millis() as u64,
            inputs_hash,
            incidents_submitted: incidents.len(),
            incidents_missing_timestamp: count_missing_timestamps(incidents),
        };

        {
            let mut stats = self.stats.write().unwrap();
            stats.problem_analyses += 1;
            stats.incidents_processed += recent.len() as u64;
            stats.groups_identified += problem_groups.len() as u64;
            stats.last_analysis_at = Some(now);
        }
        self.emit_telemetry("problems", problem_groups.len(), metadata.processing_ms);

        info!(
            groups = problem_groups.len(),
            recommendations = recommendations.len(),
            processing_ms = metadata.processing_ms,
            "Recurring-problem analysis complete"
        );

        Ok(ProblemAnalysis {
            analysis_id: make_analysis_id("PROB", now),
            timeframe_days,
            total_incidents: recent.len(),
            problem_groups,
            patterns,
            root_causes,
            ranked_causes,
            recommendations,
            analysis_timestamp: now,
            metadata,
        })
    }

    /// Treat the whole batch as one notional group and rank its candidate
    /// causes. Empty batches produce a complete, empty-valued result.
    pub fn find_root_cause(&self, incidents: &[IncidentRecord]) -> RootCauseAnalysis {
        let start = Instant::now();
        let now = Utc::now();
        info!(incidents = incidents.len(), "Root-cause analysis invoked");
        let inputs_hash = hash_inputs(incidents);

        let common_factors = self.patterns.common_factors(incidents, now);
        let timeline_analysis = self.patterns.timeline(incidents, now);
        let potential_causes = self.causes.batch_causes(&common_factors, &timeline_analysis);
        let ranked_causes = ranking::rank_causes(&potential_causes);
        let confidence_score = ranking::aggregate_confidence(&ranked_causes);

        let metadata = AnalysisMetadata {
            processing_ms: start.elapsed().as_millis() as u64,
            inputs_hash,
            incidents_submitted: incidents.len(),
            incidents_missing_timestamp: count_missing_timestamps(incidents),
        };

        {
            let mut stats = self.stats.write().unwrap();
            stats.root_cause_analyses += 1;
            stats.incidents_processed += incidents.len() as u64;
            stats.last_analysis_at = Some(now);
        }
        self.emit_telemetry("root_cause", 0, metadata.processing_ms);

        info!(
            causes = ranked_causes.len(),
            confidence = confidence_score,
            processing_ms = metadata.processing_ms,
            "Root-cause analysis complete"
        );

        RootCauseAnalysis {
            root_cause_analysis_id: make_analysis_id("RCA", now),
            incident_count: incidents.len(),
            common_factors,
            timeline_analysis,
            potential_causes,
            ranked_causes,
            confidence_score,
            analysis_timestamp: now,
            metadata,
        }
    }

    fn emit_telemetry(&self, operation: &'static str, groups: usize, processing_ms: u64) {
        metrics::counter!("causeway_analyses_total", "operation" => operation).increment(1);
        if groups > 0 {
            metrics::counter!("causeway_problem_groups_total", "operation" => operation)
                .increment(groups as u64);
        }
        metrics::histogram!("causeway_analysis_seconds", "operation" => operation)
            .record(processing_ms as f64 / 1000.0);
    }
}

fn hash_inputs(incidents: &[IncidentRecord]) -> String {
    let mut hasher = Sha256::new();
    let json = serde_json::to_string(incidents).unwrap_or_default();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn count_missing_timestamps(incidents: &[IncidentRecord]) -> usize {
    incidents
        .iter()
        .filter(|incident| incident.created_at.is_none())
        .count()
}

fn make_analysis_id(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, now.format("%Y%m%d%H%M%S"))
}

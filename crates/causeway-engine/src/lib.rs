//! Causeway analysis engine.
//!
//! Correlates operational incidents into recurring problem groups and ranks
//! candidate root causes. The pipeline runs in fixed stages:
//! - `similarity`: Jaccard scoring over incident text
//! - `clustering`: greedy anchor grouping into problem groups
//! - `patterns`: per-group cadence, system, and severity patterns plus
//!   whole-batch timeline and common-factor summaries
//! - `causes` and `ranking`: rule-based candidate causes ordered by
//!   confidence
//! - `recommend`: actionable recommendations from patterns and causes
//!
//! `analyzer::ProblemAnalyzer` wires the stages behind the two public batch
//! operations. `triage` assesses single incidents and needs no batch
//! context. Every stage is synchronous and holds no cross-call state.

pub mod analyzer;
pub mod causes;
pub mod clustering;
mod counting;
pub mod patterns;
pub mod ranking;
pub mod recommend;
pub mod similarity;
pub mod triage;

pub use analyzer::{
    AnalysisMetadata, AnalyzerStats, ProblemAnalysis, ProblemAnalyzer, RootCauseAnalysis,
};
pub use causes::{CauseIdentifier, CauseKind, GroupRootCauses, RootCauseCandidate};
pub use clustering::{GroupId, IncidentClusterer, ProblemGroup};
pub use patterns::{
    CommonFactors, PatternAnalyzer, PatternSet, SeverityPattern, SystemPattern, TemporalPattern,
    TemporalPatternKind, TimeRange, TimelineAnalysis, TimelinePatternKind,
};
pub use ranking::{
    aggregate_confidence, rank_causes, rank_groups, GroupRankedCauses, Likelihood, RankedCause,
};
pub use recommend::{Priority, Recommendation, RecommendationEngine, RecommendationKind};
pub use triage::{
    Category, Classification, IncidentTriage, ResolutionEstimate, TriageAssessment,
};

//! Pattern analysis.
//!
//! Derives per-group temporal, system, and severity patterns from clustered
//! problem groups, and whole-batch timeline and common-factor summaries for
//! root-cause analysis. Incidents without a creation time are treated as
//! occurring at the analysis time, which skews interval math; callers should
//! supply timestamps whenever they have them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use causeway_core::{AnalysisSettings, IncidentRecord, Severity};

use crate::clustering::{GroupId, ProblemGroup};
use crate::counting::OrderedCounter;

// =============================================================================
// PER-GROUP PATTERNS
// =============================================================================

/// Cadence classification for a group's inter-arrival intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalPatternKind {
    /// Mean interval below the recurring threshold (one week by default).
    Recurring,
    /// Mean interval at or above the recurring threshold.
    Sporadic,
}

/// Inter-arrival cadence of one group's incidents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalPattern {
    pub group_id: GroupId,
    pub average_interval_hours: f64,
    pub pattern_type: TemporalPatternKind,
}

/// System footprint of one group, recorded verbatim from the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPattern {
    pub group_id: GroupId,
    pub affected_systems: Vec<String>,
    pub system_count: usize,
}

/// Severity makeup of one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityPattern {
    pub group_id: GroupId,
    pub severity_distribution: BTreeMap<Severity, usize>,
    /// Highest-count severity; ties keep first-encountered order.
    pub most_common_severity: Severity,
}

/// All per-group patterns for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSet {
    pub temporal_patterns: Vec<TemporalPattern>,
    pub system_patterns: Vec<SystemPattern>,
    pub severity_patterns: Vec<SeverityPattern>,
}

// =============================================================================
// WHOLE-BATCH SUMMARIES
// =============================================================================

/// Shape of a batch's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelinePatternKind {
    /// Every inter-arrival interval falls inside the burst window.
    Burst,
    /// At least one long gap, or too few incidents to tell.
    Distributed,
}

/// Timeline summary of a whole incident batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineAnalysis {
    pub incident_count: usize,
    pub time_span_hours: f64,
    pub average_interval_hours: f64,
    /// Consecutive inter-arrival intervals in hours, oldest first.
    pub intervals: Vec<f64>,
    pub pattern_type: TimelinePatternKind,
}

/// Observed creation-time range of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub span_hours: f64,
}

/// Factors shared across a whole incident batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonFactors {
    /// Most frequently named systems, highest count first.
    pub common_systems: Vec<String>,
    /// Incident count behind the first entry of `common_systems`, 0 when no
    /// incident names a system.
    pub top_system_count: usize,
    /// `None` when the batch is empty.
    pub time_range: Option<TimeRange>,
    pub severity_distribution: BTreeMap<Severity, usize>,
    pub most_common_severity: Severity,
}

// =============================================================================
// ANALYZER
// =============================================================================

/// Derives patterns from groups and batches.
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    settings: AnalysisSettings,
}

impl PatternAnalyzer {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    /// Per-group patterns for a set of problem groups.
    ///
    /// A temporal pattern is emitted per group with at least two members, a
    /// system pattern per group with a non-empty system set, and a severity
    /// pattern per group unconditionally.
    pub fn analyze(&self, groups: &[ProblemGroup], now: DateTime<Utc>) -> PatternSet {
        let mut patterns = PatternSet::default();

        for group in groups {
            let mut times: Vec<DateTime<Utc>> = group
                .incidents
                .iter()
                .map(|incident| incident.created_at_or(now))
                .collect();
            times.sort();

            if times.len() > 1 {
                let intervals = intervals_hours(&times);
                let average = mean(&intervals);
                let pattern_type = if average < self.settings.recurring_threshold_hours {
                    TemporalPatternKind::Recurring
                } else {
                    TemporalPatternKind::Sporadic
                };
                patterns.temporal_patterns.push(TemporalPattern {
                    group_id: group.group_id,
                    average_interval_hours: average,
                    pattern_type,
                });
            }

            if !group.affected_systems.is_empty() {
                patterns.system_patterns.push(SystemPattern {
                    group_id: group.group_id,
                    affected_systems: group.affected_systems.clone(),
                    system_count: group.affected_systems.len(),
                });
            }

            let mut severities = OrderedCounter::new();
            for incident in &group.incidents {
                severities.add(incident.severity);
            }
            patterns.severity_patterns.push(SeverityPattern {
                group_id: group.group_id,
                most_common_severity: severities
                    .top()
                    .map(|(severity, _)| severity)
                    .unwrap_or_default(),
                severity_distribution: severities.distribution(),
            });
        }

        debug!(
            groups = groups.len(),
            temporal = patterns.temporal_patterns.len(),
            system = patterns.system_patterns.len(),
            "Pattern analysis complete"
        );
        patterns
    }

    /// Timeline summary of a raw batch.
    ///
    /// An empty batch yields a zeroed, `Distributed` summary rather than an
    /// error.
    pub fn timeline(&self, incidents: &[IncidentRecord], now: DateTime<Utc>) -> TimelineAnalysis {
        let mut times: Vec<DateTime<Utc>> = incidents
            .iter()
            .map(|incident| incident.created_at_or(now))
            .collect();
        times.sort();

        let intervals = intervals_hours(&times);
        let time_span_hours = match (times.first(), times.last()) {
            (Some(first), Some(last)) if times.len() > 1 => hours_between(*first, *last),
            _ => 0.0,
        };
        let max_interval = intervals.iter().copied().fold(0.0_f64, f64::max);
        let pattern_type = if !intervals.is_empty() && max_interval < self.settings.burst_window_hours
        {
            TimelinePatternKind::Burst
        } else {
            TimelinePatternKind::Distributed
        };

        TimelineAnalysis {
            incident_count: incidents.len(),
            time_span_hours,
            average_interval_hours: mean(&intervals),
            intervals,
            pattern_type,
        }
    }

    /// Factors shared across a raw batch: top systems, severity makeup, and
    /// the observed time range.
    pub fn common_factors(&self, incidents: &[IncidentRecord], now: DateTime<Utc>) -> CommonFactors {
        let mut systems = OrderedCounter::new();
        for incident in incidents {
            systems.extend(incident.affected_systems.iter().cloned());
        }
        let ranked = systems.most_common(self.settings.max_common_systems);
        let top_system_count = ranked.first().map(|(_, count)| *count).unwrap_or(0);
        let common_systems = ranked.into_iter().map(|(system, _)| system).collect();

        let mut severities = OrderedCounter::new();
        for incident in incidents {
            severities.add(incident.severity);
        }

        let time_range = if incidents.is_empty() {
            None
        } else {
            let times: Vec<DateTime<Utc>> = incidents
                .iter()
                .map(|incident| incident.created_at_or(now))
                .collect();
            let start = times.iter().copied().min().unwrap_or(now);
            let end = times.iter().copied().max().unwrap_or(now);
            Some(TimeRange {
                start,
                end,
                span_hours: hours_between(start, end),
            })
        };

        CommonFactors {
            common_systems,
            top_system_count,
            time_range,
            most_common_severity: severities
                .top()
                .map(|(severity, _)| severity)
                .unwrap_or_default(),
            severity_distribution: severities.distribution(),
        }
    }
}

/// Consecutive inter-arrival intervals in hours over sorted timestamps.
pub(crate) fn intervals_hours(times: &[DateTime<Utc>]) -> Vec<f64> {
    times
        .windows(2)
        .map(|pair| hours_between(pair[0], pair[1]))
        .collect()
}

pub(crate) fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use causeway_core::IncidentRecord;

    use crate::clustering::IncidentClusterer;

    fn analyzer() -> PatternAnalyzer {
        PatternAnalyzer::new(AnalysisSettings::default())
    }

    fn at_hours(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(offset)
    }

    fn create_test_incident(id: &str, hours: i64) -> IncidentRecord {
        IncidentRecord::new(id, "db outage", "database connection refused")
            .with_created_at(at_hours(hours))
    }

    fn create_test_group(hours: &[i64]) -> ProblemGroup {
        let incidents: Vec<IncidentRecord> = hours
            .iter()
            .enumerate()
            .map(|(index, offset)| create_test_incident(&format!("inc-{}", index), *offset))
            .collect();
        let clusterer = IncidentClusterer::new(AnalysisSettings {
            min_group_size: 2,
            ..AnalysisSettings::default()
        });
        let mut groups = clusterer.cluster(&incidents);
        assert_eq!(groups.len(), 1);
        groups.remove(0)
    }

    #[test]
    fn test_recurring_pattern_under_one_week() {
        let group = create_test_group(&[0, 24, 48]);
        let patterns = analyzer().analyze(&[group], at_hours(72));
        assert_eq!(patterns.temporal_patterns.len(), 1);
        let temporal = &patterns.temporal_patterns[0];
        assert_eq!(temporal.average_interval_hours, 24.0);
        assert_eq!(temporal.pattern_type, TemporalPatternKind::Recurring);
    }

    #[test]
    fn test_sporadic_pattern_over_one_week() {
        // Mean interval 200h exceeds the 168h recurring threshold.
        let group = create_test_group(&[0, 200, 400]);
        let patterns = analyzer().analyze(&[group], at_hours(500));
        assert_eq!(
            patterns.temporal_patterns[0].pattern_type,
            TemporalPatternKind::Sporadic
        );
    }

    #[test]
    fn test_unsorted_timestamps_are_sorted_before_intervals() {
        let group = create_test_group(&[48, 0, 24]);
        let patterns = analyzer().analyze(&[group], at_hours(72));
        assert_eq!(patterns.temporal_patterns[0].average_interval_hours, 24.0);
    }

    #[test]
    fn test_system_pattern_skipped_for_empty_systems() {
        let group = create_test_group(&[0, 1]);
        let patterns = analyzer().analyze(&[group], at_hours(2));
        assert!(patterns.system_patterns.is_empty());
        assert_eq!(patterns.severity_patterns.len(), 1);
    }

    #[test]
    fn test_system_pattern_records_group_systems() {
        let mut group = create_test_group(&[0, 1]);
        group.affected_systems = vec!["db-1".to_string(), "api".to_string()];
        let patterns = analyzer().analyze(&[group], at_hours(2));
        assert_eq!(patterns.system_patterns.len(), 1);
        assert_eq!(patterns.system_patterns[0].system_count, 2);
        assert_eq!(
            patterns.system_patterns[0].affected_systems,
            vec!["db-1", "api"]
        );
    }

    #[test]
    fn test_severity_mode_breaks_ties_first_encountered() {
        let mut group = create_test_group(&[0, 1]);
        group.incidents[0].severity = Severity::High;
        group.incidents[1].severity = Severity::Low;
        let patterns = analyzer().analyze(&[group], at_hours(2));
        let severity = &patterns.severity_patterns[0];
        assert_eq!(severity.most_common_severity, Severity::High);
        assert_eq!(severity.severity_distribution[&Severity::High], 1);
        assert_eq!(severity.severity_distribution[&Severity::Low], 1);
    }

    #[test]
    fn test_missing_timestamps_use_analysis_time() {
        let mut group = create_test_group(&[0, 1]);
        group.incidents[0].created_at = None;
        group.incidents[1].created_at = None;
        let patterns = analyzer().analyze(&[group], at_hours(10));
        // Both members collapse onto the analysis time.
        assert_eq!(patterns.temporal_patterns[0].average_interval_hours, 0.0);
        assert_eq!(
            patterns.temporal_patterns[0].pattern_type,
            TemporalPatternKind::Recurring
        );
    }

    #[test]
    fn test_timeline_burst_when_all_intervals_short() {
        let incidents = vec![
            create_test_incident("a", 0),
            create_test_incident("b", 2),
            create_test_incident("c", 4),
        ];
        let timeline = analyzer().timeline(&incidents, at_hours(5));
        assert_eq!(timeline.pattern_type, TimelinePatternKind::Burst);
        assert_eq!(timeline.incident_count, 3);
        assert_eq!(timeline.time_span_hours, 4.0);
        assert_eq!(timeline.intervals, vec![2.0, 2.0]);
        assert_eq!(timeline.average_interval_hours, 2.0);
    }

    #[test]
    fn test_timeline_distributed_when_any_gap_long() {
        let incidents = vec![
            create_test_incident("a", 0),
            create_test_incident("b", 2),
            create_test_incident("c", 40),
        ];
        let timeline = analyzer().timeline(&incidents, at_hours(50));
        assert_eq!(timeline.pattern_type, TimelinePatternKind::Distributed);
    }

    #[test]
    fn test_timeline_boundary_interval_is_distributed() {
        // An interval of exactly the burst window is not a burst.
        let incidents = vec![create_test_incident("a", 0), create_test_incident("b", 24)];
        let timeline = analyzer().timeline(&incidents, at_hours(30));
        assert_eq!(timeline.pattern_type, TimelinePatternKind::Distributed);
    }

    #[test]
    fn test_timeline_empty_batch() {
        let timeline = analyzer().timeline(&[], at_hours(0));
        assert_eq!(timeline.incident_count, 0);
        assert_eq!(timeline.time_span_hours, 0.0);
        assert_eq!(timeline.average_interval_hours, 0.0);
        assert!(timeline.intervals.is_empty());
        assert_eq!(timeline.pattern_type, TimelinePatternKind::Distributed);
    }

    #[test]
    fn test_timeline_single_incident_is_distributed() {
        let timeline = analyzer().timeline(&[create_test_incident("a", 0)], at_hours(1));
        assert_eq!(timeline.incident_count, 1);
        assert_eq!(timeline.time_span_hours, 0.0);
        assert_eq!(timeline.pattern_type, TimelinePatternKind::Distributed);
    }

    #[test]
    fn test_common_factors_top_systems() {
        let incidents = vec![
            create_test_incident("a", 0).with_systems(vec![
                "db-1".to_string(),
                "api".to_string(),
            ]),
            create_test_incident("b", 1).with_systems(vec!["db-1".to_string()]),
            create_test_incident("c", 2).with_systems(vec![
                "cache".to_string(),
                "edge".to_string(),
            ]),
        ];
        let factors = analyzer().common_factors(&incidents, at_hours(3));
        // Four distinct systems, capped at the top three; db-1 leads with two
        // mentions and the rest tie in first-seen order.
        assert_eq!(factors.common_systems, vec!["db-1", "api", "cache"]);
        assert_eq!(factors.top_system_count, 2);
    }

    #[test]
    fn test_common_factors_time_range_and_severity() {
        let mut incidents = vec![
            create_test_incident("a", 0),
            create_test_incident("b", 6),
            create_test_incident("c", 12),
        ];
        incidents[0].severity = Severity::Critical;
        incidents[1].severity = Severity::Critical;
        incidents[2].severity = Severity::Low;
        let factors = analyzer().common_factors(&incidents, at_hours(20));
        let range = factors.time_range.as_ref().unwrap();
        assert_eq!(range.start, at_hours(0));
        assert_eq!(range.end, at_hours(12));
        assert_eq!(range.span_hours, 12.0);
        assert_eq!(factors.most_common_severity, Severity::Critical);
        assert_eq!(factors.severity_distribution[&Severity::Critical], 2);
    }

    #[test]
    fn test_common_factors_empty_batch() {
        let factors = analyzer().common_factors(&[], at_hours(0));
        assert!(factors.common_systems.is_empty());
        assert_eq!(factors.top_system_count, 0);
        assert!(factors.time_range.is_none());
        assert!(factors.severity_distribution.is_empty());
        assert_eq!(factors.most_common_severity, Severity::Medium);
    }

    #[test]
    fn test_interval_helpers() {
        let times = vec![at_hours(0), at_hours(3), at_hours(4)];
        assert_eq!(intervals_hours(&times), vec![3.0, 1.0]);
        assert_eq!(hours_between(at_hours(0), at_hours(36)), 36.0);
    }
}

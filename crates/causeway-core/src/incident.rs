//! Incident input model.
//!
//! `IncidentRecord` is the single input contract for every analysis
//! operation. Decoding is deliberately lenient: unrecognized severities fall
//! back to medium, unparseable timestamps become "unknown" (treated as the
//! analysis time downstream), and missing ids are synthesized. Bad incident
//! data may skew an analysis; it never aborts one.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// SEVERITY
// =============================================================================

/// Incident severity level.
///
/// Unrecognized or missing severities decode to `Medium`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Parse a severity string, mapping anything unrecognized to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// True for the severities that demand immediate attention.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// INCIDENT RECORD
// =============================================================================

/// A single incident as submitted by a caller.
///
/// Every field except `title`/`description` content is optional on the wire;
/// the serde defaults implement the documented fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Opaque identifier; synthesized when absent.
    #[serde(default = "synthesize_incident_id")]
    pub id: String,

    /// Short summary line.
    #[serde(default)]
    pub title: String,

    /// Free-text description; may be empty.
    #[serde(default)]
    pub description: String,

    /// Severity with lenient decoding (unknown values become medium).
    #[serde(default, deserialize_with = "deserialize_severity_lenient")]
    pub severity: Severity,

    /// Identifiers of the systems this incident touches; may be empty.
    #[serde(default)]
    pub affected_systems: Vec<String>,

    /// Explicit symptom tokens. `None` means symptoms are derived from the
    /// description.
    #[serde(default)]
    pub symptoms: Option<Vec<String>>,

    /// Creation time. `None` means unknown; analysis treats unknown as the
    /// analysis time.
    #[serde(
        default,
        alias = "created_date",
        alias = "createdAt",
        deserialize_with = "deserialize_timestamp_lenient"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl IncidentRecord {
    /// Create a record with the fields every incident carries.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            severity: Severity::default(),
            affected_systems: Vec::new(),
            symptoms: None,
            created_at: None,
        }
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the affected systems.
    pub fn with_systems(mut self, systems: Vec<String>) -> Self {
        self.affected_systems = systems;
        self
    }

    /// Set explicit symptom tokens.
    pub fn with_symptoms(mut self, symptoms: Vec<String>) -> Self {
        self.symptoms = Some(symptoms);
        self
    }

    /// Set the creation time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Concatenated title and description used for similarity scoring.
    pub fn correlation_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// Symptom tokens: explicit symptoms when provided, otherwise the
    /// lowercased whitespace-tokenized description.
    pub fn effective_symptoms(&self) -> Vec<String> {
        match &self.symptoms {
            Some(symptoms) => symptoms.clone(),
            None => self
                .description
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Creation time with the documented fallback for unknown timestamps.
    pub fn created_at_or(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at.unwrap_or(fallback)
    }
}

fn synthesize_incident_id() -> String {
    format!("INC-{}", Uuid::new_v4())
}

// =============================================================================
// LENIENT DECODING
// =============================================================================

/// Parse a timestamp from the formats incident sources actually emit.
///
/// Accepts RFC 3339 (offset or `Z`), naive `YYYY-MM-DDTHH:MM:SS` with
/// optional fractional seconds (interpreted as UTC), the space-separated
/// variant, and bare dates. Returns `None` when nothing matches.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    None
}

fn deserialize_severity_lenient<'de, D>(deserializer: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(Severity::parse_lenient)
        .unwrap_or_default())
}

fn deserialize_timestamp_lenient<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientTimestamp;

    impl<'de> Visitor<'de> for LenientTimestamp {
        type Value = Option<DateTime<Utc>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a timestamp string, epoch seconds, or null")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(parse_timestamp(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Utc.timestamp_opt(value, 0).single())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Utc.timestamp_opt(value as i64, 0).single())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Utc.timestamp_opt(value as i64, 0).single())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(LenientTimestamp)
        }
    }

    deserializer.deserialize_any(LenientTimestamp)
}

//! Lexical incident similarity.
//!
//! Correlation scores pairs of incidents with the Jaccard coefficient over
//! the whitespace tokens of the lowercased `title + " " + description` text.
//! Deterministic and explainable: every match can be justified by the shared
//! tokens alone.

use std::collections::HashSet;

use causeway_core::IncidentRecord;

/// Lowercased whitespace token set for a free-text fragment.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Token set an incident exposes to correlation.
pub fn incident_tokens(incident: &IncidentRecord) -> HashSet<String> {
    tokenize(&incident.correlation_text())
}

/// Jaccard coefficient of two token sets.
///
/// Either side empty yields 0.0, so blank incidents never correlate with
/// anything, including each other.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Similarity between two incidents in [0.0, 1.0].
pub fn incident_similarity(a: &IncidentRecord, b: &IncidentRecord) -> f64 {
    jaccard(&incident_tokens(a), &incident_tokens(b))
}

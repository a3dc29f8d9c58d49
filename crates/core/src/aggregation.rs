//! Per-image risk summary derived from the machine detection set.
//!
//! Recomputed whenever a new detection set is stored. Reviewer actions never
//! feed back into the summary: it describes what the analyzer found.

use serde::Serialize;

use crate::detection::MachineDetection;

/// Status of an image whose analysis found nothing.
pub const STATUS_NORMAL: &str = "Normal";

/// Status of an image whose analysis found at least one detection.
pub const STATUS_ANOMALIES: &str = "Anomalies";

/// Summary fields stored on an analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub status: &'static str,
    pub total_detections: i32,
    pub critical_count: i32,
    pub potentially_faulty_count: i32,
}

/// Map a detection count to the image status.
pub fn status_for(total: i32) -> &'static str {
    if total > 0 {
        STATUS_ANOMALIES
    } else {
        STATUS_NORMAL
    }
}

/// Summarize a detection set.
///
/// Severities are compared case-insensitively; anything other than
/// "Critical" or "Potentially Faulty" only counts toward the total.
pub fn summarize(detections: &[MachineDetection]) -> AnalysisSummary {
    let total = count_i32(detections.len());
    let critical = count_i32(detections.iter().filter(|d| d.is_critical()).count());
    let potentially_faulty =
        count_i32(detections.iter().filter(|d| d.is_potentially_faulty()).count());

    AnalysisSummary {
        status: status_for(total),
        total_detections: total,
        critical_count: critical,
        potentially_faulty_count: potentially_faulty,
    }
}

/// Counts are stored in INTEGER columns.
fn count_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

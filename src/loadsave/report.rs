//! Round-trip reports

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in the verification where an attribute was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// The copy made by `Clone`
    Clone,
    /// The serialized document (attribute element present)
    Serialize,
    /// The instance loaded from the serialized document
    RoundTrip,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Clone => write!(f, "clone"),
            Stage::Serialize => write!(f, "serialize"),
            Stage::RoundTrip => write!(f, "roundtrip"),
        }
    }
}

/// One attribute that failed one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeFailure {
    pub attribute: String,
    pub stage: Stage,
    pub expected: String,
    pub actual: String,
}

/// Outcome of one verification run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[must_use = "round trip reports should be checked for failures"]
pub struct RoundTripReport {
    /// Step type under test
    pub step_type: String,
    /// Seed that reproduces the run
    pub seed: u64,
    /// Document produced by the step
    pub xml: String,
    /// Every failed (attribute, stage) pair, in check order
    pub failures: Vec<AttributeFailure>,
}

impl RoundTripReport {
    pub fn new(step_type: impl Into<String>, seed: u64) -> Self {
        Self {
            step_type: step_type.into(),
            seed,
            ..Default::default()
        }
    }

    pub(crate) fn record(
        &mut self,
        attribute: &str,
        stage: Stage,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) {
        self.failures.push(AttributeFailure {
            attribute: attribute.to_string(),
            stage,
            expected: expected.into(),
            actual: actual.into(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `(attribute, stage)` pairs that failed
    pub fn failed(&self) -> Vec<(&str, Stage)> {
        self.failures
            .iter()
            .map(|f| (f.attribute.as_str(), f.stage))
            .collect()
    }

    /// Whether `attribute` failed at `stage`
    pub fn has_failure(&self, attribute: &str, stage: Stage) -> bool {
        self.failures
            .iter()
            .any(|f| f.attribute == attribute && f.stage == stage)
    }

    /// Render the report as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RoundTripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            let step = &self.step_type;
            return write!(f, "{} round trip passed (seed {})", step, self.seed);
        }
        writeln!(
            f,
            "{} attribute check(s) failed for {} (seed {}):",
            self.failures.len(),
            self.step_type,
            self.seed
        )?;
        for failure in &self.failures {
            writeln!(
                f,
                "  {} [{}]: expected {}, got {}",
                failure.attribute, failure.stage, failure.expected, failure.actual
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_failure() {
        let mut report = RoundTripReport::new("OraBulkLoader", 7);
        report.record("schemaName", Stage::Clone, "\"a\"", "\"b\"");
        report.record("dateMask", Stage::RoundTrip, "[]", "[\"\"]");
        let text = report.to_string();
        assert!(text.contains("2 attribute check(s) failed for OraBulkLoader (seed 7)"));
        assert!(text.contains("schemaName [clone]"));
        assert!(text.contains("dateMask [roundtrip]"));
        assert_eq!(
            report.failed(),
            vec![("schemaName", Stage::Clone), ("dateMask", Stage::RoundTrip)]
        );
    }

    #[test]
    fn test_json_uses_lowercase_stages() {
        let mut report = RoundTripReport::new("SystemInfo", 1);
        report.record("fieldName", Stage::Serialize, "<fields>", "missing");
        let json = report.to_json().unwrap();
        assert!(json.contains("\"stage\": \"serialize\""));
        let back: RoundTripReport = serde_json::from_str(&json).unwrap();
        assert!(back.has_failure("fieldName", Stage::Serialize));
    }
}

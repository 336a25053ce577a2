use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A grade as the backend stored it. Parsed only when aggregated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawGrade {
    Number(f64),
    Text(String),
}

impl RawGrade {
    /// Numeric value, or `None` when the stored value cannot be used as a grade.
    pub fn parse(&self) -> Option<f64> {
        let v = match self {
            RawGrade::Number(v) => *v,
            RawGrade::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    return None;
                }
                t.parse::<f64>().ok()?
            }
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for RawGrade {
    fn from(v: f64) -> Self {
        RawGrade::Number(v)
    }
}

impl From<&str> for RawGrade {
    fn from(v: &str) -> Self {
        RawGrade::Text(v.to_string())
    }
}

/// Result of a ledger lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeCell<'a> {
    Ungraded,
    Recorded(&'a RawGrade),
}

impl GradeCell<'_> {
    pub fn score(&self) -> Option<f64> {
        match self {
            GradeCell::Ungraded => None,
            GradeCell::Recorded(raw) => raw.parse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GradeKey {
    pub student_id: String,
    pub assignment_id: String,
}

impl GradeKey {
    pub fn new(student_id: &str, assignment_id: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            assignment_id: assignment_id.to_string(),
        }
    }
}

/// Wire shape: `studentId -> (assignmentId -> number | string | null) | null`.
pub type NestedGrades = HashMap<String, Option<HashMap<String, serde_json::Value>>>;

/// Sparse student x assignment grade table. A missing key means "not yet graded".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "NestedGrades")]
pub struct Ledger {
    entries: HashMap<GradeKey, RawGrade>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces one entry and returns the previous value.
    pub fn record(
        &mut self,
        student_id: &str,
        assignment_id: &str,
        value: impl Into<RawGrade>,
    ) -> Option<RawGrade> {
        self.entries
            .insert(GradeKey::new(student_id, assignment_id), value.into())
    }

    pub fn clear(&mut self, student_id: &str, assignment_id: &str) -> Option<RawGrade> {
        self.entries
            .remove(&GradeKey::new(student_id, assignment_id))
    }

    pub fn grade_for(&self, student_id: &str, assignment_id: &str) -> GradeCell<'_> {
        match self.entries.get(&GradeKey::new(student_id, assignment_id)) {
            Some(raw) => GradeCell::Recorded(raw),
            None => GradeCell::Ungraded,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<NestedGrades> for Ledger {
    fn from(nested: NestedGrades) -> Self {
        let mut ledger = Ledger::new();
        for (student_id, row) in nested {
            let Some(row) = row else {
                continue;
            };
            for (assignment_id, value) in row {
                let raw = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::Number(n) => match n.as_f64() {
                        Some(v) => RawGrade::Number(v),
                        None => continue,
                    },
                    serde_json::Value::String(s) => RawGrade::Text(s),
                    other => {
                        debug!(
                            student_id = %student_id,
                            assignment_id = %assignment_id,
                            value = %other,
                            "ignoring non-scalar grade"
                        );
                        continue;
                    }
                };
                ledger.record(&student_id, &assignment_id, raw);
            }
        }
        ledger
    }
}

//! Payload shapes consumed from the backend REST API.
//!
//! Identifiers arrive as JSON numbers from most endpoints but always as strings
//! when they are object keys (the grade ledger), so every id is normalized to a
//! `String` on the way in.

use serde::{Deserialize, Deserializer, Serialize};

use crate::category::{Category, PerCategory};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Text(String),
}

impl From<IdRepr> for String {
    fn from(v: IdRepr) -> Self {
        match v {
            IdRepr::Int(n) => n.to_string(),
            IdRepr::Text(s) => s,
        }
    }
}

pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdRepr::deserialize(deserializer).map(String::from)
}

pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(String::from))
}

/// Missing and `null` weights both count as 0.
fn weight_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn default_status() -> String {
    "active".to_string()
}

/// A grading period's weight configuration for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "weight_or_zero")]
    pub notebook_weight: f64,
    #[serde(default, deserialize_with = "weight_or_zero")]
    pub practice_weight: f64,
    #[serde(default, deserialize_with = "weight_or_zero")]
    pub exam_weight: f64,
    #[serde(default, deserialize_with = "weight_or_zero")]
    pub other_weight: f64,
    #[serde(
        default,
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub period_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub subject_id: Option<String>,
}

impl Topic {
    pub fn weight(&self, category: Category) -> f64 {
        (category.info().weight)(self)
    }

    pub fn weights(&self) -> PerCategory<f64> {
        PerCategory::from_fn(|c| self.weight(c))
    }
}

/// An assignment whose category has been resolved against the closed enum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom_asg_id: Option<String>,
}

impl Assignment {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            classroom_asg_id: None,
        }
    }
}

/// An assignment exactly as the backend sent it; the category tag is unchecked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub classroom_asg_id: Option<String>,
}

impl AssignmentRecord {
    pub fn resolve(self, category: Category) -> Assignment {
        Assignment {
            id: self.id,
            name: self.name,
            category,
            classroom_asg_id: self.classroom_asg_id,
        }
    }
}

/// The per-topic listing endpoint groups assignments by bucket instead of tagging them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedAssignments {
    #[serde(default)]
    pub notebook_assignments: Vec<AssignmentRecord>,
    #[serde(default)]
    pub practice_assignments: Vec<AssignmentRecord>,
    #[serde(default)]
    pub exam_assignments: Vec<AssignmentRecord>,
    #[serde(default)]
    pub other_assignments: Vec<AssignmentRecord>,
}

impl GroupedAssignments {
    pub fn take_bucket(&mut self, category: Category) -> Vec<AssignmentRecord> {
        let bucket = match category {
            Category::Notebook => &mut self.notebook_assignments,
            Category::Practices => &mut self.practice_assignments,
            Category::Exam => &mut self.exam_assignments,
            Category::Others => &mut self.other_assignments,
        };
        std::mem::take(bucket)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssignmentsPayload {
    Flat(Vec<AssignmentRecord>),
    Grouped(GroupedAssignments),
}

impl Default for AssignmentsPayload {
    fn default() -> Self {
        AssignmentsPayload::Flat(Vec::new())
    }
}

/// A roster entry. Read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            status: default_status(),
        }
    }

    /// "Last, First", falling back to whichever half is present.
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (last.is_empty(), first.is_empty()) {
            (false, false) => format!("{}, {}", last, first),
            (false, true) => last.to_string(),
            (true, false) => first.to_string(),
            (true, true) => self.id.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("active")
    }
}

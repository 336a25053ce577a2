use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::category::{Category, PerCategory};
use crate::ledger::Ledger;
use crate::model::{Student, Topic};

/// Slack allowed when checking that topic weights add up to 100.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct CalcError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CalcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub average: f64,
    pub weight: f64,
    pub weighted_value: f64,
    pub graded_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalGrade {
    pub final_grade: f64,
    pub per_category: PerCategory<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    pub student_id: String,
    pub student_name: String,
    pub active: bool,
    pub final_grade: f64,
    pub category_summaries: PerCategory<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub category: Category,
    pub weight: f64,
    pub class_average: f64,
    pub student_count: usize,
    pub assignment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub topic_id: String,
    pub topic_name: String,
    pub weights: PerCategory<f64>,
    pub assignment_count: usize,
    pub per_student: Vec<StudentResult>,
    pub per_category: Vec<CategoryAggregate>,
}

/// Mean of `values`, 0 for an empty set. Values are summed in sorted order so the
/// result does not depend on the order the assignments were listed in.
fn mean(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let sum = values.iter().fold(0.0_f64, |acc, v| acc + v);
    sum / (values.len() as f64)
}

fn category_scores(
    student_id: &str,
    category: Category,
    catalog: &Catalog,
    ledger: &Ledger,
) -> Vec<f64> {
    catalog
        .assignments_by_category(category)
        .filter_map(|a| ledger.grade_for(student_id, &a.id).score())
        .collect()
}

/// Mean of the recorded grades a student has in one category. Ungraded and
/// unparseable entries are skipped; no grades at all yields 0.
pub fn average_for_category(
    student_id: &str,
    category: Category,
    catalog: &Catalog,
    ledger: &Ledger,
) -> f64 {
    mean(&mut category_scores(student_id, category, catalog, ledger))
}

/// Weighted final grade: sum over the four categories of `average * weight / 100`.
///
/// The topic is trusted as stored. Weights that do not add up to 100 are not
/// rejected here; the result is then simply not a percentage.
pub fn final_grade(
    student_id: &str,
    topic: &Topic,
    catalog: &Catalog,
    ledger: &Ledger,
) -> FinalGrade {
    let per_category = PerCategory::from_fn(|category| {
        let mut scores = category_scores(student_id, category, catalog, ledger);
        let graded_count = scores.len();
        let average = mean(&mut scores);
        let weight = topic.weight(category);
        CategorySummary {
            average,
            weight,
            weighted_value: (average * weight) / 100.0,
            graded_count,
        }
    });
    let final_grade = per_category
        .values()
        .fold(0.0_f64, |acc, s| acc + s.weighted_value);

    FinalGrade {
        final_grade,
        per_category,
    }
}

/// Per-student results in roster order, plus class-level category averages.
///
/// A class average is the mean of per-student category averages over active
/// students that have at least one graded entry in that category.
pub fn compute_topic_summary(
    topic: &Topic,
    catalog: &Catalog,
    roster: &[Student],
    ledger: &Ledger,
) -> TopicSummary {
    let mut per_student: Vec<StudentResult> = Vec::with_capacity(roster.len());
    let mut class_values: PerCategory<Vec<f64>> = PerCategory::default();

    for s in roster {
        let result = final_grade(&s.id, topic, catalog, ledger);
        let active = s.is_active();
        if active {
            for (category, summary) in result.per_category.iter() {
                if summary.graded_count > 0 {
                    class_values[category].push(summary.average);
                }
            }
        }
        per_student.push(StudentResult {
            student_id: s.id.clone(),
            student_name: s.display_name(),
            active,
            final_grade: result.final_grade,
            category_summaries: result.per_category,
        });
    }

    let per_category: Vec<CategoryAggregate> = Category::ALL
        .into_iter()
        .map(|category| {
            let values = &mut class_values[category];
            CategoryAggregate {
                category,
                weight: topic.weight(category),
                student_count: values.len(),
                class_average: mean(values),
                assignment_count: catalog.count(category),
            }
        })
        .collect();

    debug!(
        topic_id = %topic.id,
        students = roster.len(),
        assignments = catalog.len(),
        "computed topic summary"
    );

    TopicSummary {
        topic_id: topic.id.clone(),
        topic_name: topic.name.clone(),
        weights: topic.weights(),
        assignment_count: catalog.len(),
        per_student,
        per_category,
    }
}

/// The rule a topic must satisfy when it is created or edited: every weight in
/// [0, 100] and the four weights summing to 100. Returns the sum.
pub fn validate_topic_weights(topic: &Topic) -> Result<f64, CalcError> {
    for category in Category::ALL {
        let weight = topic.weight(category);
        if !weight.is_finite() || !(0.0..=100.0).contains(&weight) {
            return Err(CalcError::new(
                "invalid_weights",
                format!("{} weight must be between 0 and 100", category.label()),
            )
            .with_details(serde_json::json!({
                "category": category,
                "weight": weight,
            })));
        }
    }

    let total = topic
        .weights()
        .values()
        .fold(0.0_f64, |acc, w| acc + w);
    if (total - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(
            CalcError::new("invalid_weights", "The sum of all weights must be 100.")
                .with_details(serde_json::json!({ "total": total })),
        );
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignment;

    fn topic(n: f64, p: f64, e: f64, o: f64) -> Topic {
        Topic {
            id: "t1".to_string(),
            name: "Unit 1".to_string(),
            notebook_weight: n,
            practice_weight: p,
            exam_weight: e,
            other_weight: o,
            ..Topic::default()
        }
    }

    #[test]
    fn mean_of_empty_set_is_zero() {
        let mut empty: [f64; 0] = [];
        assert_eq!(mean(&mut empty), 0.0);
        assert_eq!(mean(&mut [6.0, 4.0]), 5.0);
    }

    #[test]
    fn average_skips_ungraded_and_unparseable() {
        let catalog = Catalog::from_assignments(vec![
            Assignment::new("n1", "Notes 1", Category::Notebook),
            Assignment::new("n2", "Notes 2", Category::Notebook),
            Assignment::new("n3", "Notes 3", Category::Notebook),
            Assignment::new("e1", "Exam", Category::Exam),
        ]);
        let mut ledger = Ledger::new();
        ledger.record("s1", "n1", 70.0);
        ledger.record("s1", "n2", "x");
        ledger.record("s1", "e1", 100.0);

        assert_eq!(average_for_category("s1", Category::Notebook, &catalog, &ledger), 70.0);
        assert_eq!(average_for_category("s1", Category::Practices, &catalog, &ledger), 0.0);
        assert_eq!(average_for_category("nobody", Category::Exam, &catalog, &ledger), 0.0);
    }

    #[test]
    fn zero_grade_counts_toward_average() {
        let catalog = Catalog::from_assignments(vec![
            Assignment::new("p1", "Lab 1", Category::Practices),
            Assignment::new("p2", "Lab 2", Category::Practices),
        ]);
        let mut ledger = Ledger::new();
        ledger.record("s1", "p1", 0.0);
        ledger.record("s1", "p2", 80.0);
        assert_eq!(average_for_category("s1", Category::Practices, &catalog, &ledger), 40.0);
    }

    #[test]
    fn final_grade_weights_category_averages() {
        let catalog = Catalog::from_assignments(vec![
            Assignment::new("n1", "Notes", Category::Notebook),
            Assignment::new("p1", "Lab", Category::Practices),
            Assignment::new("e1", "Exam", Category::Exam),
        ]);
        let mut ledger = Ledger::new();
        ledger.record("s1", "n1", 80.0);
        ledger.record("s1", "p1", 60.0);
        ledger.record("s1", "e1", 100.0);

        let result = final_grade("s1", &topic(25.0, 25.0, 25.0, 25.0), &catalog, &ledger);
        assert_eq!(result.final_grade, 60.0);
        assert_eq!(result.per_category[Category::Exam].weighted_value, 25.0);
        assert_eq!(result.per_category[Category::Others].graded_count, 0);
        assert_eq!(result.per_category[Category::Others].average, 0.0);
    }

    #[test]
    fn class_averages_only_count_active_students_with_grades() {
        let catalog = Catalog::from_assignments(vec![Assignment::new("e1", "Exam", Category::Exam)]);
        let mut ledger = Ledger::new();
        ledger.record("s1", "e1", 90.0);
        ledger.record("s2", "e1", 50.0);
        ledger.record("s3", "e1", 10.0);

        let mut dropped_out = Student::new("s3", "Tom", "Vega");
        dropped_out.status = "inactive".to_string();
        let roster = vec![
            Student::new("s1", "Ana", "Lopez"),
            Student::new("s2", "Ben", "Ortiz"),
            dropped_out,
            Student::new("s4", "Eva", "Mora"),
        ];

        let summary = compute_topic_summary(&topic(0.0, 0.0, 100.0, 0.0), &catalog, &roster, &ledger);
        assert_eq!(summary.per_student.len(), 4);
        assert_eq!(summary.per_student[0].student_name, "Lopez, Ana");
        assert_eq!(summary.per_student[2].final_grade, 10.0);
        assert_eq!(summary.per_student[3].final_grade, 0.0);

        let exam = &summary.per_category[2];
        assert_eq!(exam.category, Category::Exam);
        assert_eq!(exam.student_count, 2);
        assert_eq!(exam.class_average, 70.0);
        assert_eq!(exam.assignment_count, 1);
        assert_eq!(summary.per_category[0].student_count, 0);
    }

    #[test]
    fn weights_must_sum_to_100() {
        assert_eq!(validate_topic_weights(&topic(25.0, 25.0, 25.0, 25.0)).expect("valid"), 100.0);
        assert!(validate_topic_weights(&topic(33.3, 33.3, 33.4, 0.0)).is_ok());

        let err = validate_topic_weights(&topic(50.0, 30.0, 10.0, 0.0)).expect_err("sum 90");
        assert_eq!(err.code, "invalid_weights");
        assert_eq!(err.details, Some(serde_json::json!({ "total": 90.0 })));

        let err = validate_topic_weights(&topic(120.0, -20.0, 0.0, 0.0)).expect_err("range");
        assert!(err.message.starts_with("Notebook"));
    }
}

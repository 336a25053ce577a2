//! View model for the grades table: one category at a time, one column per
//! assignment, general grade first.

use serde::Serialize;

use crate::calc::final_grade;
use crate::catalog::Catalog;
use crate::category::Category;
use crate::format::{format_cell, format_grade, format_weight};
use crate::ledger::Ledger;
use crate::model::{Student, Topic};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentColumn {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom_asg_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRow {
    pub student_id: String,
    pub student_name: String,
    pub final_grade: String,
    pub category_average: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeTable {
    pub category: Category,
    pub label: String,
    pub weight: f64,
    pub columns: Vec<AssignmentColumn>,
    pub rows: Vec<GradeRow>,
}

/// Category filter label, e.g. `"Exam (40%)"`.
pub fn category_label(topic: &Topic, category: Category) -> String {
    format!(
        "{} ({}%)",
        category.label(),
        format_weight(topic.weight(category))
    )
}

pub fn build_grade_table(
    topic: &Topic,
    catalog: &Catalog,
    roster: &[Student],
    ledger: &Ledger,
    category: Category,
    marker: &str,
) -> GradeTable {
    let columns: Vec<AssignmentColumn> = catalog
        .assignments_by_category(category)
        .map(|a| AssignmentColumn {
            id: a.id.clone(),
            name: a.name.clone(),
            classroom_asg_id: a.classroom_asg_id.clone(),
        })
        .collect();

    let rows = roster
        .iter()
        .map(|s| {
            let result = final_grade(&s.id, topic, catalog, ledger);
            let cells = columns
                .iter()
                .map(|c| format_cell(ledger.grade_for(&s.id, &c.id), marker))
                .collect();
            GradeRow {
                student_id: s.id.clone(),
                student_name: s.display_name(),
                final_grade: format_grade(result.final_grade),
                category_average: format_grade(result.per_category[category].average),
                cells,
            }
        })
        .collect();

    GradeTable {
        category,
        label: category_label(topic, category),
        weight: topic.weight(category),
        columns,
        rows,
    }
}

use gradebookd::model::opt_id_string;
use gradebookd::table::build_grade_table;
use gradebookd::{
    average_for_category, compute_topic_summary, final_grade, format_grade, AssignmentsPayload,
    Catalog, Category, Ledger, RawGrade, Student, Topic,
};
use serde::Deserialize;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{ok_serialized, parse_params, require};
use crate::ipc::types::{AppState, Request};

/// One snapshot of a topic as the UI fetched it. Each method reads the fields it needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotParams {
    #[serde(default)]
    topic: Option<Topic>,
    #[serde(default)]
    assignments: AssignmentsPayload,
    #[serde(default)]
    grades: Ledger,
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default, deserialize_with = "opt_id_string")]
    student_id: Option<String>,
    #[serde(default)]
    category: Option<Category>,
}

fn handle_grades_category_average(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: SnapshotParams = match parse_params(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match require(req, params.student_id, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let category = match require(req, params.category, "category") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let catalog = Catalog::from_payload(params.assignments);
    let average = average_for_category(&student_id, category, &catalog, &params.grades);
    ok(
        &req.id,
        json!({
            "studentId": student_id,
            "category": category,
            "average": average,
        }),
    )
}

fn handle_grades_student(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: SnapshotParams = match parse_params(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let topic = match require(req, params.topic, "topic") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match require(req, params.student_id, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let catalog = Catalog::from_payload(params.assignments);
    let result = final_grade(&student_id, &topic, &catalog, &params.grades);
    ok_serialized(req, &result)
}

fn handle_grades_compute(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: SnapshotParams = match parse_params(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let topic = match require(req, params.topic, "topic") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let catalog = Catalog::from_payload(params.assignments);
    let summary = compute_topic_summary(&topic, &catalog, &params.students, &params.grades);
    let mut result = match serde_json::to_value(&summary) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "serialize_failed", e.to_string(), None),
    };
    result["droppedAssignments"] = json!(catalog.dropped());
    ok(&req.id, result)
}

fn handle_grades_table(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: SnapshotParams = match parse_params(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let topic = match require(req, params.topic, "topic") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let category = match require(req, params.category, "category") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let catalog = Catalog::from_payload(params.assignments);
    let table = build_grade_table(
        &topic,
        &catalog,
        &params.students,
        &params.grades,
        category,
        &state.config.ungraded_marker,
    );
    ok_serialized(req, &table)
}

fn handle_grades_format(state: &mut AppState, req: &Request) -> serde_json::Value {
    let text = match req.params.get("value") {
        None | Some(serde_json::Value::Null) => state.config.ungraded_marker.clone(),
        Some(serde_json::Value::Number(n)) => match n.as_f64() {
            Some(v) => format_grade(v),
            None => state.config.ungraded_marker.clone(),
        },
        Some(serde_json::Value::String(s)) => match RawGrade::Text(s.clone()).parse() {
            Some(v) => format_grade(v),
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "params.value must be numeric",
                    Some(json!({ "value": s })),
                )
            }
        },
        Some(_) => return err(&req.id, "bad_params", "params.value must be numeric", None),
    };
    ok(&req.id, json!({ "text": text }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.categoryAverage" => Some(handle_grades_category_average(state, req)),
        "grades.student" => Some(handle_grades_student(state, req)),
        "grades.compute" => Some(handle_grades_compute(state, req)),
        "grades.table" => Some(handle_grades_table(state, req)),
        "grades.format" => Some(handle_grades_format(state, req)),
        _ => None,
    }
}

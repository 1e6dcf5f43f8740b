use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{not_found, optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::query;
use serde_json::json;

fn handle_teacher_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = &state.dataset;
    ok(
        &req.id,
        json!({
            "course": { "id": ds.course.id, "name": ds.course.name },
            "overview": calc::class_overview(&ds.students),
            "atRiskThreshold": calc::AT_RISK_THRESHOLD,
            "quizzes": ds.module_quizzes().len(),
            "assignments": ds.assignments().len(),
        }),
    )
}

fn handle_students_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let q = match optional_str(req, "query") {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => return e,
    };
    let cards = query::search_students(&state.dataset.students, &q)
        .into_iter()
        .map(query::student_card)
        .collect::<Vec<_>>();
    ok(
        &req.id,
        json!({
            "query": q,
            "totalStudents": state.dataset.students.len(),
            "students": cards,
        }),
    )
}

fn handle_students_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match query::student_profile(&state.dataset, &student_id) {
        Some(profile) => ok(&req.id, json!(profile)),
        None => not_found(req, "student", &student_id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teacher.overview" => Some(handle_teacher_overview(state, req)),
        "students.search" => Some(handle_students_search(state, req)),
        "students.open" => Some(handle_students_open(state, req)),
        _ => None,
    }
}

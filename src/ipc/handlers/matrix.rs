use crate::dataset::Dataset;
use crate::ipc::error::ok;
use crate::ipc::helpers::{not_found, required_kind, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{ItemKind, JoinRecord};
use crate::query;
use serde_json::json;

/// Selector options for one item kind, in catalogue order.
fn items(ds: &Dataset, kind: ItemKind) -> serde_json::Value {
    match kind {
        ItemKind::Quiz => json!(ds.module_quizzes()),
        ItemKind::Assignment => json!(ds.assignments()),
        ItemKind::Project => json!([ds.project]),
    }
}

fn record_json(rec: JoinRecord<'_>) -> serde_json::Value {
    let row = match rec {
        JoinRecord::Quiz(r) => json!(r),
        JoinRecord::Assignment(r) => json!(r),
        JoinRecord::Project(r) => json!(r),
    };
    json!({
        "kind": rec.kind(),
        "studentId": rec.student_id(),
        "itemId": rec.item_id(),
        "moduleId": rec.module_id(),
        "attempted": rec.attempted(),
        "scored": rec.scored(),
        "row": row,
    })
}

fn handle_matrix_items(state: &mut AppState, req: &Request) -> serde_json::Value {
    let kind = match required_kind(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!({
            "kind": kind,
            "items": items(&state.dataset, kind),
        }),
    )
}

fn handle_matrix_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let kind = match required_kind(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let item_id = match required_str(req, "itemId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    match query::matrix(&state.dataset, kind, &item_id) {
        Some(m) => ok(&req.id, json!(m)),
        None => not_found(req, kind.as_str(), &item_id),
    }
}

fn handle_matrix_lookup(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let item_id = match required_str(req, "itemId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let kind = match required_kind(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let record =
        query::student_data(&state.dataset, &student_id, &item_id, kind).map(record_json);
    ok(&req.id, json!({ "record": record }))
}

fn handle_matrix_attempted_count(state: &mut AppState, req: &Request) -> serde_json::Value {
    let item_id = match required_str(req, "itemId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let kind = match required_kind(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let ds = &state.dataset;
    if !ds.item_ids(kind).contains(&item_id) {
        return not_found(req, kind.as_str(), &item_id);
    }
    ok(
        &req.id,
        json!({
            "attemptedCount": query::attempted_count(ds, &item_id, kind),
            "notAttemptedCount": query::not_attempted_count(ds, &ds.students, &item_id, kind),
            "totalStudents": ds.students.len(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "matrix.items" => Some(handle_matrix_items(state, req)),
        "matrix.open" => Some(handle_matrix_open(state, req)),
        "matrix.lookup" => Some(handle_matrix_lookup(state, req)),
        "matrix.attemptedCount" => Some(handle_matrix_attempted_count(state, req)),
        _ => None,
    }
}

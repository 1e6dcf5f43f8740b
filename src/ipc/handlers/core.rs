use crate::dataset::Dataset;
use crate::ipc::error::{err, ok, ErrorCode};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, DataSource, Request};
use crate::mock;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "source": state.source.describe(),
            "courseName": state.dataset.course.name,
            "students": state.dataset.students.len(),
            "modules": state.dataset.course.modules.len(),
        }),
    )
}

/// Coverage gaps are logged but never block the swap.
fn install(
    state: &mut AppState,
    req: &Request,
    ds: Dataset,
    source: DataSource,
) -> serde_json::Value {
    let gaps = ds.report_coverage_gaps();
    info!(
        source = %source.describe(),
        students = ds.students.len(),
        modules = ds.course.modules.len(),
        "dataset loaded"
    );
    state.dataset = ds;
    state.source = source;
    ok(
        &req.id,
        json!({
            "source": state.source.describe(),
            "courseName": state.dataset.course.name,
            "students": state.dataset.students.len(),
            "modules": state.dataset.course.modules.len(),
            "coverageGaps": gaps.len(),
        }),
    )
}

fn handle_dataset_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match required_str(req, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e,
    };
    match Dataset::load_json(&path) {
        Ok(ds) => install(state, req, ds, DataSource::File(path)),
        Err(e) => {
            warn!(path = %path.display(), "dataset load failed: {e:#}");
            err(&req.id, ErrorCode::DatasetLoadFailed, format!("{e:#}"), None)
        }
    }
}

fn handle_dataset_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    match mock::dataset() {
        Ok(ds) => install(state, req, ds, DataSource::Fixture),
        Err(e) => err(&req.id, ErrorCode::DatasetLoadFailed, format!("{e:#}"), None),
    }
}

fn handle_dataset_snapshot(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!(state.dataset))
}

fn handle_dataset_coverage(state: &mut AppState, req: &Request) -> serde_json::Value {
    let gaps = state.dataset.coverage_gaps();
    ok(
        &req.id,
        json!({
            "complete": gaps.is_empty(),
            "gaps": gaps,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "dataset.load" => Some(handle_dataset_load(state, req)),
        "dataset.reset" => Some(handle_dataset_reset(state, req)),
        "dataset.snapshot" => Some(handle_dataset_snapshot(state, req)),
        "dataset.coverage" => Some(handle_dataset_coverage(state, req)),
        _ => None,
    }
}

use crate::ipc::error::{err, ErrorCode};
use crate::ipc::types::Request;
use crate::model::ItemKind;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| err(&req.id, ErrorCode::BadParams, format!("missing {}", key), None))
}

/// Absent or null is `None`; any other non-string value is rejected.
pub fn optional_str(req: &Request, key: &str) -> Result<Option<String>, serde_json::Value> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(err(
            &req.id,
            ErrorCode::BadParams,
            format!("{} must be a string", key),
            None,
        )),
    }
}

/// Quiz ids are numeric in the course tree; accept `3` or `"3"`.
pub fn required_u32(req: &Request, key: &str) -> Result<u32, serde_json::Value> {
    let v = req.params.get(key);
    v.and_then(|v| v.as_u64())
        .or_else(|| v.and_then(|v| v.as_str()).and_then(|s| s.trim().parse().ok()))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| err(&req.id, ErrorCode::BadParams, format!("missing {}", key), None))
}

pub fn required_kind(req: &Request) -> Result<ItemKind, serde_json::Value> {
    let raw = required_str(req, "kind")?;
    ItemKind::parse(&raw).ok_or_else(|| {
        err(
            &req.id,
            ErrorCode::BadParams,
            format!("unknown kind: {}", raw),
            Some(serde_json::json!({ "allowed": ["quiz", "assignment", "project"] })),
        )
    })
}

pub fn not_found(req: &Request, what: &str, id: &str) -> serde_json::Value {
    err(
        &req.id,
        ErrorCode::NotFound,
        format!("{} not found", what),
        Some(serde_json::json!({ "id": id })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn req(params: serde_json::Value) -> Request {
        Request {
            id: "1".into(),
            method: "test".into(),
            params,
        }
    }

    #[test]
    fn required_str_rejects_blank_values() {
        assert_eq!(
            required_str(&req(json!({ "moduleId": " module-1 " })), "moduleId").ok(),
            Some("module-1".to_string())
        );
        let e = required_str(&req(json!({ "moduleId": "  " })), "moduleId").unwrap_err();
        assert_eq!(e["error"]["code"], "bad_params");
        assert!(required_str(&req(json!({})), "moduleId").is_err());
    }

    #[test]
    fn optional_str_distinguishes_null_from_wrong_type() {
        assert_eq!(optional_str(&req(json!({})), "query").ok(), Some(None));
        assert_eq!(
            optional_str(&req(json!({ "query": null })), "query").ok(),
            Some(None)
        );
        assert!(optional_str(&req(json!({ "query": 5 })), "query").is_err());
    }

    #[test]
    fn quiz_ids_accept_numbers_or_numeric_strings() {
        assert_eq!(required_u32(&req(json!({ "quizId": 2 })), "quizId").ok(), Some(2));
        assert_eq!(required_u32(&req(json!({ "quizId": "7" })), "quizId").ok(), Some(7));
        assert!(required_u32(&req(json!({ "quizId": -1 })), "quizId").is_err());
        assert!(required_u32(&req(json!({ "quizId": "x" })), "quizId").is_err());
    }

    #[test]
    fn kind_lists_allowed_values_on_error() {
        assert_eq!(
            required_kind(&req(json!({ "kind": "Quiz" }))).ok(),
            Some(ItemKind::Quiz)
        );
        let e = required_kind(&req(json!({ "kind": "exam" }))).unwrap_err();
        assert_eq!(e["error"]["details"]["allowed"][2], "project");
    }
}
